//! File access order.

/// How iterations walk the file set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessOrder {
    /// A uniformly random permutation, shuffled once per run.
    #[default]
    Random,
    /// `1, 2, ..., N` in order.
    Cyclic,
}

/// An ordering of the 1-based file indices `1..=N`, each appearing exactly once.
///
/// Iteration `i` reads file `permutation[i mod N]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePermutation {
    indices: Vec<usize>,
}

impl FilePermutation {
    /// Generates the permutation of `1..=count`.
    ///
    /// With `seed == None` the shuffle is seeded from the OS, so consecutive
    /// runs visit files in different orders.
    pub fn generate(count: usize, order: AccessOrder, seed: Option<u64>) -> FilePermutation {
        let mut indices: Vec<usize> = (1..=count).collect();
        if order == AccessOrder::Random {
            let mut rng = match seed {
                Some(seed) => fastrand::Rng::with_seed(seed),
                None => fastrand::Rng::new(),
            };
            rng.shuffle(&mut indices);
        }
        FilePermutation { indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// File index read by iteration `iteration`, or `None` for an empty permutation.
    pub fn for_iteration(&self, iteration: u64) -> Option<usize> {
        if self.indices.is_empty() {
            return None;
        }
        let pos = (iteration % self.indices.len() as u64) as usize;
        Some(self.indices[pos])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(p: &FilePermutation) -> Vec<usize> {
        let mut v = p.as_slice().to_vec();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_random_contains_every_index_once() {
        for n in [1usize, 2, 3, 10, 257, 1000] {
            let p = FilePermutation::generate(n, AccessOrder::Random, None);
            assert_eq!(p.len(), n);
            assert_eq!(sorted(&p), (1..=n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_cyclic_is_identity() {
        let p = FilePermutation::generate(5, AccessOrder::Cyclic, Some(99));
        assert_eq!(p.as_slice(), &[1, 2, 3, 4, 5]);
        let visited: Vec<usize> = (0..7).filter_map(|i| p.for_iteration(i)).collect();
        assert_eq!(visited, vec![1, 2, 3, 4, 5, 1, 2]);
    }

    #[test]
    fn test_seed_is_reproducible() {
        let a = FilePermutation::generate(100, AccessOrder::Random, Some(42));
        let b = FilePermutation::generate(100, AccessOrder::Random, Some(42));
        let c = FilePermutation::generate(100, AccessOrder::Random, Some(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(sorted(&a), sorted(&c));
    }

    #[test]
    fn test_empty() {
        let p = FilePermutation::generate(0, AccessOrder::Random, None);
        assert!(p.is_empty());
        assert_eq!(p.for_iteration(0), None);
        assert_eq!(p.for_iteration(17), None);
    }

    #[test]
    fn test_iteration_wraps() {
        let p = FilePermutation::generate(3, AccessOrder::Random, Some(7));
        let mut counts = [0usize; 4];
        for i in 0..9 {
            counts[p.for_iteration(i).unwrap()] += 1;
        }
        assert_eq!(counts, [0, 3, 3, 3]);
        assert_eq!(p.for_iteration(3), p.for_iteration(0));
    }
}
