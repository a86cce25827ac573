//! Power-of-two alignment arithmetic.

/// Rounds `n` up to the next multiple of `alignment`, returning `None` on
/// overflow or when `alignment` is not a non-zero power of two.
#[inline]
pub fn checked_align_up(n: usize, alignment: usize) -> Option<usize> {
    if !alignment.is_power_of_two() {
        return None;
    }
    n.checked_add(alignment - 1).map(|v| v & !(alignment - 1))
}

/// `u64` flavor of [`checked_align_up`], used for file sizes and offsets.
///
/// ```
/// use readbench_bytes::align::checked_align_up_u64;
///
/// assert_eq!(checked_align_up_u64(0, 512), Some(0));
/// assert_eq!(checked_align_up_u64(1, 512), Some(512));
/// assert_eq!(checked_align_up_u64(512, 512), Some(512));
/// assert_eq!(checked_align_up_u64(1025, 512), Some(1536));
/// assert_eq!(checked_align_up_u64(u64::MAX - 100, 4096), None);
/// ```
#[inline]
pub fn checked_align_up_u64(n: u64, alignment: u64) -> Option<u64> {
    if !alignment.is_power_of_two() {
        return None;
    }
    n.checked_add(alignment - 1).map(|v| v & !(alignment - 1))
}

/// Checks whether the address of `ptr` lies on an `alignment` boundary.
#[inline]
pub fn is_ptr_aligned(ptr: *const u8, alignment: usize) -> bool {
    debug_assert!(alignment.is_power_of_two());
    (ptr as usize) & (alignment - 1) == 0
}
