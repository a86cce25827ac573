use std::path::PathBuf;

use readbench_bytes::{DEFAULT_ALIGNMENT, align::checked_align_up_u64};
use readbench_common::{Result, error::Error, verify_arg};
use readbench_io::{IoMode, ReadMode};

use crate::{fixture::FileContent, permutation::AccessOrder};

/// Immutable parameters of one benchmark run.
///
/// The configuration is built by the caller (usually from command line
/// arguments) and handed to [`IterationEngine`](crate::IterationEngine) at
/// construction; the engine never reads global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkConfig {
    /// Number of files `N`. Zero is accepted; the run completes immediately.
    pub file_count: usize,
    /// Logical file size `K` in bytes, before alignment.
    pub file_size: u64,
    /// Alignment unit for buffers, offsets and file sizes. Power of two.
    pub alignment: usize,
    /// Number of open/read/close iterations.
    pub iterations: u64,
    pub dir: PathBuf,
    /// Bytes requested per read call. Multiple of `alignment`.
    pub chunk_size: usize,
    pub read_mode: ReadMode,
    /// Requested I/O mode; `Unbuffered` falls back to buffered per file if rejected.
    pub io_mode: IoMode,
    pub access_order: AccessOrder,
    /// Fixed permutation seed; `None` reseeds every run.
    pub seed: Option<u64>,
    /// How the setup layer populates files. [`FileContent::Sparse`] skips writing.
    pub file_content: FileContent,
    /// Drop the OS page cache after setup. Handled by the setup layer.
    pub drop_caches: bool,
    /// Iterations between progress reports; defaults to a tenth of the run.
    pub progress_interval: Option<u64>,
    /// Upper bound on bytes read per second across the run; 0 means unlimited.
    pub rate_limit_bytes_per_second: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            file_count: 10,
            file_size: 1024,
            alignment: DEFAULT_ALIGNMENT,
            iterations: 100,
            dir: PathBuf::from("./test_files"),
            chunk_size: DEFAULT_ALIGNMENT,
            read_mode: ReadMode::Sequential,
            io_mode: IoMode::Unbuffered,
            access_order: AccessOrder::Random,
            seed: None,
            file_content: FileContent::Pattern,
            drop_caches: false,
            progress_interval: None,
            rate_limit_bytes_per_second: 0,
        }
    }
}

impl BenchmarkConfig {
    /// `file_size` rounded up to the alignment unit; the on-disk size of every file.
    ///
    /// Fails with `InvalidArgument` if the alignment is not a power of two or
    /// the rounded size does not fit in a `u64`.
    pub fn aligned_file_size(&self) -> Result<u64> {
        checked_align_up_u64(self.file_size, self.alignment as u64).ok_or_else(|| {
            Error::invalid_arg(
                "file_size",
                format!(
                    "{} cannot be aligned to {} bytes",
                    self.file_size, self.alignment
                ),
            )
        })
    }

    pub fn skip_write(&self) -> bool {
        self.file_content == FileContent::Sparse
    }

    /// Progress reporting cadence, clamped to at least one iteration.
    pub fn progress_every(&self) -> u64 {
        self.progress_interval
            .unwrap_or(self.iterations / 10)
            .max(1)
    }

    /// Checks the invariants the read path relies on.
    ///
    /// Parallel reads split each file into `aligned_file_size / chunk_size`
    /// chunks; a chunk size that does not divide the aligned file size is
    /// rejected here rather than silently truncating the last chunk.
    pub fn validate(&self) -> Result<()> {
        verify_arg!(alignment, self.alignment.is_power_of_two());
        verify_arg!(chunk_size, self.chunk_size > 0);
        verify_arg!(chunk_size, self.chunk_size % self.alignment == 0);
        let aligned_file_size = self.aligned_file_size()?;
        if self.read_mode == ReadMode::Parallel {
            verify_arg!(chunk_size, aligned_file_size % self.chunk_size as u64 == 0);
        }
        Ok(())
    }
}
