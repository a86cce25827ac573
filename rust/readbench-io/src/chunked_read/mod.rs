//! Reading whole files in fixed-size chunks.
//!
//! Two strategies are supported:
//!
//! - [`ReadMode::Sequential`]: a single reusable aligned buffer, reads advance
//!   the descriptor's implicit cursor until the requested size or end-of-file.
//! - [`ReadMode::Parallel`]: the file is split into `total_size / chunk_size`
//!   chunks, each read concurrently at its own offset with a positioned read
//!   into its own aligned buffer.
//!
//! [`ReadMode::Skip`] performs no reads at all, which isolates open/close cost.

use std::{
    path::Path,
    sync::{
        OnceLock,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use readbench_bytes::AlignedBuffer;
use readbench_common::{Result, error::Error, verify_arg};

#[cfg(test)]
mod tests;

/// Upper bound on the number of chunk worker threads.
///
/// Files with more chunks than this still get one task per chunk; the
/// surplus tasks queue on the pool.
pub const MAX_CHUNK_WORKERS: usize = 256;

/// A readable, already opened file.
///
/// Implementations must be `Sync`: parallel reads share one source across
/// worker threads and only use [`read_at`](Self::read_at), which does not
/// touch the shared cursor.
pub trait ChunkSource: Sync {
    /// Path of the file, used for error reporting.
    fn path(&self) -> &Path;

    /// Reads at the implicit file cursor, advancing it.
    fn read_next(&self, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Reads at an explicit byte offset without using or moving the cursor.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> std::io::Result<usize>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadMode {
    #[default]
    Sequential,
    Parallel,
    /// Open and close only.
    Skip,
}

impl ReadMode {
    /// Combines the skip-read and parallel flags; skipping takes precedence.
    pub fn from_flags(skip_read: bool, parallel: bool) -> ReadMode {
        match (skip_read, parallel) {
            (true, _) => ReadMode::Skip,
            (false, true) => ReadMode::Parallel,
            (false, false) => ReadMode::Sequential,
        }
    }
}

impl std::fmt::Display for ReadMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadMode::Sequential => f.write_str("sequential"),
            ReadMode::Parallel => f.write_str("parallel"),
            ReadMode::Skip => f.write_str("skip"),
        }
    }
}

/// Result of reading one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReadOutcome {
    pub bytes: u64,
    /// Number of read calls issued, including a terminating zero-byte read.
    pub chunk_reads: u64,
}

/// Reads whole files chunk by chunk.
///
/// The reader owns the resources its mode needs for the whole run: the main
/// buffer in sequential mode, the worker pool in parallel mode. Per-chunk
/// buffers of the parallel mode live only as long as their task.
#[derive(Debug)]
pub struct ChunkedReader {
    mode: ReadMode,
    chunk_size: usize,
    alignment: usize,
    buffer: Option<AlignedBuffer>,
    pool: Option<rayon::ThreadPool>,
}

impl ChunkedReader {
    /// Creates a reader for files of `file_size` bytes.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `chunk_size` is zero or not a multiple of
    ///   `alignment`, or, in parallel mode, does not evenly divide `file_size`.
    /// - `Allocation` if the sequential buffer cannot be allocated.
    pub fn new(
        mode: ReadMode,
        chunk_size: usize,
        alignment: usize,
        file_size: u64,
    ) -> Result<ChunkedReader> {
        verify_arg!(alignment, alignment.is_power_of_two());
        verify_arg!(chunk_size, chunk_size > 0);
        verify_arg!(chunk_size, chunk_size % alignment == 0);

        let mut reader = ChunkedReader {
            mode,
            chunk_size,
            alignment,
            buffer: None,
            pool: None,
        };
        match mode {
            ReadMode::Sequential => {
                reader.buffer = Some(AlignedBuffer::allocate(chunk_size, alignment)?);
            }
            ReadMode::Parallel => {
                verify_arg!(chunk_size, file_size % chunk_size as u64 == 0);
                let chunk_count = (file_size / chunk_size as u64) as usize;
                reader.pool = Some(Self::build_pool(chunk_count)?);
            }
            ReadMode::Skip => (),
        }
        Ok(reader)
    }

    /// Reads `total_size` bytes of `source`.
    ///
    /// Sequential mode may return fewer bytes than requested when the file ends
    /// early. Parallel mode either reads every chunk in full or fails with a
    /// `PartialRead` error.
    pub fn read_all<S: ChunkSource>(&mut self, source: &S, total_size: u64) -> Result<ReadOutcome> {
        match self.mode {
            ReadMode::Skip => Ok(ReadOutcome::default()),
            ReadMode::Sequential => {
                let buffer = match self.buffer.as_mut() {
                    Some(buffer) => buffer,
                    None => return Err(Error::invalid_operation("sequential buffer")),
                };
                read_sequential(buffer, self.chunk_size, source, total_size)
            }
            ReadMode::Parallel => {
                let pool = match self.pool.as_ref() {
                    Some(pool) => pool,
                    None => return Err(Error::invalid_operation("chunk read pool")),
                };
                read_parallel(pool, self.chunk_size, self.alignment, source, total_size)
            }
        }
    }

    fn build_pool(chunk_count: usize) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(chunk_count.clamp(1, MAX_CHUNK_WORKERS))
            .thread_name(|i| format!("readbench_chunk_{i}"))
            .build()
            .map_err(|e| Error::io("chunk read pool", std::io::Error::other(e)))
    }
}

fn read_sequential<S: ChunkSource>(
    buffer: &mut AlignedBuffer,
    chunk_size: usize,
    source: &S,
    total_size: u64,
) -> Result<ReadOutcome> {
    let mut outcome = ReadOutcome::default();
    while outcome.bytes < total_size {
        let want = (total_size - outcome.bytes).min(chunk_size as u64) as usize;
        let n = retry_interrupted(|| source.read_next(&mut buffer[..want]))
            .map_err(|e| Error::read(source.path(), outcome.bytes, e))?;
        outcome.chunk_reads += 1;
        if n == 0 {
            break;
        }
        outcome.bytes += n as u64;
    }
    Ok(outcome)
}

fn read_parallel<S: ChunkSource>(
    pool: &rayon::ThreadPool,
    chunk_size: usize,
    alignment: usize,
    source: &S,
    total_size: u64,
) -> Result<ReadOutcome> {
    verify_arg!(chunk_size, total_size % chunk_size as u64 == 0);
    let chunk_count = total_size / chunk_size as u64;

    let bytes = AtomicU64::new(0);
    let reads = AtomicU64::new(0);
    let failed = AtomicBool::new(false);
    let first_failure = OnceLock::<Error>::new();

    pool.scope(|scope| {
        let (bytes, reads, failed, first_failure) = (&bytes, &reads, &failed, &first_failure);
        for index in 0..chunk_count {
            let offset = index * chunk_size as u64;
            scope.spawn(move |_| {
                if failed.load(Ordering::Acquire) {
                    return;
                }
                reads.fetch_add(1, Ordering::Relaxed);
                match read_chunk(source, offset, chunk_size, alignment) {
                    Ok(n) => {
                        bytes.fetch_add(n as u64, Ordering::Relaxed);
                    }
                    Err(e) => {
                        failed.store(true, Ordering::Release);
                        let _ = first_failure.set(e);
                    }
                }
            });
        }
    });

    let bytes = bytes.into_inner();
    if failed.into_inner() {
        return Err(first_failure.into_inner().unwrap_or_else(|| {
            Error::partial_read(
                source.path(),
                0,
                total_size as usize,
                bytes as usize,
                "chunk task failed",
            )
        }));
    }
    Ok(ReadOutcome {
        bytes,
        chunk_reads: reads.into_inner(),
    })
}

/// Reads one chunk into a buffer owned by the calling task.
fn read_chunk<S: ChunkSource>(
    source: &S,
    offset: u64,
    chunk_size: usize,
    alignment: usize,
) -> Result<usize> {
    let mut buffer = AlignedBuffer::allocate(chunk_size, alignment).map_err(|e| {
        Error::partial_read(source.path(), offset, chunk_size, 0, e.to_string())
    })?;
    let n = retry_interrupted(|| source.read_at(&mut buffer[..chunk_size], offset))
        .map_err(|e| Error::partial_read(source.path(), offset, chunk_size, 0, e.to_string()))?;
    if n < chunk_size {
        return Err(Error::partial_read(
            source.path(),
            offset,
            chunk_size,
            n,
            "short read",
        ));
    }
    Ok(n)
}

fn retry_interrupted(
    mut f: impl FnMut() -> std::io::Result<usize>,
) -> std::io::Result<usize> {
    loop {
        match f() {
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            res => return res,
        }
    }
}
