//! File access primitives for the read benchmark: direct/buffered open with
//! fallback, chunked sequential and parallel reads, and page cache control.

pub mod cache;
pub mod chunked_read;
pub mod fs;

pub use chunked_read::{ChunkSource, ChunkedReader, ReadMode, ReadOutcome};
pub use fs::{DirectIoOpener, FileOpener, IoMode, OpenedFile, PlatformOpener};
