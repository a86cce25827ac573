//! Aligned memory for direct I/O reads.
//!
//! Direct I/O requires the buffer address, the transfer size and the file offset
//! to be multiples of the filesystem block size. [`AlignedBuffer`] provides
//! buffers satisfying the first two requirements; [`align`] provides the
//! arithmetic used to keep sizes and offsets on the boundary.

pub mod align;
pub mod aligned_buffer;

pub use aligned_buffer::AlignedBuffer;

/// Default alignment unit for direct I/O buffers and file sizes.
pub const DEFAULT_ALIGNMENT: usize = 4096;
