//! Linux file opening.
//!
//! Unbuffered mode uses `O_DIRECT`, which requires:
//! - buffer addresses aligned to the logical block size of the device
//! - transfer sizes and file offsets that are multiples of that block size
//!
//! Filesystems without direct I/O support (tmpfs, some FUSE and network
//! filesystems) reject the flag with `EINVAL` at open time.

use std::{fs::OpenOptions, os::unix::fs::OpenOptionsExt, path::Path};

use crate::fs::IoMode;

/// Opens an existing file read-only with the specified I/O mode.
pub fn open(file_path: &Path, io_mode: IoMode) -> std::io::Result<std::fs::File> {
    let mut options = OpenOptions::new();
    options.read(true);
    match io_mode {
        IoMode::Buffered => (),
        IoMode::Unbuffered => {
            options.custom_flags(libc::O_DIRECT);
        }
    }
    options.open(file_path)
}
