//! File opening for unix systems without a known direct I/O switch.
//!
//! Unbuffered opens always fail with `Unsupported`, which sends the caller
//! down the buffered fallback path.

use std::{fs::OpenOptions, path::Path};

use crate::fs::IoMode;

pub fn open(file_path: &Path, io_mode: IoMode) -> std::io::Result<std::fs::File> {
    match io_mode {
        IoMode::Buffered => OpenOptions::new().read(true).open(file_path),
        IoMode::Unbuffered => Err(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "direct I/O is not supported on this platform",
        )),
    }
}
