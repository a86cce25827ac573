//! macOS file opening.
//!
//! There is no `O_DIRECT`; unbuffered mode opens the file normally and then
//! disables caching for the descriptor with `fcntl(F_NOCACHE, 1)`. A refused
//! `F_NOCACHE` is reported as `Unsupported`.

use std::{fs::OpenOptions, os::fd::AsRawFd, path::Path};

use crate::fs::IoMode;

/// Opens an existing file read-only with the specified I/O mode.
pub fn open(file_path: &Path, io_mode: IoMode) -> std::io::Result<std::fs::File> {
    let file = OpenOptions::new().read(true).open(file_path)?;
    if io_mode == IoMode::Unbuffered {
        // SAFETY: the descriptor is owned by `file` and valid for this call.
        let res = unsafe { libc::fcntl(file.as_raw_fd(), libc::F_NOCACHE, 1) };
        if res == -1 {
            let e = std::io::Error::last_os_error();
            return Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                format!("F_NOCACHE: {e}"),
            ));
        }
    }
    Ok(file)
}
