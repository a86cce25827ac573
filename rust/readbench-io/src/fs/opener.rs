//! Opening benchmark files with direct I/O and a buffered fallback.

use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use readbench_common::{Result, error::Error};

use crate::{chunked_read::ChunkSource, fs::IoMode};

/// Opens a file in a specific [`IoMode`].
///
/// This is the seam between the benchmark and the operating system;
/// [`PlatformOpener`] is the production implementation.
pub trait FileOpener: Send + Sync {
    fn open(&self, path: &Path, mode: IoMode) -> std::io::Result<File>;
}

/// Opens files through the platform's native direct I/O switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformOpener;

impl FileOpener for PlatformOpener {
    fn open(&self, path: &Path, mode: IoMode) -> std::io::Result<File> {
        crate::fs::open(path, mode)
    }
}

impl<T: FileOpener + ?Sized> FileOpener for Arc<T> {
    fn open(&self, path: &Path, mode: IoMode) -> std::io::Result<File> {
        (**self).open(path, mode)
    }
}

impl<T: FileOpener + ?Sized> FileOpener for &T {
    fn open(&self, path: &Path, mode: IoMode) -> std::io::Result<File> {
        (**self).open(path, mode)
    }
}

/// An open benchmark file.
///
/// The descriptor is closed when the value is dropped, which happens on every
/// exit path of the iteration that opened it.
#[derive(Debug)]
pub struct OpenedFile {
    file: File,
    path: PathBuf,
    mode: IoMode,
    fell_back: bool,
}

impl OpenedFile {
    /// The mode the descriptor was actually opened with.
    pub fn mode(&self) -> IoMode {
        self.mode
    }

    /// `true` if direct I/O was requested but the open fell back to buffered I/O.
    pub fn fell_back(&self) -> bool {
        self.fell_back
    }

    /// Closes the descriptor.
    pub fn close(self) {
        drop(self);
    }
}

impl ChunkSource for OpenedFile {
    fn path(&self) -> &Path {
        &self.path
    }

    fn read_next(&self, buf: &mut [u8]) -> std::io::Result<usize> {
        (&self.file).read(buf)
    }

    fn read_at(&self, buf: &mut [u8], offset: u64) -> std::io::Result<usize> {
        std::os::unix::fs::FileExt::read_at(&self.file, buf, offset)
    }
}

/// Opens files requesting uncached I/O and degrades to buffered I/O when the
/// platform or filesystem rejects it.
///
/// The fallback is a one-time escalation per open: a warning is logged and
/// the buffered open is attempted once. It only applies when the direct open
/// fails because the flag itself was refused (see [`is_direct_io_rejection`]);
/// any other failure, such as a missing file or a permission error, is a
/// `FileOpen` error without a retry.
#[derive(Debug, Clone)]
pub struct DirectIoOpener<O = PlatformOpener> {
    opener: O,
    requested: IoMode,
}

impl DirectIoOpener<PlatformOpener> {
    pub fn new(requested: IoMode) -> DirectIoOpener<PlatformOpener> {
        DirectIoOpener::with_opener(PlatformOpener, requested)
    }
}

impl<O: FileOpener> DirectIoOpener<O> {
    pub fn with_opener(opener: O, requested: IoMode) -> DirectIoOpener<O> {
        DirectIoOpener { opener, requested }
    }

    pub fn open(&self, path: &Path) -> Result<OpenedFile> {
        if self.requested == IoMode::Buffered {
            return self.open_buffered(path, false);
        }

        match self.opener.open(path, IoMode::Unbuffered) {
            Ok(file) => Ok(OpenedFile {
                file,
                path: path.to_path_buf(),
                mode: IoMode::Unbuffered,
                fell_back: false,
            }),
            Err(e) if !is_direct_io_rejection(&e) => Err(Error::file_open(path, e)),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "direct I/O open rejected, falling back to buffered I/O"
                );
                self.open_buffered(path, true)
            }
        }
    }

    fn open_buffered(&self, path: &Path, fell_back: bool) -> Result<OpenedFile> {
        let file = self
            .opener
            .open(path, IoMode::Buffered)
            .map_err(|e| Error::file_open(path, e))?;
        Ok(OpenedFile {
            file,
            path: path.to_path_buf(),
            mode: IoMode::Buffered,
            fell_back,
        })
    }
}

/// The ways an unbuffered open reports that direct I/O itself is unavailable.
///
/// Linux filesystems without `O_DIRECT` support fail the open with `EINVAL`.
/// The macOS `F_NOCACHE` failure and platforms without a direct I/O switch
/// surface as [`std::io::ErrorKind::Unsupported`].
pub fn is_direct_io_rejection(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(libc::EINVAL) || e.kind() == std::io::ErrorKind::Unsupported
}
