#[cfg_attr(target_os = "linux", path = "linux.rs")]
#[cfg_attr(target_os = "macos", path = "macos.rs")]
#[cfg_attr(not(any(target_os = "linux", target_os = "macos")), path = "other_unix.rs")]
mod platform;
mod opener;

pub use opener::{DirectIoOpener, FileOpener, OpenedFile, PlatformOpener, is_direct_io_rejection};
pub use platform::open;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IoMode {
    Buffered,
    /// Bypass the page cache (`O_DIRECT` / `F_NOCACHE`).
    #[default]
    Unbuffered,
}

impl std::fmt::Display for IoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoMode::Buffered => f.write_str("buffered"),
            IoMode::Unbuffered => f.write_str("direct"),
        }
    }
}
