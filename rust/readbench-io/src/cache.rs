//! Page cache control for cold-read measurements.

use readbench_common::{Result, error::Error};

/// Flushes dirty pages and asks the kernel to drop clean page cache, dentries
/// and inodes.
///
/// Requires root on Linux. Callers treat failure as a warning: the benchmark
/// still runs, just against a warm cache.
#[cfg(target_os = "linux")]
pub fn drop_page_cache() -> Result<()> {
    // SAFETY: `sync` has no preconditions.
    unsafe { libc::sync() };
    std::fs::write("/proc/sys/vm/drop_caches", "3")
        .map_err(|e| Error::io("/proc/sys/vm/drop_caches", e))
}

#[cfg(not(target_os = "linux"))]
pub fn drop_page_cache() -> Result<()> {
    // SAFETY: `sync` has no preconditions.
    unsafe { libc::sync() };
    Err(Error::io(
        "drop_page_cache",
        std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "dropping the page cache is only supported on Linux",
        ),
    ))
}
