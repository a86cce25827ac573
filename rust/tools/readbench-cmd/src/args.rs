//! Command line arguments and their mapping to [`BenchmarkConfig`].

use std::path::PathBuf;

use clap::Args;
use readbench::{AccessOrder, BenchmarkConfig, IoMode, ReadMode, fixture::FileContent};

#[derive(Args, Debug, Clone)]
pub struct FileSetArgs {
    /// Number of files
    #[arg(short = 'n', long, default_value_t = 10)]
    pub files: usize,

    /// Size of each file in bytes (rounded up to the alignment)
    #[arg(short = 'k', long, default_value_t = 1024)]
    pub file_size: u64,

    /// Benchmark directory
    #[arg(short, long, default_value = "./test_files")]
    pub dir: PathBuf,

    /// Alignment unit for buffers and file sizes (power of two)
    #[arg(long, default_value_t = 4096)]
    pub alignment: usize,
}

#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    /// Do not write file contents; create sparse files of the right size
    #[arg(long, conflicts_with = "random_data")]
    pub skip_write: bool,

    /// Fill files with random bytes instead of a repeating pattern
    #[arg(long)]
    pub random_data: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ReadArgs {
    /// Number of open/read/close iterations
    #[arg(short, long, default_value_t = 100)]
    pub iterations: u64,

    /// Bytes per read call (multiple of the alignment)
    #[arg(long, default_value_t = 4096)]
    pub chunk_size: usize,

    /// Read the chunks of each file concurrently at their offsets
    #[arg(long)]
    pub parallel: bool,

    /// Only open and close the files
    #[arg(long)]
    pub skip_read: bool,

    /// Use buffered I/O instead of requesting direct I/O
    #[arg(long)]
    pub buffered: bool,

    /// Visit files in index order instead of a random permutation
    #[arg(long)]
    pub cyclic: bool,

    /// Seed for the file permutation (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Report progress every N iterations (default: a tenth of the run)
    #[arg(long)]
    pub progress_every: Option<u64>,

    /// Cap read bandwidth in bytes per second (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub rate_limit: u64,
}

pub fn build_config(
    files: &FileSetArgs,
    write: Option<&WriteArgs>,
    read: Option<&ReadArgs>,
    drop_caches: bool,
) -> BenchmarkConfig {
    let mut config = BenchmarkConfig {
        file_count: files.files,
        file_size: files.file_size,
        alignment: files.alignment,
        dir: files.dir.clone(),
        drop_caches,
        ..Default::default()
    };
    if let Some(write) = write {
        config.file_content = match (write.skip_write, write.random_data) {
            (true, _) => FileContent::Sparse,
            (false, true) => FileContent::Random,
            (false, false) => FileContent::Pattern,
        };
    }
    if let Some(read) = read {
        config.iterations = read.iterations;
        config.chunk_size = read.chunk_size;
        config.read_mode = ReadMode::from_flags(read.skip_read, read.parallel);
        config.io_mode = if read.buffered {
            IoMode::Buffered
        } else {
            IoMode::Unbuffered
        };
        config.access_order = if read.cyclic {
            AccessOrder::Cyclic
        } else {
            AccessOrder::Random
        };
        config.seed = read.seed;
        config.progress_interval = read.progress_every;
        config.rate_limit_bytes_per_second = read.rate_limit;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_args() -> FileSetArgs {
        FileSetArgs {
            files: 3,
            file_size: 5000,
            dir: PathBuf::from("/tmp/rb"),
            alignment: 512,
        }
    }

    #[test]
    fn test_build_config() {
        let read = ReadArgs {
            iterations: 9,
            chunk_size: 1024,
            parallel: true,
            skip_read: false,
            buffered: true,
            cyclic: true,
            seed: Some(3),
            progress_every: Some(2),
            rate_limit: 1 << 20,
        };
        let write = WriteArgs {
            skip_write: true,
            random_data: false,
        };
        let config = build_config(&file_args(), Some(&write), Some(&read), true);
        assert_eq!(config.file_count, 3);
        assert_eq!(config.aligned_file_size().unwrap(), 5120);
        assert_eq!(config.read_mode, ReadMode::Parallel);
        assert_eq!(config.io_mode, IoMode::Buffered);
        assert_eq!(config.access_order, AccessOrder::Cyclic);
        assert_eq!(config.file_content, FileContent::Sparse);
        assert_eq!(config.progress_every(), 2);
        assert!(config.drop_caches);
        assert_eq!(config.rate_limit_bytes_per_second, 1 << 20);
        config.validate().unwrap();
    }

    #[test]
    fn test_skip_read_wins() {
        let read = ReadArgs {
            iterations: 1,
            chunk_size: 4096,
            parallel: true,
            skip_read: true,
            buffered: false,
            cyclic: false,
            seed: None,
            progress_every: None,
            rate_limit: 0,
        };
        let config = build_config(&file_args(), None, Some(&read), false);
        assert_eq!(config.read_mode, ReadMode::Skip);
        assert_eq!(config.rate_limit_bytes_per_second, 0);
        assert_eq!(config.io_mode, IoMode::Unbuffered);
        assert_eq!(config.file_content, FileContent::Pattern);
    }
}
