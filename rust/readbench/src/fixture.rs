//! Benchmark file set setup and teardown.
//!
//! The engine only opens files that already exist; this module creates them.
//! Files are named `f1..fN` and are all exactly the aligned file size.

use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

use readbench_common::{Result, error::Error};

/// Write granularity when populating files.
const WRITE_BLOCK_SIZE: usize = 1024 * 1024;

/// Length of the `A..Z` cycle; byte `i` of a pattern file is `b'A' + i % 26`.
const PATTERN_PERIOD: usize = 26;

/// How file contents are produced at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileContent {
    /// Repeating `A..Z` pattern.
    #[default]
    Pattern,
    /// Random bytes, so compressing or deduplicating storage cannot shortcut reads.
    Random,
    /// No data written; the file is extended to its size and left sparse.
    Sparse,
}

/// `N` files of identical size in one directory.
#[derive(Debug, Clone)]
pub struct FileSet {
    dir: PathBuf,
    count: usize,
    file_size: u64,
}

impl FileSet {
    /// Name of the file with 1-based `index`.
    pub fn file_name(index: usize) -> String {
        format!("f{index}")
    }

    pub fn file_path(dir: &Path, index: usize) -> PathBuf {
        dir.join(Self::file_name(index))
    }

    /// Describes a file set that already exists on disk.
    pub fn existing(dir: impl Into<PathBuf>, count: usize, file_size: u64) -> FileSet {
        FileSet {
            dir: dir.into(),
            count,
            file_size,
        }
    }

    /// Removes `dir` if present and creates it empty.
    pub fn prepare_dir(dir: &Path) -> Result<()> {
        if dir.exists() {
            std::fs::remove_dir_all(dir)
                .map_err(|e| Error::io(format!("remove {}", dir.display()), e))?;
        }
        std::fs::create_dir_all(dir).map_err(|e| Error::io(format!("create {}", dir.display()), e))
    }

    /// Creates `count` files of `file_size` bytes in `dir`.
    ///
    /// The directory must exist. Existing files with the same names are
    /// truncated and rewritten.
    pub fn create(
        dir: &Path,
        count: usize,
        file_size: u64,
        content: FileContent,
    ) -> Result<FileSet> {
        let block_size = WRITE_BLOCK_SIZE.min(file_size as usize);
        // Pattern blocks carry one extra period so a write can start at any phase.
        let mut block: Vec<u8> = match content {
            FileContent::Pattern => (0..block_size + PATTERN_PERIOD)
                .map(|i| b'A' + (i % PATTERN_PERIOD) as u8)
                .collect(),
            FileContent::Random => vec![0u8; block_size],
            FileContent::Sparse => Vec::new(),
        };
        let mut rng = fastrand::Rng::new();

        for index in 1..=count {
            let path = Self::file_path(dir, index);
            let mut file = File::create(&path)
                .map_err(|e| Error::io(format!("create {}", path.display()), e))?;
            let written = match content {
                FileContent::Sparse => file.set_len(file_size),
                FileContent::Pattern | FileContent::Random => {
                    Self::fill(&mut file, &mut block, file_size, content, &mut rng)
                }
            };
            written.map_err(|e| Error::io(format!("write {}", path.display()), e))?;
        }

        Ok(FileSet::existing(dir, count, file_size))
    }

    fn fill(
        file: &mut File,
        block: &mut [u8],
        file_size: u64,
        content: FileContent,
        rng: &mut fastrand::Rng,
    ) -> std::io::Result<()> {
        let block_size = match content {
            FileContent::Pattern => block.len() - PATTERN_PERIOD,
            FileContent::Random | FileContent::Sparse => block.len(),
        };
        let mut written = 0u64;
        while written < file_size {
            let n = (file_size - written).min(block_size as u64) as usize;
            let data = match content {
                FileContent::Pattern => {
                    let phase = (written % PATTERN_PERIOD as u64) as usize;
                    &block[phase..phase + n]
                }
                FileContent::Random | FileContent::Sparse => {
                    rng.fill(&mut block[..n]);
                    &block[..n]
                }
            };
            file.write_all(data)?;
            written += n as u64;
        }
        file.flush()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn path(&self, index: usize) -> PathBuf {
        Self::file_path(&self.dir, index)
    }

    /// Checks that every file exists with the expected size.
    pub fn verify(&self) -> Result<()> {
        for index in 1..=self.count {
            let path = self.path(index);
            let len = std::fs::metadata(&path)
                .map_err(|e| Error::file_open(&path, e))?
                .len();
            if len != self.file_size {
                return Err(Error::invalid_arg(
                    path.display().to_string(),
                    format!("size {len}, expected {}", self.file_size),
                ));
            }
        }
        Ok(())
    }

    /// Deletes the directory and everything in it.
    pub fn remove(self) -> Result<()> {
        std::fs::remove_dir_all(&self.dir)
            .map_err(|e| Error::io(format!("remove {}", self.dir.display()), e))
    }
}
