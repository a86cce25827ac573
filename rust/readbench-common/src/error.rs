use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    pub fn invalid_operation(name: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidOperation { name: name.into() }.into())
    }

    pub fn allocation(size: usize, alignment: usize, reason: impl Into<String>) -> Error {
        Error(
            ErrorKind::Allocation {
                size,
                alignment,
                reason: reason.into(),
            }
            .into(),
        )
    }

    pub fn file_open(path: impl AsRef<Path>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::FileOpen {
                path: path.as_ref().to_path_buf(),
                source,
            }
            .into(),
        )
    }

    pub fn read(path: impl AsRef<Path>, offset: u64, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Read {
                path: path.as_ref().to_path_buf(),
                offset,
                source,
            }
            .into(),
        )
    }

    pub fn partial_read(
        path: impl AsRef<Path>,
        offset: u64,
        expected: usize,
        actual: usize,
        reason: impl Into<String>,
    ) -> Error {
        Error(
            ErrorKind::PartialRead {
                path: path.as_ref().to_path_buf(),
                offset,
                expected,
                actual,
                reason: reason.into(),
            }
            .into(),
        )
    }

    pub fn io(context: impl Into<String>, source: std::io::Error) -> Error {
        Error(
            ErrorKind::Io {
                context: context.into(),
                source,
            }
            .into(),
        )
    }
}

#[derive(Debug, Error)]
pub enum ErrorKind {
    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("invalid operation {name}")]
    InvalidOperation { name: String },

    #[error("failed to allocate {size} bytes aligned to {alignment}: {reason}")]
    Allocation {
        size: usize,
        alignment: usize,
        reason: String,
    },

    #[error("failed to open '{}': {source}", path.display())]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("read failed for '{}' at offset {offset}: {source}", path.display())]
    Read {
        path: PathBuf,
        offset: u64,
        source: std::io::Error,
    },

    #[error(
        "partial read of '{}' at offset {offset}: {actual} of {expected} bytes ({reason})",
        path.display()
    )]
    PartialRead {
        path: PathBuf,
        offset: u64,
        expected: usize,
        actual: usize,
        reason: String,
    },

    #[error("IO error for '{context}': {source}")]
    Io {
        context: String,
        source: std::io::Error,
    },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::io("", e)
    }
}
