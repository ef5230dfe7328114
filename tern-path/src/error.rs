use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("i/o error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("unsupported on this platform: {0}")]
    Unsupported(String),
}

impl PathError {
    /// Maps an [`io::Error`] into the taxonomy, keeping the path context.
    pub(crate) fn from_io(path: &crate::Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => PathError::NotFound(path.name()),
            io::ErrorKind::AlreadyExists => PathError::AlreadyExists(path.name()),
            _ => PathError::Io {
                path: path.name(),
                source,
            },
        }
    }
}
