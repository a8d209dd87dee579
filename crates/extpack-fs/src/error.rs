//! Error types for extpack-fs

use std::path::PathBuf;

/// Result type for extpack-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in extpack-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read archive stream: {0}")]
    Archive(#[source] std::io::Error),

    #[error("Failed to walk directory {path}: {message}")]
    Walk { path: PathBuf, message: String },

    #[error("Archive entry escapes destination root: {entry}")]
    PathTraversal { entry: PathBuf },

    #[error("Failed to compress data: {0}")]
    Compress(#[source] std::io::Error),

    #[error("Failed to decompress gzip data: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
