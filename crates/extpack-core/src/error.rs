//! Error types for extpack-core

use std::path::PathBuf;

/// Result type for extpack-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while orchestrating an extension build
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// OS packages are needed but the manifest has no `"*"` command
    #[error("Dependency manifest has no install command (expected a \"*\" entry with `command`)")]
    MissingInstallCommand,

    /// The host's extension build step failed
    #[error("Extension build failed: {message}")]
    Build { message: String },

    /// A setting read from the environment is malformed
    #[error("Invalid setting {name}={value}: {reason}")]
    InvalidSetting {
        name: String,
        value: String,
        reason: String,
    },

    /// Extension directory is missing after the build step
    #[error("Extension directory not found: {path}")]
    ExtensionDirNotFound { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Manifest error from extpack-manifest
    #[error(transparent)]
    Manifest(#[from] extpack_manifest::Error),

    /// Filesystem error from extpack-fs
    #[error(transparent)]
    Fs(#[from] extpack_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }
}
