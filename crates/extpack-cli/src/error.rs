//! Error types for extpack-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from extpack-core
    #[error(transparent)]
    Core(#[from] extpack_core::Error),

    /// Error from extpack-manifest
    #[error(transparent)]
    Manifest(#[from] extpack_manifest::Error),

    /// Error from extpack-fs
    #[error(transparent)]
    Fs(#[from] extpack_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
