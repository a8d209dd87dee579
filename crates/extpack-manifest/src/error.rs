use std::path::PathBuf;

/// Errors that can occur while loading or resolving a dependency manifest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest document is not valid YAML or lacks the `gems` mapping.
    #[error("failed to parse dependency manifest: {0}")]
    ManifestParse(String),

    /// Loading the manifest from its location failed.
    #[error("failed to load dependency manifest from '{location}': {source}")]
    ManifestLoad {
        location: String,
        #[source]
        source: Box<Error>,
    },

    /// A manifest entry has a shape the resolver does not understand.
    #[error("invalid manifest entry '{name}': {reason}")]
    InvalidEntry { name: String, reason: String },

    /// Invalid version requirement string.
    #[error("invalid version requirement '{constraint}': {reason}")]
    VersionConstraintParse { constraint: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    HttpClient(String),

    /// A remote fetch failed before a response was received.
    #[error("failed to fetch '{location}': {reason}")]
    Fetch { location: String, reason: String },

    /// A remote fetch returned a non-success status.
    #[error("failed to fetch '{location}': HTTP {status}")]
    HttpStatus { location: String, status: u16 },

    /// Reading a local location failed.
    #[error(transparent)]
    Fs(#[from] extpack_fs::Error),

    /// Location could not be read from disk.
    #[error("location not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
