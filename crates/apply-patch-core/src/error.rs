//! Error types for apply-patch-core.

use std::path::PathBuf;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in apply-patch-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input does not name a file.
    #[error("not a file reference '{input}': {reason}")]
    InvalidPatchRef {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Config file parsing error.
    #[error("failed to parse {file}: {source}")]
    ConfigParse {
        file: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
