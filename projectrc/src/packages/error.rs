//! Package discovery error types.

use thiserror::Error;

/// Errors raised while reading manifests or compiling workspace patterns.
#[derive(Debug, Error)]
pub enum PackageError {
    /// A workspace glob could not be compiled.
    #[error("Invalid workspace pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// An ignore entry could not be compiled.
    #[error("Invalid workspace ignore '{pattern}': {source}")]
    InvalidIgnore {
        pattern: String,
        #[source]
        source: ignore::Error,
    },

    /// A `package.json` is not valid JSON or has an unexpected shape.
    #[error("Failed to parse '{path}': {source}")]
    Manifest {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
