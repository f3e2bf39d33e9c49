//! npm client error types.

use thiserror::Error;

/// Errors that can occur while talking to the npm registry or downloads API.
#[derive(Debug, Error)]
pub enum NpmError {
    /// HTTP transport or status error.
    #[error("npm request to '{url}' failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The package does not exist.
    #[error("npm package not found: {package}")]
    NotFound { package: String },

    /// The response lacked a field the caller asked for.
    #[error("npm response for '{package}' has no '{field}' field")]
    MissingField { package: String, field: String },
}

impl NpmError {
    /// Returns true if the error means the package is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
