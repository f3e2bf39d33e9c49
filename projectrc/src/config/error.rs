//! Configuration error types.

use super::schema::ValidationReport;
use thiserror::Error;

/// Errors that can occur while reading a projectrc file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse TOML content.
    #[error("Failed to parse TOML in '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Failed to parse JSON content, or to map validated content onto the typed model.
    #[error("Failed to parse JSON in '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The content does not satisfy the projectrc schema.
    #[error("Validation error in '{path}': {report}")]
    ValidationError {
        path: String,
        report: ValidationReport,
    },
}
