//! projectrc configuration: schema, file generations and the typed model.
//!
//! This module turns the raw content of a projectrc file into a validated
//! [`ProjectRc`]. Parsing happens in three steps:
//!
//! 1. the file is read as TOML or JSON depending on its [`ConfigFormat`],
//!    and legacy layouts are adapted to the canonical one,
//! 2. the value is checked against the schema, collecting every issue,
//! 3. the value is mapped onto the typed model.

mod error;
mod format;
mod model;
mod schema;

pub use error::ConfigError;
pub use format::ConfigFormat;
pub use model::{
    Deprecation, Extras, Meta, NpmOptions, NpmSetting, Override, ProjectRc, Setting, Workspace,
};
pub use schema::{json_schema, validate, ValidationIssue, ValidationReport};

use tracing::debug;

/// Parses and validates the content of a projectrc file.
///
/// # Arguments
///
/// * `source` - Raw file content
/// * `format` - Generation the file belongs to
/// * `origin` - Where the content came from, used in error messages
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] with every field-level issue when
/// the content does not match the schema, or a parse error when the content
/// is not valid TOML/JSON.
pub fn parse_config(
    source: &str,
    format: ConfigFormat,
    origin: &str,
) -> Result<ProjectRc, ConfigError> {
    debug!(origin, %format, "Parsing projectrc");

    let value = format.read(source, origin)?;

    validate(&value).map_err(|report| ConfigError::ValidationError {
        path: origin.to_string(),
        report,
    })?;

    serde_json::from_value(value).map_err(|source| ConfigError::JsonError {
        path: origin.to_string(),
        source,
    })
}
