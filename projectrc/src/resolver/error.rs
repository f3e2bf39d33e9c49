//! Resolution error types.

use crate::config::ValidationReport;
use crate::github::GitHubError;
use crate::npm::NpmError;
use crate::packages::PackageError;
use thiserror::Error;

/// Errors that can occur while resolving projects.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The repository is misconfigured; the message tells the owner how to fix it.
    #[error("projectrc: {message}")]
    Precondition { message: String },

    /// The config does not match the schema.
    #[error("invalid projectrc: {0}")]
    InvalidConfig(ValidationReport),

    /// GitHub API error.
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// npm API error.
    #[error(transparent)]
    Npm(#[from] NpmError),

    /// Manifest or workspace pattern error.
    #[error(transparent)]
    Package(#[from] PackageError),
}

impl ResolveError {
    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition {
            message: message.into(),
        }
    }
}
