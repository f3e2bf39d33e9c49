//! GitHub client error types.

use thiserror::Error;

/// Errors that can occur while talking to GitHub.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    GitHubError(#[from] octocrab::Error),

    /// The requested resource does not exist (HTTP 404 or a null GraphQL node).
    #[error("GitHub resource not found: {resource}")]
    NotFound { resource: String },

    /// The GraphQL endpoint answered with errors.
    #[error("GitHub GraphQL error: {message}")]
    GraphQl { message: String },

    /// The API base URL is malformed.
    #[error("Invalid GitHub API URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A file payload could not be decoded.
    #[error("Failed to decode '{path}': {message}")]
    Decode { path: String, message: String },
}

impl GitHubError {
    /// Maps an octocrab error, turning HTTP 404 into [`GitHubError::NotFound`].
    pub(crate) fn from_octocrab(error: octocrab::Error, resource: &str) -> Self {
        if is_not_found(&error) {
            Self::NotFound {
                resource: resource.to_string(),
            }
        } else {
            Self::GitHubError(error)
        }
    }

    /// Returns true if the error means the resource is absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn is_not_found(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::GitHub { source, .. } if source.status_code.as_u16() == 404
    )
}
