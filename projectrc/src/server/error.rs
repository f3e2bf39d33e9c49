//! HTTP error responses.

use crate::config::{ValidationIssue, ValidationReport};
use crate::resolver::ResolveError;
use crate::sync::SyncError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Message returned for every authorization failure.
pub const FORBIDDEN_MESSAGE: &str = "you are not allowed to access this resource";

/// Errors returned by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Nothing to serve.
    #[error("{0}")]
    NotFound(String),

    /// Bad bearer token or non-public repository.
    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,

    /// The config does not match the schema.
    #[error("invalid projectrc")]
    InvalidConfig(ValidationReport),

    /// Resolution failed.
    #[error(transparent)]
    Resolve(ResolveError),

    /// Sync failed.
    #[error(transparent)]
    Sync(SyncError),

    /// The endpoint is not configured.
    #[error("{0}")]
    Unavailable(String),
}

impl ApiError {
    /// HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::InvalidConfig(_) | Self::Resolve(_) | Self::Sync(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(error: ResolveError) -> Self {
        match error {
            ResolveError::InvalidConfig(report) => Self::InvalidConfig(report),
            other => Self::Resolve(other),
        }
    }
}

impl From<SyncError> for ApiError {
    fn from(error: SyncError) -> Self {
        match error {
            SyncError::Resolve(error) => error.into(),
            other => Self::Sync(other),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<Vec<ValidationIssue>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_string(),
            issues: match self {
                Self::InvalidConfig(report) => Some(report.issues),
                _ => None,
            },
        };

        (status, Json(body)).into_response()
    }
}
