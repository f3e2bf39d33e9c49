//! Listing sync error types.

use crate::github::GitHubError;
use crate::resolver::ResolveError;
use thiserror::Error;

/// Errors that can occur while committing the listing.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The listing could not be built.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Reading or writing the target file failed.
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// The listing could not be serialized.
    #[error("Failed to serialize listing: {0}")]
    Serialize(#[from] serde_json::Error),
}
