//! Per-repository listing outcome.

use crate::resolver::ResolvedProject;

/// Result of resolving one repository of the listing.
#[derive(Debug, Clone)]
pub enum RepositoryResult {
    /// The repository resolved into projects.
    Resolved {
        /// Repository full name.
        repository: String,
        projects: Vec<ResolvedProject>,
    },

    /// The repository was left out.
    Skipped {
        /// Repository full name.
        repository: String,
        /// Reason for skipping.
        reason: String,
    },

    /// Resolution failed; the repository is left out.
    Failed {
        /// Repository full name.
        repository: String,
        /// Error message.
        error: String,
    },
}
