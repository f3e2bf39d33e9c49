//! Listing summary.

use super::result::RepositoryResult;
use serde::Serialize;

/// A repository whose resolution failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedRepository {
    pub repository: String,
    pub error: String,
}

/// Counts of a listing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ListingSummary {
    /// Repositories returned by GitHub.
    pub repositories_seen: usize,

    /// Repositories that produced projects.
    pub resolved: usize,

    /// Repositories left out on purpose (archived, no config, opted out).
    pub skipped: usize,

    /// Repositories whose resolution failed.
    pub failed: usize,

    /// Name and error of each failed repository.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedRepository>,
}

impl ListingSummary {
    /// Updates the summary with a repository result.
    pub fn record_result(&mut self, result: &RepositoryResult) {
        match result {
            RepositoryResult::Resolved { .. } => self.resolved += 1,
            RepositoryResult::Skipped { .. } => self.skipped += 1,
            RepositoryResult::Failed { repository, error } => {
                self.failed += 1;
                self.failures.push(FailedRepository {
                    repository: repository.clone(),
                    error: error.clone(),
                });
            }
        }
    }

    /// Returns true if any repository failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
