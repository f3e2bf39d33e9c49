//! Listing of every project of the token owner.
//!
//! Repositories are resolved concurrently, one task each. A repository that
//! fails to resolve is logged and left out; it never fails the listing.

mod result;
mod summary;

pub use result::RepositoryResult;
pub use summary::{FailedRepository, ListingSummary};

use crate::github::RepositoryMetadata;
use crate::resolver::{ResolveError, ResolvedProject, Resolver};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error, info, info_span, Instrument};

/// Every resolved project, with counts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectListing {
    pub projects: Vec<ResolvedProject>,
    pub summary: ListingSummary,
}

/// Resolves every public, non-fork repository of the token owner.
///
/// # Errors
///
/// Returns an error only if the repository list cannot be fetched.
pub async fn list_projects(resolver: &Resolver) -> Result<ProjectListing, ResolveError> {
    let span = info_span!("list_projects");

    async {
        let repositories = resolver.github().viewer_repositories().await?;
        info!(count = repositories.len(), "Listing repositories");

        let mut listing = ProjectListing {
            projects: Vec::new(),
            summary: ListingSummary {
                repositories_seen: repositories.len(),
                ..Default::default()
            },
        };

        let results = join_all(
            repositories
                .iter()
                .map(|repository| process_repository(resolver, repository)),
        )
        .await;

        for result in results {
            listing.summary.record_result(&result);
            match result {
                RepositoryResult::Resolved {
                    repository,
                    projects,
                } => {
                    debug!(repo = %repository, count = projects.len(), "Resolved repository");
                    listing.projects.extend(projects);
                }
                RepositoryResult::Skipped { repository, reason } => {
                    debug!(repo = %repository, reason = %reason, "Skipped repository");
                }
                RepositoryResult::Failed { .. } => {}
            }
        }

        info!(
            resolved = listing.summary.resolved,
            skipped = listing.summary.skipped,
            failed = listing.summary.failed,
            "Listing complete"
        );
        Ok(listing)
    }
    .instrument(span)
    .await
}

async fn process_repository(resolver: &Resolver, repository: &RepositoryMetadata) -> RepositoryResult {
    let owner = repository
        .owner_login()
        .unwrap_or_else(|| resolver.settings().account());
    let full_name = format!("{owner}/{}", repository.name);

    if repository.is_archived {
        return RepositoryResult::Skipped {
            repository: full_name,
            reason: "archived".to_string(),
        };
    }
    if repository.is_fork || repository.is_private {
        return RepositoryResult::Skipped {
            repository: full_name,
            reason: "not public".to_string(),
        };
    }

    match resolver.resolve_projectrc(owner, &repository.name).await {
        Ok(Some(resolved)) => RepositoryResult::Resolved {
            repository: full_name,
            projects: resolved.projects,
        },
        Ok(None) => RepositoryResult::Skipped {
            repository: full_name,
            reason: "no projectrc".to_string(),
        },
        Err(e) => {
            error!(repo = %full_name, error = %e, "Failed to resolve repository");
            RepositoryResult::Failed {
                repository: full_name,
                error: e.to_string(),
            }
        }
    }
}
