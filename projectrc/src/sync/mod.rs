//! Commits the projects listing to a GitHub repository.

mod error;

pub use error::SyncError;

use crate::github::{encode_content, GitHubClient, PutFile};
use crate::listing::list_projects;
use crate::resolver::{ResolvedProject, Resolver};
use crate::types::RepositoryRef;
use tracing::{info, info_span, Instrument};

/// Default commit message.
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore: update projects listing";

/// Where the listing is committed.
#[derive(Debug, Clone)]
pub struct SyncTarget {
    /// Repository receiving the file.
    repository: RepositoryRef,
    /// Path of the file inside the repository.
    path: String,
    /// Branch to commit to; the default branch when unset.
    branch: Option<String>,
    /// Commit message.
    message: String,
}

impl SyncTarget {
    /// Creates a target committing to the default branch.
    pub fn new(repository: RepositoryRef, path: impl Into<String>) -> Self {
        Self {
            repository,
            path: path.into().trim_start_matches('/').to_string(),
            branch: None,
            message: DEFAULT_COMMIT_MESSAGE.to_string(),
        }
    }

    /// Sets the branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Sets the commit message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Repository receiving the listing.
    pub fn repository(&self) -> &RepositoryRef {
        &self.repository
    }

    /// Path of the listing file, without a leading slash.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Branch to commit to; the default branch when unset.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Commit message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result of a sync.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SyncOutcome {
    /// A commit was created.
    Committed { sha: String },
    /// The file already had this content.
    Unchanged,
}

/// Renders projects the way they are committed.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_listing(projects: &[ResolvedProject]) -> Result<String, SyncError> {
    let mut rendered = serde_json::to_string_pretty(projects)?;
    rendered.push('\n');
    Ok(rendered)
}

/// Builds the listing and commits it to `target`.
///
/// `committer` is a client authenticated with the commit token.
///
/// # Errors
///
/// Returns an error if the listing cannot be built or the commit fails.
pub async fn sync_listing(
    resolver: &Resolver,
    committer: &GitHubClient,
    target: &SyncTarget,
) -> Result<SyncOutcome, SyncError> {
    let span = info_span!(
        "sync_listing",
        repo = %target.repository,
        path = %target.path
    );

    async {
        let listing = list_projects(resolver).await?;
        let content = render_listing(&listing.projects)?;
        commit_file(committer, target, &content).await
    }
    .instrument(span)
    .await
}

/// Writes `content` to the target file unless it already matches.
///
/// # Errors
///
/// Returns an error if reading or writing the file fails.
pub async fn commit_file(
    committer: &GitHubClient,
    target: &SyncTarget,
    content: &str,
) -> Result<SyncOutcome, SyncError> {
    let RepositoryRef { owner, name } = &target.repository;

    let current = committer
        .file_at(owner, name, &target.path, target.branch())
        .await?;
    if current.as_ref().is_some_and(|file| file.text == content) {
        info!("Listing unchanged");
        return Ok(SyncOutcome::Unchanged);
    }

    let body = PutFile {
        message: target.message.clone(),
        content: encode_content(content),
        sha: current.map(|file| file.sha),
        branch: target.branch.clone(),
    };
    let sha = committer.put_file(owner, name, &target.path, &body).await?;

    info!(sha = %sha, "Committed listing");
    Ok(SyncOutcome::Committed { sha })
}
