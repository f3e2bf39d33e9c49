//! Project resolution.
//!
//! [`Resolver`] turns a repository into resolved projects:
//!
//! 1. [`Resolver::resolve_config`] finds and validates the config,
//! 2. repository metadata is fetched over GraphQL,
//! 3. the repository is resolved either as a workspace
//!    ([`Resolver::resolve_workspace_projects`]) or as a single project
//!    ([`Resolver::resolve_single_project`]).
//!
//! Absence is quiet (`None`), misconfiguration is loud
//! ([`ResolveError::Precondition`]).

mod error;
mod extras;
pub mod fields;
mod lookup;
mod project;
mod readme;
mod settings;
mod single;
mod workspace;

pub use error::ResolveError;
pub use lookup::ConfigLookup;
pub use project::{
    NpmInfo, ReadmeDocument, RepositoryType, ResolvedExtras, ResolvedProject, ResolvedProjectRc,
};
pub use readme::normalize_readme_path;
pub use settings::{ResolverSettings, DEFAULT_NAMESPACE, DEFAULT_PUBLIC_URL};

use crate::github::{GitHubClient, GitHubError, RepositoryMetadata};
use crate::npm::NpmClient;
use crate::packages::PackageJson;
use tracing::{debug, info, info_span, Instrument};

/// Resolves repositories into projects.
#[derive(Debug, Clone)]
pub struct Resolver {
    github: GitHubClient,
    npm: NpmClient,
    settings: ResolverSettings,
}

impl Resolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(github: GitHubClient, npm: NpmClient, settings: ResolverSettings) -> Self {
        Self {
            github,
            npm,
            settings,
        }
    }

    /// GitHub client used for every lookup.
    pub fn github(&self) -> &GitHubClient {
        &self.github
    }

    /// Settings of this resolver.
    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Fetches repository metadata; `None` if the repository does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error for API failures other than absence.
    pub async fn repository_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<RepositoryMetadata>, ResolveError> {
        match self.github.repository_metadata(owner, repo).await {
            Ok(metadata) => Ok(Some(metadata)),
            Err(GitHubError::NotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves a repository's config and projects.
    ///
    /// Returns `Ok(None)` if the repository has no config, opted out with
    /// `ignore: true`, or does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidConfig`] for configs that fail the
    /// schema, and [`ResolveError::Precondition`] for misconfigured
    /// repositories.
    pub async fn resolve_projectrc(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<ResolvedProjectRc>, ResolveError> {
        let span = info_span!("resolve_projectrc", owner = %owner, repo = %repo);

        async {
            let config = match self.resolve_config(owner, repo).await {
                ConfigLookup::Found(config) => config,
                ConfigLookup::Invalid(report) => return Err(ResolveError::InvalidConfig(report)),
                ConfigLookup::NotFound => return Ok(None),
            };

            if config.is_ignored() {
                debug!("Repository opted out");
                return Ok(None);
            }

            let Some(repository) = self.repository_metadata(owner, repo).await? else {
                debug!("Repository not found");
                return Ok(None);
            };

            let projects = if config.enabled_workspace().is_some() {
                self.resolve_workspace_projects(owner, repo, &config, &repository)
                    .await?
            } else {
                vec![
                    self.resolve_single_project(owner, repo, &config, &repository)
                        .await?,
                ]
            };

            info!(count = projects.len(), "Resolved projects");
            Ok(Some(ResolvedProjectRc {
                projectrc: config,
                projects,
            }))
        }
        .instrument(span)
        .await
    }

    /// Reads and parses a `package.json`; `None` if the file is absent.
    pub(crate) async fn read_manifest(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<PackageJson>, ResolveError> {
        let Some(file) = self.github.file(owner, repo, path).await? else {
            return Ok(None);
        };
        Ok(Some(PackageJson::parse(&file.text, path)?))
    }
}
