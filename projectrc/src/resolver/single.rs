//! Resolution of a repository that is a single project.

use super::extras::{npm_target, VersionSource};
use super::{fields, ResolveError, ResolvedProject, Resolver};
use crate::config::ProjectRc;
use crate::github::RepositoryMetadata;
use tracing::{info_span, Instrument};

const ROOT_MANIFEST: &str = "package.json";

impl Resolver {
    /// Resolves the repository itself as one project.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Precondition`] when npm is enabled without a
    /// resolvable package name, or when `extras.version` finds neither a
    /// release nor an npm version.
    pub async fn resolve_single_project(
        &self,
        owner: &str,
        repo: &str,
        config: &ProjectRc,
        repository: &RepositoryMetadata,
    ) -> Result<ResolvedProject, ResolveError> {
        let span = info_span!("resolve_single_project", owner = %owner, repo = %repo);

        async {
            let extras = fields::resolve_extras(None, config);

            let npm_enabled = fields::resolve_npm_setting(extras.as_ref())
                .is_some_and(|npm| npm.options().enabled);
            let manifest = if npm_enabled {
                self.read_manifest(owner, repo, ROOT_MANIFEST).await?
            } else {
                None
            };
            let npm = npm_target(extras.as_ref(), manifest.as_ref(), ROOT_MANIFEST)?;

            let readme = self
                .readme_link(
                    owner,
                    repo,
                    fields::resolve_readme_setting(None, config),
                    None,
                )
                .await;

            let extras = self
                .resolve_extras(
                    owner,
                    repo,
                    extras.as_ref(),
                    repository,
                    npm,
                    VersionSource::ReleaseOrNpm,
                )
                .await?;

            let name = if repository.name.is_empty() {
                repo.to_string()
            } else {
                repository.name.clone()
            };

            Ok(ResolvedProject {
                name,
                description: fields::resolve_description(None, config, repository),
                readme,
                website: fields::resolve_website(None, config, repository),
                meta: fields::resolve_meta(None, config),
                extras,
            })
        }
        .instrument(span)
        .await
    }
}
