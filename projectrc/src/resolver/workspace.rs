//! Resolution of workspace repositories, one project per package.

use super::extras::{npm_target, VersionSource};
use super::{fields, ResolveError, ResolvedProject, Resolver};
use crate::config::{Override, ProjectRc};
use crate::github::RepositoryMetadata;
use crate::packages::{PackageJson, WorkspaceMatcher};
use tracing::{debug, info, info_span, Instrument};

impl Resolver {
    /// Resolves every package of a workspace repository.
    ///
    /// Packages are the directories matched by the root `package.json`
    /// `workspaces` globs, minus `workspace.ignores` and packages whose
    /// override sets `ignore`. Output follows tree order.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Precondition`] if workspace mode is disabled,
    /// the root manifest or its `workspaces` field is missing, the tree is
    /// truncated or empty, or a matched package has no `name`.
    pub async fn resolve_workspace_projects(
        &self,
        owner: &str,
        repo: &str,
        config: &ProjectRc,
        repository: &RepositoryMetadata,
    ) -> Result<Vec<ResolvedProject>, ResolveError> {
        let span = info_span!("resolve_workspace_projects", owner = %owner, repo = %repo);

        async {
            let workspace = config.enabled_workspace().ok_or_else(|| {
                ResolveError::precondition("workspace mode is not enabled in this config")
            })?;

            let root = self
                .read_manifest(owner, repo, "package.json")
                .await?
                .ok_or_else(|| {
                    ResolveError::precondition(format!(
                        "workspace is enabled but {owner}/{repo} has no package.json"
                    ))
                })?;

            let patterns = root.workspace_patterns();
            if patterns.is_empty() {
                return Err(ResolveError::precondition(format!(
                    "workspace is enabled but the package.json of {owner}/{repo} has no `workspaces` field, please add one or disable `workspace.enabled`"
                )));
            }

            let branch = repository.default_branch().ok_or_else(|| {
                ResolveError::precondition(format!("{owner}/{repo} has no default branch"))
            })?;

            let tree = self.github.tree(owner, repo, branch).await?;
            if tree.truncated {
                return Err(ResolveError::precondition(format!(
                    "the file tree of {owner}/{repo} is too large to resolve workspaces"
                )));
            }
            if tree.tree.is_empty() {
                return Err(ResolveError::precondition(format!(
                    "the file tree of {owner}/{repo} is empty"
                )));
            }

            let matcher = WorkspaceMatcher::new(patterns, &workspace.ignores)?;
            let directories = matcher.package_directories(&tree);
            info!(count = directories.len(), "Matched workspace packages");

            let mut projects = Vec::with_capacity(directories.len());
            for directory in &directories {
                let manifest_path = format!("{directory}/package.json");
                let manifest = self
                    .read_manifest(owner, repo, &manifest_path)
                    .await?
                    .ok_or_else(|| {
                        ResolveError::precondition(format!("could not read {manifest_path}"))
                    })?;

                let name = manifest.name().map(str::to_string).ok_or_else(|| {
                    ResolveError::precondition(format!(
                        "could not find a `name` field in {manifest_path}, please add one"
                    ))
                })?;

                let overrides = config.find_override(&name);
                if overrides.is_some_and(Override::is_ignored) {
                    debug!(package = %name, "Package ignored by override");
                    continue;
                }

                let project = self
                    .resolve_package(
                        owner,
                        repo,
                        config,
                        repository,
                        Package {
                            directory,
                            manifest_path: &manifest_path,
                            name,
                            manifest: &manifest,
                            overrides,
                        },
                    )
                    .await?;
                projects.push(project);
            }

            Ok(projects)
        }
        .instrument(span)
        .await
    }

    async fn resolve_package(
        &self,
        owner: &str,
        repo: &str,
        config: &ProjectRc,
        repository: &RepositoryMetadata,
        package: Package<'_>,
    ) -> Result<ResolvedProject, ResolveError> {
        let overrides = package.overrides;
        let extras = fields::resolve_extras(overrides, config);
        let npm = npm_target(extras.as_ref(), Some(package.manifest), package.manifest_path)?;

        let readme = self
            .readme_link(
                owner,
                repo,
                fields::resolve_readme_setting(overrides, config),
                Some(package.directory),
            )
            .await;

        let extras = self
            .resolve_extras(
                owner,
                repo,
                extras.as_ref(),
                repository,
                npm,
                VersionSource::Release,
            )
            .await?;

        Ok(ResolvedProject {
            name: package.name,
            description: fields::resolve_description(overrides, config, repository),
            readme,
            website: fields::resolve_website(overrides, config, repository),
            meta: fields::resolve_meta(overrides, config),
            extras,
        })
    }
}

/// A matched workspace package.
struct Package<'a> {
    directory: &'a str,
    manifest_path: &'a str,
    name: String,
    manifest: &'a PackageJson,
    overrides: Option<&'a Override>,
}
