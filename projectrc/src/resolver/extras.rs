//! Enrichment fetches: stars, latest version, npm package and downloads.

use super::{NpmInfo, ResolveError, ResolvedExtras, Resolver};
use crate::config::Extras;
use crate::github::RepositoryMetadata;
use crate::npm::NpmClient;
use crate::packages::PackageJson;
use tracing::debug;

/// npm package to describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct NpmTarget {
    pub name: String,
    pub downloads: bool,
}

/// Where `extras.version` may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VersionSource {
    /// Latest GitHub release only.
    Release,
    /// Latest GitHub release, then the npm `latest` dist-tag.
    ReleaseOrNpm,
}

/// Decides which npm package to describe, if any.
///
/// Disabled settings and private packages yield `None`. An enabled setting
/// needs a name, either explicit or from the manifest.
pub(crate) fn npm_target(
    extras: Option<&Extras>,
    manifest: Option<&PackageJson>,
    manifest_path: &str,
) -> Result<Option<NpmTarget>, ResolveError> {
    let Some(options) = extras.and_then(|e| e.npm.as_ref()).map(|npm| npm.options()) else {
        return Ok(None);
    };
    if !options.enabled || manifest.is_some_and(PackageJson::is_private) {
        return Ok(None);
    }

    let name = match options.name {
        Some(name) => name,
        None => match manifest {
            Some(manifest) => manifest.name().map(str::to_string).ok_or_else(|| {
                ResolveError::precondition(format!(
                    "could not find a `name` field in {manifest_path}, please add a `name` field to your package.json or set `extras.npm.name`"
                ))
            })?,
            None => {
                return Err(ResolveError::precondition(format!(
                    "could not find {manifest_path}, please add a `name` field to your package.json or set `extras.npm.name`"
                )))
            }
        },
    };

    Ok(Some(NpmTarget {
        name,
        downloads: options.downloads.unwrap_or(false),
    }))
}

impl Resolver {
    /// Resolves merged extras into concrete values.
    pub(crate) async fn resolve_extras(
        &self,
        owner: &str,
        repo: &str,
        extras: Option<&Extras>,
        repository: &RepositoryMetadata,
        npm: Option<NpmTarget>,
        version_source: VersionSource,
    ) -> Result<Option<ResolvedExtras>, ResolveError> {
        let Some(extras) = extras else {
            return Ok(None);
        };

        let stars = (extras.stars == Some(true)).then_some(repository.stargazer_count);

        let version = if extras.version == Some(true) {
            Some(
                self.resolve_version(owner, repo, npm.as_ref(), version_source)
                    .await?,
            )
        } else {
            None
        };

        let npm = match npm {
            Some(target) => Some(self.resolve_npm(target).await?),
            None => None,
        };

        let resolved = ResolvedExtras {
            stars,
            version,
            deprecated: extras.deprecated.clone(),
            npm,
        };

        Ok((!resolved.is_empty()).then_some(resolved))
    }

    async fn resolve_version(
        &self,
        owner: &str,
        repo: &str,
        npm: Option<&NpmTarget>,
        version_source: VersionSource,
    ) -> Result<String, ResolveError> {
        let release = self.github.latest_release(owner, repo).await?;
        if let Some(tag) = release.and_then(|release| release.tag_name) {
            return Ok(tag);
        }

        match (version_source, npm) {
            (VersionSource::ReleaseOrNpm, Some(target)) => {
                debug!(package = %target.name, "No release, using npm dist-tag");
                Ok(self.npm.latest_version(&target.name).await?)
            }
            _ => Err(ResolveError::precondition(format!(
                "could not find a release for {owner}/{repo}, publish a GitHub release or disable `extras.version`"
            ))),
        }
    }

    async fn resolve_npm(&self, target: NpmTarget) -> Result<NpmInfo, ResolveError> {
        let downloads = if target.downloads {
            Some(self.npm.last_month_downloads(&target.name).await?)
        } else {
            None
        };

        Ok(NpmInfo {
            url: NpmClient::package_url(&target.name),
            name: target.name,
            downloads,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NpmOptions, NpmSetting};

    fn extras(npm: NpmSetting) -> Extras {
        Extras {
            npm: Some(npm),
            ..Default::default()
        }
    }

    fn manifest(source: &str) -> PackageJson {
        PackageJson::parse(source, "package.json").unwrap()
    }

    #[test]
    fn true_means_enabled_with_downloads() {
        let target = npm_target(
            Some(&extras(NpmSetting::Enabled(true))),
            Some(&manifest(r#"{ "name": "projectrc" }"#)),
            "package.json",
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            target,
            NpmTarget {
                name: "projectrc".to_string(),
                downloads: true
            }
        );
    }

    #[test]
    fn explicit_name_wins() {
        let setting = NpmSetting::Options(NpmOptions {
            enabled: true,
            name: Some("@luxass/projectrc".to_string()),
            downloads: None,
        });
        let target = npm_target(Some(&extras(setting)), None, "package.json")
            .unwrap()
            .unwrap();

        assert_eq!(target.name, "@luxass/projectrc");
        assert!(!target.downloads);
    }

    #[test]
    fn private_packages_are_skipped() {
        let target = npm_target(
            Some(&extras(NpmSetting::Enabled(true))),
            Some(&manifest(r#"{ "name": "internal", "private": true }"#)),
            "package.json",
        )
        .unwrap();
        assert!(target.is_none());
    }

    #[test]
    fn missing_name_is_a_precondition_error() {
        let error = npm_target(
            Some(&extras(NpmSetting::Enabled(true))),
            Some(&manifest("{}")),
            "package.json",
        )
        .unwrap_err();

        assert!(error.to_string().starts_with("projectrc: "));
        assert!(error.to_string().contains("please add a `name` field"));

        let error =
            npm_target(Some(&extras(NpmSetting::Enabled(true))), None, "package.json").unwrap_err();
        assert!(matches!(error, ResolveError::Precondition { .. }));
    }

    #[test]
    fn disabled_npm_is_skipped() {
        let target = npm_target(
            Some(&extras(NpmSetting::Enabled(false))),
            None,
            "package.json",
        )
        .unwrap();
        assert!(target.is_none());
        assert!(npm_target(None, None, "package.json").unwrap().is_none());
    }
}
