//! Config lookup and the repository type gate.

use super::{RepositoryType, Resolver};
use crate::config::{parse_config, ConfigError, ProjectRc, ValidationReport};
use tracing::{debug, info_span, warn, Instrument};

/// Outcome of looking up a repository's config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLookup {
    /// A valid config.
    Found(ProjectRc),
    /// A config exists but does not match the schema.
    Invalid(ValidationReport),
    /// No config, or it could not be read.
    NotFound,
}

impl ConfigLookup {
    /// The config, if one was found and is valid.
    #[must_use]
    pub fn found(self) -> Option<ProjectRc> {
        match self {
            Self::Found(config) => Some(config),
            _ => None,
        }
    }
}

impl Resolver {
    /// Looks up and validates the config of `owner/repo`.
    ///
    /// Repositories of the primary account carry their own config; other
    /// owners' configs live in the registry repository. Network, decode and
    /// syntax failures are logged and reported as [`ConfigLookup::NotFound`].
    pub async fn resolve_config(&self, owner: &str, repo: &str) -> ConfigLookup {
        let span = info_span!("resolve_config", owner = %owner, repo = %repo);

        async {
            let Some((source, path)) = self.settings.config_location(owner, repo) else {
                debug!("Foreign owner and no registry configured");
                return ConfigLookup::NotFound;
            };

            let file = match self.github.file(&source.owner, &source.name, &path).await {
                Ok(Some(file)) => file,
                Ok(None) => {
                    debug!(source = %source, path = %path, "No config file");
                    return ConfigLookup::NotFound;
                }
                Err(e) => {
                    warn!(source = %source, path = %path, error = %e, "Failed to fetch config");
                    return ConfigLookup::NotFound;
                }
            };

            let origin = format!("{source}/{path}");
            match parse_config(&file.text, self.settings.format(), &origin) {
                Ok(config) => ConfigLookup::Found(config),
                Err(ConfigError::ValidationError { report, .. }) => {
                    warn!(origin = %origin, issues = report.issues.len(), "Config failed validation");
                    ConfigLookup::Invalid(report)
                }
                Err(e) => {
                    warn!(origin = %origin, error = %e, "Failed to parse config");
                    ConfigLookup::NotFound
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Classifies a repository; `None` if it cannot be fetched.
    pub async fn get_repository_type(&self, owner: &str, repo: &str) -> Option<RepositoryType> {
        match self.github.repository(owner, repo).await {
            Ok(info) => Some(RepositoryType::from_flags(
                info.fork,
                info.archived,
                info.private,
            )),
            Err(e) => {
                if !e.is_not_found() {
                    warn!(owner, repo, error = %e, "Failed to fetch repository");
                }
                None
            }
        }
    }
}
