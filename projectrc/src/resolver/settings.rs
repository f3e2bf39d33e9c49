//! Resolver settings.

use crate::config::ConfigFormat;
use crate::types::RepositoryRef;

/// Default folder inside the registry repository's `.github` directory.
pub const DEFAULT_NAMESPACE: &str = "projectrc";

/// Default public URL of the service, used to build README links.
pub const DEFAULT_PUBLIC_URL: &str = "https://projectrc.luxass.dev";

/// Settings shared by every resolution.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    /// Account whose repositories carry their own config file.
    account: String,
    /// Repository holding configs for repositories of other owners.
    registry: Option<RepositoryRef>,
    /// Folder inside `.github` of the registry repository.
    namespace: String,
    /// Config generation to read.
    format: ConfigFormat,
    /// Public base URL of the HTTP service.
    public_url: String,
}

impl ResolverSettings {
    /// Creates settings for the given primary account.
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
            registry: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            format: ConfigFormat::default(),
            public_url: DEFAULT_PUBLIC_URL.to_string(),
        }
    }

    /// Sets the registry repository.
    pub fn with_registry(mut self, registry: RepositoryRef) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Sets the registry namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets the config generation.
    pub fn with_format(mut self, format: ConfigFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the public URL.
    pub fn with_public_url(mut self, public_url: impl Into<String>) -> Self {
        self.public_url = public_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Primary account.
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Registry repository, if configured.
    pub fn registry(&self) -> Option<&RepositoryRef> {
        self.registry.as_ref()
    }

    /// Folder inside `.github` of the registry repository.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Config generation to read.
    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    /// Public base URL, without a trailing slash.
    pub fn public_url(&self) -> &str {
        &self.public_url
    }

    /// Returns true if `owner` is the primary account (case-insensitive).
    pub fn owns(&self, owner: &str) -> bool {
        self.account.eq_ignore_ascii_case(owner)
    }

    /// Where the config of `owner/repo` lives: repository and path.
    ///
    /// `None` when the owner is foreign and no registry is configured.
    pub fn config_location(&self, owner: &str, repo: &str) -> Option<(RepositoryRef, String)> {
        if self.owns(owner) {
            return Some((
                RepositoryRef::new(owner, repo),
                self.format.config_path().to_string(),
            ));
        }

        self.registry.as_ref().map(|registry| {
            (
                registry.clone(),
                self.format.registry_path(&self.namespace, owner, repo),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_repositories_carry_their_config() {
        let settings = ResolverSettings::new("luxass");
        let (repository, path) = settings.config_location("LuxAss", "projectrc").unwrap();
        assert_eq!(repository.to_string(), "LuxAss/projectrc");
        assert_eq!(path, ".github/.projectrc.json");
    }

    #[test]
    fn foreign_repositories_use_the_registry() {
        let settings = ResolverSettings::new("luxass")
            .with_registry(RepositoryRef::new("luxass", "luxass"))
            .with_format(ConfigFormat::Toml);
        let (repository, path) = settings.config_location("Vercel", "Next.js").unwrap();
        assert_eq!(repository.to_string(), "luxass/luxass");
        assert_eq!(path, ".github/projectrc/vercel/next.js.toml");
    }

    #[test]
    fn foreign_repositories_without_registry_have_no_config() {
        let settings = ResolverSettings::new("luxass");
        assert!(settings.config_location("vercel", "next.js").is_none());
    }

    #[test]
    fn public_url_is_trimmed() {
        let settings = ResolverSettings::new("luxass").with_public_url("http://localhost:3000/");
        assert_eq!(settings.public_url(), "http://localhost:3000");
    }
}
