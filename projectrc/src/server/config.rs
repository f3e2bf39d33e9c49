//! HTTP service configuration.

use crate::github::GitHubClient;
use crate::sync::SyncTarget;

/// Default shared-cache lifetime in seconds.
pub const DEFAULT_CACHE_TTL: u64 = 3600;

/// Settings of the HTTP service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Lifetime of cached responses in the edge cache.
    cache_ttl: u64,
    /// Bearer token that forces a fresh response.
    revalidate_token: Option<String>,
    /// Alternative bearer token that forces a fresh response.
    isr_bypass_token: Option<String>,
    /// Bearer token required by `POST /cron/sync`.
    cron_secret: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            revalidate_token: None,
            isr_bypass_token: None,
            cron_secret: None,
        }
    }
}

impl ServiceConfig {
    /// Sets the cache lifetime.
    pub fn with_cache_ttl(mut self, seconds: u64) -> Self {
        self.cache_ttl = seconds;
        self
    }

    /// Sets the revalidation token.
    pub fn with_revalidate_token(mut self, token: Option<String>) -> Self {
        self.revalidate_token = token.filter(|token| !token.is_empty());
        self
    }

    /// Sets the bypass token.
    pub fn with_isr_bypass_token(mut self, token: Option<String>) -> Self {
        self.isr_bypass_token = token.filter(|token| !token.is_empty());
        self
    }

    /// Sets the cron secret.
    pub fn with_cron_secret(mut self, secret: Option<String>) -> Self {
        self.cron_secret = secret.filter(|secret| !secret.is_empty());
        self
    }

    /// Edge cache lifetime in seconds.
    pub fn cache_ttl(&self) -> u64 {
        self.cache_ttl
    }

    /// Secret expected by `POST /cron/sync`.
    pub fn cron_secret(&self) -> Option<&str> {
        self.cron_secret.as_deref()
    }

    /// Returns true if `token` forces a fresh response.
    pub fn is_revalidation_token(&self, token: &str) -> bool {
        [&self.revalidate_token, &self.isr_bypass_token]
            .into_iter()
            .flatten()
            .any(|expected| expected == token)
    }
}

/// Listing sync triggered by `POST /cron/sync`.
#[derive(Debug, Clone)]
pub struct SyncJob {
    /// Client authenticated with the commit token.
    pub committer: GitHubClient,
    pub target: SyncTarget,
}
