//! README lookup.

use super::{ReadmeDocument, Resolver};
use crate::config::Setting;
use tracing::{debug, warn};

/// Normalizes a README path.
///
/// Leading slashes are stripped and `/README.md` is appended unless the
/// path already points at a `README.md`. Empty paths select the
/// repository's default README.
#[must_use]
pub fn normalize_readme_path(path: &str) -> Option<String> {
    let trimmed = path.trim().trim_start_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.ends_with("README.md") {
        Some(trimmed.to_string())
    } else {
        Some(format!("{}/README.md", trimmed.trim_end_matches('/')))
    }
}

impl Resolver {
    /// Fetches a README.
    ///
    /// With `path` the file at the normalized path is read, otherwise the
    /// repository's default README. Every failure yields `None`.
    pub async fn get_readme(
        &self,
        owner: &str,
        repo: &str,
        path: Option<&str>,
    ) -> Option<ReadmeDocument> {
        let normalized = path.and_then(normalize_readme_path);

        let (result, url) = match &normalized {
            Some(path) => (
                self.github.file(owner, repo, path).await,
                self.github.contents_url(owner, repo, path),
            ),
            None => (
                self.github.readme(owner, repo).await,
                self.github.readme_url(owner, repo),
            ),
        };

        match result {
            Ok(Some(file)) => Some(ReadmeDocument {
                content: file.text,
                path: url,
            }),
            Ok(None) => {
                debug!(owner, repo, path = ?normalized, "README not found");
                None
            }
            Err(e) => {
                warn!(owner, repo, path = ?normalized, error = %e, "Failed to fetch README");
                None
            }
        }
    }

    /// Resolves a README setting into a link to this service's README
    /// endpoint, if the README exists.
    ///
    /// `package_path` is the package directory in workspace mode; `true`
    /// then points at the package's own README.
    pub(crate) async fn readme_link(
        &self,
        owner: &str,
        repo: &str,
        setting: Option<&Setting>,
        package_path: Option<&str>,
    ) -> Option<String> {
        let path = match (setting?, package_path) {
            (Setting::Enabled(false), _) => return None,
            (Setting::Enabled(true), Some(directory)) => Some(format!("/{directory}/README.md")),
            (Setting::Enabled(true), None) => None,
            (Setting::Value(path), _) => Some(path.clone()),
        };

        let normalized = path.as_deref().and_then(normalize_readme_path);
        self.get_readme(owner, repo, normalized.as_deref()).await?;

        let base = format!(
            "{}/resolve/{}/{}/readme",
            self.settings.public_url(),
            owner,
            repo
        );
        Some(match normalized {
            Some(path) => format!("{base}/{path}"),
            None => base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_paths() {
        assert_eq!(
            normalize_readme_path("/README.md").as_deref(),
            Some("README.md")
        );
        assert_eq!(
            normalize_readme_path("packages/a").as_deref(),
            Some("packages/a/README.md")
        );
        assert_eq!(
            normalize_readme_path("/packages/a/").as_deref(),
            Some("packages/a/README.md")
        );
        assert_eq!(
            normalize_readme_path("docs/README.md").as_deref(),
            Some("docs/README.md")
        );
        assert_eq!(normalize_readme_path("/"), None);
        assert_eq!(normalize_readme_path(""), None);
    }
}
