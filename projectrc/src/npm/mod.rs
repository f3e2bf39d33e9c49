//! npm registry and download-count lookups.

mod error;

pub use error::NpmError;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Default npm registry.
pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Default npm downloads API.
pub const NPM_DOWNLOADS_URL: &str = "https://api.npmjs.org";

/// Client for the npm registry and the npm downloads API.
#[derive(Debug, Clone)]
pub struct NpmClient {
    client: Client,
    registry_url: String,
    downloads_url: String,
}

impl Default for NpmClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NpmClient {
    /// Creates a client for the public npm endpoints.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_urls(NPM_REGISTRY_URL, NPM_DOWNLOADS_URL)
    }

    /// Creates a client for custom endpoints.
    #[must_use]
    pub fn with_base_urls(registry_url: &str, downloads_url: &str) -> Self {
        Self {
            client: Client::new(),
            registry_url: registry_url.trim_end_matches('/').to_string(),
            downloads_url: downloads_url.trim_end_matches('/').to_string(),
        }
    }

    /// Public package page on npmjs.com.
    #[must_use]
    pub fn package_url(name: &str) -> String {
        format!("https://www.npmjs.com/package/{name}")
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String, package: &str) -> Result<T, NpmError> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| NpmError::Http {
                url: url.clone(),
                source,
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(NpmError::NotFound {
                package: package.to_string(),
            });
        }

        response
            .error_for_status()
            .map_err(|source| NpmError::Http {
                url: url.clone(),
                source,
            })?
            .json()
            .await
            .map_err(|source| NpmError::Http { url, source })
    }

    /// Last-month download count of a package.
    ///
    /// # Errors
    ///
    /// Returns [`NpmError::MissingField`] if the response has no `downloads`
    /// number.
    pub async fn last_month_downloads(&self, package: &str) -> Result<u64, NpmError> {
        let url = format!("{}/downloads/point/last-month/{package}", self.downloads_url);
        let body: Value = self.get_json(url, package).await?;

        body.get("downloads")
            .and_then(Value::as_u64)
            .ok_or_else(|| NpmError::MissingField {
                package: package.to_string(),
                field: "downloads".to_string(),
            })
    }

    /// `dist-tags.latest` of a package.
    ///
    /// # Errors
    ///
    /// Returns [`NpmError::MissingField`] if the package has no latest tag.
    pub async fn latest_version(&self, package: &str) -> Result<String, NpmError> {
        let url = format!("{}/{}", self.registry_url, registry_path(package));
        let body: Value = self.get_json(url, package).await?;

        body.pointer("/dist-tags/latest")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| NpmError::MissingField {
                package: package.to_string(),
                field: "dist-tags.latest".to_string(),
            })
    }
}

/// Registry document path of a package; the scope separator is encoded.
fn registry_path(package: &str) -> String {
    match package.strip_prefix('@') {
        Some(scoped) => format!("@{}", urlencoding::encode(scoped)),
        None => urlencoding::encode(package).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn builds_package_url() {
        assert_eq!(
            NpmClient::package_url("@luxass/utils"),
            "https://www.npmjs.com/package/@luxass/utils"
        );
    }

    #[test]
    fn encodes_scoped_registry_paths() {
        assert_eq!(registry_path("@luxass/utils"), "@luxass%2Futils");
        assert_eq!(registry_path("projectrc"), "projectrc");
    }

    #[tokio::test]
    async fn reads_download_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/downloads/point/last-month/projectrc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "downloads": 1234,
                "package": "projectrc"
            })))
            .mount(&server)
            .await;

        let client = NpmClient::with_base_urls(&server.uri(), &server.uri());
        assert_eq!(client.last_month_downloads("projectrc").await.unwrap(), 1234);
    }

    #[tokio::test]
    async fn missing_downloads_field_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/downloads/point/last-month/projectrc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
            .mount(&server)
            .await;

        let client = NpmClient::with_base_urls(&server.uri(), &server.uri());
        let error = client.last_month_downloads("projectrc").await.unwrap_err();
        assert!(matches!(error, NpmError::MissingField { .. }));
    }

    #[tokio::test]
    async fn reads_latest_dist_tag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projectrc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projectrc",
                "dist-tags": { "latest": "2.1.0" }
            })))
            .mount(&server)
            .await;

        let client = NpmClient::with_base_urls(&server.uri(), &server.uri());
        assert_eq!(client.latest_version("projectrc").await.unwrap(), "2.1.0");
    }

    #[tokio::test]
    async fn unknown_package_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Not found" })))
            .mount(&server)
            .await;

        let client = NpmClient::with_base_urls(&server.uri(), &server.uri());
        assert!(client.latest_version("missing").await.unwrap_err().is_not_found());
    }
}
