//! GitHub REST and GraphQL access.
//!
//! [`GitHubClient`] wraps an authenticated [`Octocrab`] instance and exposes
//! the handful of endpoints projectrc needs, decoding file payloads and
//! mapping HTTP 404 to [`GitHubError::NotFound`] so callers can tell
//! absence apart from failure.

mod error;
mod graphql;
mod models;

pub use error::GitHubError;
pub use models::{
    BranchRef, FileContent, GitTree, Language, Owner, PutFile, Release, RepositoryInfo,
    RepositoryMetadata, TreeEntry,
};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use graphql::{GraphQlRequest, GraphQlResponse, RepositoryData, ViewerData};
use models::{ContentPayload, PutFileResponse};
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

/// Default GitHub API endpoint.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Authenticated GitHub API client.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    api_url: String,
}

impl GitHubClient {
    /// Creates a client for api.github.com.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(token: impl Into<String>) -> Result<Self, GitHubError> {
        Self::with_base_url(token, GITHUB_API_URL)
    }

    /// Creates a client for a custom API endpoint (GitHub Enterprise, tests).
    ///
    /// Requests are sent once; failed requests are never retried.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> Result<Self, GitHubError> {
        let parsed = Url::parse(base_url).map_err(|source| GitHubError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        let api_url = parsed.as_str().trim_end_matches('/').to_string();
        let octocrab = Octocrab::builder()
            .personal_token(token.into())
            .base_uri(api_url.as_str())?
            .add_retry_config(RetryConfig::None)
            .build()?;

        Ok(Self { octocrab, api_url })
    }

    /// Base URL of the API, without a trailing slash.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Absolute URL of a route on this API.
    #[must_use]
    pub fn url_for(&self, route: &str) -> String {
        format!("{}{}", self.api_url, route)
    }

    /// API URL of a file in the contents API.
    #[must_use]
    pub fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        self.url_for(&repo_route(owner, repo, &["contents", path]))
    }

    /// API URL of the default README endpoint.
    #[must_use]
    pub fn readme_url(&self, owner: &str, repo: &str) -> String {
        self.url_for(&repo_route(owner, repo, &["readme"]))
    }

    async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T, GitHubError> {
        debug!(route, "GET");
        self.octocrab
            .get::<T, _, ()>(route, None)
            .await
            .map_err(|e| GitHubError::from_octocrab(e, route))
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: String,
        variables: Value,
    ) -> Result<T, GitHubError> {
        let request = GraphQlRequest { query, variables };
        let response: GraphQlResponse<T> = self
            .octocrab
            .graphql(&request)
            .await
            .map_err(|e| GitHubError::from_octocrab(e, "/graphql"))?;
        response.into_data()
    }

    /// Fetches the REST representation of a repository.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::NotFound`] if the repository does not exist.
    pub async fn repository(&self, owner: &str, repo: &str) -> Result<RepositoryInfo, GitHubError> {
        self.get_json(&repo_route(owner, repo, &[])).await
    }

    /// Fetches repository metadata with the GraphQL `repository` query.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::NotFound`] if the repository does not exist.
    pub async fn repository_metadata(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<RepositoryMetadata, GitHubError> {
        let data: RepositoryData = self
            .graphql(
                graphql::repository_query(),
                json!({ "owner": owner, "name": repo }),
            )
            .await?;

        data.repository.ok_or_else(|| GitHubError::NotFound {
            resource: format!("{owner}/{repo}"),
        })
    }

    /// Reads a file through the contents API.
    ///
    /// Returns `Ok(None)` when the path does not exist or is not a file.
    ///
    /// # Errors
    ///
    /// Returns an error for API failures or undecodable content.
    pub async fn file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<Option<FileContent>, GitHubError> {
        self.file_at(owner, repo, path, None).await
    }

    /// Reads a file on a specific branch, tag or commit.
    ///
    /// # Errors
    ///
    /// Returns an error for API failures or undecodable content.
    pub async fn file_at(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        reference: Option<&str>,
    ) -> Result<Option<FileContent>, GitHubError> {
        let mut route = repo_route(owner, repo, &["contents", path]);
        if let Some(reference) = reference {
            route.push_str("?ref=");
            route.push_str(&encode_segment(reference));
        }
        self.content_at(&route, path).await
    }

    /// Reads the repository's default README (`GET /repos/{owner}/{repo}/readme`).
    ///
    /// # Errors
    ///
    /// Returns an error for API failures or undecodable content.
    pub async fn readme(&self, owner: &str, repo: &str) -> Result<Option<FileContent>, GitHubError> {
        let route = repo_route(owner, repo, &["readme"]);
        self.content_at(&route, "README.md").await
    }

    async fn content_at(
        &self,
        route: &str,
        fallback_path: &str,
    ) -> Result<Option<FileContent>, GitHubError> {
        let value: Value = match self.get_json(route).await {
            Ok(value) => value,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };

        // Directories come back as arrays.
        let Ok(payload) = serde_json::from_value::<ContentPayload>(value) else {
            return Ok(None);
        };
        let Some(content) = payload.content else {
            return Ok(None);
        };

        let path = payload.path.unwrap_or_else(|| fallback_path.to_string());
        let text = decode_content(&content, &path)?;

        Ok(Some(FileContent {
            path,
            sha: payload.sha.unwrap_or_default(),
            text,
        }))
    }

    /// Fetches the full recursive tree of a branch.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::NotFound`] if the branch does not exist.
    pub async fn tree(&self, owner: &str, repo: &str, branch: &str) -> Result<GitTree, GitHubError> {
        let route = format!("{}?recursive=1", repo_route(owner, repo, &["git", "trees", branch]));
        self.get_json(&route).await
    }

    /// Fetches the latest published release.
    ///
    /// Returns `Ok(None)` if the repository has no releases.
    ///
    /// # Errors
    ///
    /// Returns an error for API failures.
    pub async fn latest_release(&self, owner: &str, repo: &str) -> Result<Option<Release>, GitHubError> {
        match self
            .get_json(&repo_route(owner, repo, &["releases", "latest"]))
            .await
        {
            Ok(release) => Ok(Some(release)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Lists the public, non-fork repositories of the token owner.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fails.
    pub async fn viewer_repositories(&self) -> Result<Vec<RepositoryMetadata>, GitHubError> {
        let mut repositories = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let data: ViewerData = self
                .graphql(
                    graphql::viewer_repositories_query(),
                    json!({ "cursor": cursor }),
                )
                .await?;

            let connection = data.viewer.repositories;
            repositories.extend(connection.nodes);

            match connection.page_info.end_cursor {
                Some(next) if connection.page_info.has_next_page => cursor = Some(next),
                _ => break,
            }
        }

        debug!(count = repositories.len(), "Listed viewer repositories");
        Ok(repositories)
    }

    /// Creates or updates a file, returning the commit SHA.
    ///
    /// # Errors
    ///
    /// Returns an error if GitHub rejects the write.
    pub async fn put_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        body: &PutFile,
    ) -> Result<String, GitHubError> {
        let route = repo_route(owner, repo, &["contents", path]);
        debug!(route = %route, "PUT");
        let response: PutFileResponse = self
            .octocrab
            .put(&route, Some(body))
            .await
            .map_err(|e| GitHubError::from_octocrab(e, &route))?;
        Ok(response.commit.sha)
    }
}

/// Builds `/repos/{owner}/{repo}/...`, percent-encoding every segment
/// while keeping `/` inside paths.
fn repo_route(owner: &str, repo: &str, rest: &[&str]) -> String {
    let mut route = format!("/repos/{}/{}", encode_segment(owner), encode_segment(repo));
    for part in rest {
        for segment in part.split('/').filter(|segment| !segment.is_empty()) {
            route.push('/');
            route.push_str(&encode_segment(segment));
        }
    }
    route
}

fn encode_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Decodes a base64 contents payload (GitHub wraps it at 60 columns).
pub(crate) fn decode_content(content: &str, path: &str) -> Result<String, GitHubError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact).map_err(|e| {
        warn!(path, error = %e, "Invalid base64 content");
        GitHubError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        }
    })?;

    String::from_utf8(bytes).map_err(|e| GitHubError::Decode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Encodes file content for the contents API.
pub fn encode_content(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}
