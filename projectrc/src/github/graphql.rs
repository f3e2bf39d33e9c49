//! GraphQL queries and response envelopes.

use super::models::RepositoryMetadata;
use super::GitHubError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const REPOSITORY_FIELDS: &str = "
    name
    nameWithOwner
    owner { login }
    description
    homepageUrl
    url
    stargazerCount
    isPrivate
    isFork
    isArchived
    defaultBranchRef { name }
    primaryLanguage { name color }
";

/// Repositories fetched per page of `viewer.repositories`.
pub(crate) const VIEWER_PAGE_SIZE: u32 = 100;

pub(crate) fn repository_query() -> String {
    format!(
        "query ($owner: String!, $name: String!) {{
  repository(owner: $owner, name: $name) {{{REPOSITORY_FIELDS}  }}
}}"
    )
}

pub(crate) fn viewer_repositories_query() -> String {
    format!(
        "query ($cursor: String) {{
  viewer {{
    repositories(first: {VIEWER_PAGE_SIZE}, after: $cursor, privacy: PUBLIC, isFork: false, orderBy: {{ field: UPDATED_AT, direction: DESC }}) {{
      nodes {{{REPOSITORY_FIELDS}      }}
      pageInfo {{ hasNextPage endCursor }}
    }}
  }}
}}"
    )
}

/// Request body sent to `POST /graphql`.
#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest {
    pub query: String,
    pub variables: Value,
}

/// Response envelope of `POST /graphql`.
#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,

    #[serde(default)]
    pub errors: Vec<GraphQlErrorEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorEntry {
    pub message: String,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl<T> GraphQlResponse<T> {
    /// Returns the data unless the response carries errors other than
    /// `NOT_FOUND`; missing nodes then surface as `null` in the data.
    pub(crate) fn into_data(self) -> Result<T, GitHubError> {
        let fatal: Vec<&str> = self
            .errors
            .iter()
            .filter(|error| error.kind.as_deref() != Some("NOT_FOUND"))
            .map(|error| error.message.as_str())
            .collect();

        if !fatal.is_empty() {
            return Err(GitHubError::GraphQl {
                message: fatal.join("; "),
            });
        }

        self.data.ok_or_else(|| GitHubError::GraphQl {
            message: "response contained no data".to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryData {
    pub repository: Option<RepositoryMetadata>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ViewerData {
    pub viewer: Viewer,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Viewer {
    pub repositories: RepositoryConnection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RepositoryConnection {
    #[serde(default)]
    pub nodes: Vec<RepositoryMetadata>,
    pub page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageInfo {
    pub has_next_page: bool,

    #[serde(default)]
    pub end_cursor: Option<String>,
}
