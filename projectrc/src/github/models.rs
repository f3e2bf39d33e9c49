//! GitHub response models.

use serde::{Deserialize, Serialize};

/// Repository as returned by `GET /repos/{owner}/{repo}`.
///
/// Only the flags needed to gate resolution are kept.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,

    #[serde(default)]
    pub private: Option<bool>,

    #[serde(default)]
    pub fork: Option<bool>,

    #[serde(default)]
    pub archived: Option<bool>,

    #[serde(default)]
    pub visibility: Option<String>,

    #[serde(default)]
    pub default_branch: Option<String>,
}

/// Repository snapshot from the GraphQL `Repository` type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadata {
    pub name: String,

    #[serde(default)]
    pub name_with_owner: String,

    #[serde(default)]
    pub owner: Option<Owner>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub homepage_url: Option<String>,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub stargazer_count: u64,

    #[serde(default)]
    pub is_private: bool,

    #[serde(default)]
    pub is_fork: bool,

    #[serde(default)]
    pub is_archived: bool,

    #[serde(default)]
    pub default_branch_ref: Option<BranchRef>,

    #[serde(default)]
    pub primary_language: Option<Language>,
}

impl RepositoryMetadata {
    /// Name of the default branch, if the repository has any commits.
    #[must_use]
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch_ref
            .as_ref()
            .map(|branch| branch.name.as_str())
    }

    /// Homepage URL; GitHub reports an empty string when none is set.
    #[must_use]
    pub fn homepage(&self) -> Option<&str> {
        self.homepage_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// Description, ignoring empty strings.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|description| !description.trim().is_empty())
    }

    /// Login of the owning account.
    #[must_use]
    pub fn owner_login(&self) -> Option<&str> {
        self.owner.as_ref().map(|owner| owner.login.as_str())
    }
}

/// Owning account of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
}

/// A git ref, by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    pub name: String,
}

/// Primary language as reported by GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,

    #[serde(default)]
    pub color: Option<String>,
}

/// A decoded file from the contents API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    /// Path of the file inside the repository.
    pub path: String,

    /// Blob SHA, needed to update the file.
    pub sha: String,

    /// UTF-8 content.
    pub text: String,
}

/// Raw contents API payload for a single file.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ContentPayload {
    #[serde(default)]
    pub content: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    #[serde(default)]
    pub sha: Option<String>,
}

/// Recursive git tree from `GET /repos/{owner}/{repo}/git/trees/{sha}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitTree {
    #[serde(default)]
    pub sha: String,

    #[serde(default)]
    pub tree: Vec<TreeEntry>,

    /// Set when the tree exceeded GitHub's size limit.
    #[serde(default)]
    pub truncated: bool,
}

/// One entry of a git tree.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    pub path: String,

    #[serde(rename = "type")]
    pub kind: String,
}

impl TreeEntry {
    /// Returns true for directories.
    #[must_use]
    pub fn is_tree(&self) -> bool {
        self.kind == "tree"
    }

    /// Returns true for files.
    #[must_use]
    pub fn is_blob(&self) -> bool {
        self.kind == "blob"
    }
}

/// Latest release from `GET /repos/{owner}/{repo}/releases/latest`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub tag_name: Option<String>,

    #[serde(default)]
    pub name: Option<String>,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Clone, Serialize)]
pub struct PutFile {
    pub message: String,

    /// Base64 encoded content.
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PutFileResponse {
    pub commit: CommitRef,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CommitRef {
    pub sha: String,
}
