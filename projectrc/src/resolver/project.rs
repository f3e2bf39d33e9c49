//! Resolved output types.

use crate::config::{Deprecation, Meta, ProjectRc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A project ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedProject {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// URL of this service's README endpoint for the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<ResolvedExtras>,
}

/// Enrichments with concrete values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedExtras {
    /// Stargazer count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<u64>,

    /// Latest release tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm: Option<NpmInfo>,
}

impl ResolvedExtras {
    /// Returns true if no extra was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_none()
            && self.version.is_none()
            && self.deprecated.is_none()
            && self.npm.is_none()
    }
}

/// Resolved npm package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmInfo {
    pub name: String,
    pub url: String,

    /// Downloads over the last month.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<u64>,
}

/// Response of a full resolution: the config and its projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedProjectRc {
    #[serde(rename = "$projectrc")]
    pub projectrc: ProjectRc,

    pub projects: Vec<ResolvedProject>,
}

/// A README fetched from GitHub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadmeDocument {
    pub content: String,

    /// API URL the README was fetched from.
    pub path: String,
}

/// Kind of repository, as far as resolution is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepositoryType {
    Fork,
    Archived,
    Public,
    Private,
}

impl RepositoryType {
    /// Picks the type from GitHub's flags.
    ///
    /// Fork wins over archived, archived over public. Only an explicit
    /// `private: false` counts as public.
    #[must_use]
    pub fn from_flags(fork: Option<bool>, archived: Option<bool>, private: Option<bool>) -> Self {
        if fork == Some(true) {
            Self::Fork
        } else if archived == Some(true) {
            Self::Archived
        } else if private == Some(false) {
            Self::Public
        } else {
            Self::Private
        }
    }

    /// Lowercase name, as serialized.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fork => "fork",
            Self::Archived => "archived",
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for RepositoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
