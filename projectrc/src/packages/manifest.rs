//! The subset of `package.json` projectrc reads.

use super::PackageError;
use serde::Deserialize;

/// Parsed `package.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageJson {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub private: Option<bool>,

    #[serde(default)]
    pub workspaces: Option<Workspaces>,
}

/// `workspaces` in either the npm array form or the yarn object form.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Workspaces {
    Patterns(Vec<String>),
    Yarn {
        #[serde(default)]
        packages: Vec<String>,
    },
}

impl PackageJson {
    /// Parses a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::Manifest`] if the content is not a valid manifest.
    pub fn parse(source: &str, path: &str) -> Result<Self, PackageError> {
        serde_json::from_str(source).map_err(|source| PackageError::Manifest {
            path: path.to_string(),
            source,
        })
    }

    /// Non-empty package name.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }

    /// Returns true if the package is marked `private`.
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.private.unwrap_or(false)
    }

    /// Workspace patterns, empty when the manifest declares none.
    #[must_use]
    pub fn workspace_patterns(&self) -> &[String] {
        match &self.workspaces {
            Some(Workspaces::Patterns(patterns)) => patterns,
            Some(Workspaces::Yarn { packages }) => packages,
            None => &[],
        }
    }
}
