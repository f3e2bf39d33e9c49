//! Typed projectrc model.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A validated projectrc document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRc {
    /// Project description; falls back to the repository description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opts the repository out of resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<bool>,

    /// README to expose (`true` for the default README, or a path).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<Setting>,

    /// Website (`true` for the repository homepage, `false` to hide, or a URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<Setting>,

    /// Page metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    /// Optional enrichments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Extras>,

    /// Workspace settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Workspace>,
}

impl ProjectRc {
    /// Returns true if the repository opted out.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.ignore.unwrap_or(false)
    }

    /// Returns the workspace block when workspace mode is enabled.
    #[must_use]
    pub fn enabled_workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref().filter(|workspace| workspace.enabled)
    }

    /// Looks up the override for a workspace package by name.
    #[must_use]
    pub fn find_override(&self, name: &str) -> Option<&Override> {
        self.workspace
            .as_ref()?
            .overrides
            .iter()
            .find(|entry| entry.name == name)
    }
}

/// A value that is either a switch or an explicit string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Setting {
    Enabled(bool),
    Value(String),
}

/// Page metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
}

/// Optional enrichments of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extras {
    /// Show the star count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stars: Option<bool>,

    /// Show the latest released version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<bool>,

    /// Deprecation notice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<Deprecation>,

    /// npm package link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm: Option<NpmSetting>,
}

/// Deprecation notice shown with a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement: Option<String>,
}

/// The `extras.npm` option: a switch or detailed options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NpmSetting {
    Enabled(bool),
    Options(NpmOptions),
}

impl NpmSetting {
    /// Expands the setting into explicit options.
    ///
    /// `true` is shorthand for `{ enabled: true, downloads: true }`.
    #[must_use]
    pub fn options(&self) -> NpmOptions {
        match self {
            Self::Enabled(enabled) => NpmOptions {
                enabled: *enabled,
                name: None,
                downloads: Some(*enabled),
            },
            Self::Options(options) => options.clone(),
        }
    }
}

/// Detailed `extras.npm` options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmOptions {
    pub enabled: bool,

    /// Package name; inferred from `package.json` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether to fetch the last-month download count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<bool>,
}

/// Workspace (monorepo) settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub enabled: bool,

    /// gitignore-style patterns of package paths to skip.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignores: Vec<String>,

    /// Per-package overrides. A map keyed by package name is accepted and
    /// normalised into a list with the key stored in `name`.
    #[serde(
        default,
        deserialize_with = "deserialize_overrides",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub overrides: Vec<Override>,
}

/// Partial config applied to one workspace package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Override {
    /// `name` of the package in its `package.json`.
    #[serde(default)]
    pub name: String,

    /// Leaves the package out of the output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<Setting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<Setting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extras: Option<Extras>,
}

impl Override {
    /// Returns true if the package should be dropped.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.ignore.unwrap_or(false)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OverridesInput {
    List(Vec<Override>),
    Map(BTreeMap<String, Override>),
}

fn deserialize_overrides<'de, D>(deserializer: D) -> Result<Vec<Override>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match OverridesInput::deserialize(deserializer)? {
        OverridesInput::List(list) => list,
        OverridesInput::Map(map) => map
            .into_iter()
            .map(|(name, mut entry)| {
                entry.name = name;
                entry
            })
            .collect(),
    })
}
