//! Config file generations.
//!
//! Two generations of the projectrc file exist: the legacy TOML file and
//! the current JSON file. Both are read into the same JSON value and
//! adapted to the canonical layout before validation.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Options the TOML generation accepted at the top level; the canonical
/// layout keeps them under `extras`.
const LEGACY_EXTRAS_KEYS: &[&str] = &["npm", "stars", "version", "deprecated"];

/// Format (and generation) of the projectrc file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// Legacy `.github/projectrc.toml`.
    Toml,

    /// Current `.github/.projectrc.json`.
    #[default]
    Json,
}

impl ConfigFormat {
    /// File extension without the leading dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Toml => "toml",
            Self::Json => "json",
        }
    }

    /// Path of the config file inside a repository that owns it.
    #[must_use]
    pub fn config_path(self) -> &'static str {
        match self {
            Self::Toml => ".github/projectrc.toml",
            Self::Json => ".github/.projectrc.json",
        }
    }

    /// Path of a config inside the registry repository.
    ///
    /// Format: `.github/{namespace}/{owner}/{repo}.{ext}`, with owner and
    /// repository lower-cased.
    #[must_use]
    pub fn registry_path(self, namespace: &str, owner: &str, repo: &str) -> String {
        format!(
            ".github/{}/{}/{}.{}",
            namespace,
            owner.to_lowercase(),
            repo.to_lowercase(),
            self.extension()
        )
    }

    /// Parses raw file content into a JSON value in the canonical layout.
    pub(crate) fn read(self, source: &str, origin: &str) -> Result<Value, ConfigError> {
        let value = match self {
            Self::Toml => {
                toml::from_str::<Value>(source).map_err(|source| ConfigError::TomlError {
                    path: origin.to_string(),
                    source,
                })?
            }
            Self::Json => {
                serde_json::from_str::<Value>(source).map_err(|source| ConfigError::JsonError {
                    path: origin.to_string(),
                    source,
                })?
            }
        };

        Ok(self.adapt(value))
    }

    /// Rewrites a generation-specific document into the canonical layout.
    fn adapt(self, mut value: Value) -> Value {
        if self == Self::Toml {
            if let Some(root) = value.as_object_mut() {
                lift_legacy_extras(root);
            }
        }
        value
    }
}

/// Moves top-level extras into `extras`, unless `extras` already defines
/// them. Conflicting keys stay where they are so validation reports them.
fn lift_legacy_extras(root: &mut Map<String, Value>) {
    let movable: Vec<&str> = LEGACY_EXTRAS_KEYS
        .iter()
        .copied()
        .filter(|key| {
            !root
                .get("extras")
                .and_then(Value::as_object)
                .is_some_and(|extras| extras.contains_key(*key))
        })
        .collect();

    let mut lifted = Map::new();
    for key in movable {
        if let Some(value) = root.remove(key) {
            lifted.insert((*key).to_string(), value);
        }
    }

    if lifted.is_empty() {
        return;
    }

    match root.get_mut("extras") {
        Some(Value::Object(extras)) => extras.extend(lifted),
        Some(_) => {
            // `extras` has the wrong type; put the keys back and let validation complain.
            root.extend(lifted);
        }
        None => {
            root.insert("extras".to_string(), Value::Object(lifted));
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ConfigFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown config format '{other}', expected toml or json")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn registry_path_is_case_folded() {
        let path = ConfigFormat::Json.registry_path("projectrc", "SomeOne", "My-Repo");
        assert_eq!(path, ".github/projectrc/someone/my-repo.json");
    }

    #[test]
    fn toml_lifts_legacy_extras() {
        let value = ConfigFormat::Toml
            .read(
                r#"
readme = true
stars = true

[npm]
enabled = true
"#,
                "test",
            )
            .unwrap();

        assert_eq!(
            value,
            json!({
                "readme": true,
                "extras": { "stars": true, "npm": { "enabled": true } }
            })
        );
    }

    #[test]
    fn toml_keeps_conflicting_legacy_keys() {
        let value = ConfigFormat::Toml
            .read(
                r#"
stars = true

[extras]
stars = false
"#,
                "test",
            )
            .unwrap();

        assert_eq!(value, json!({ "stars": true, "extras": { "stars": false } }));
    }

    #[test]
    fn json_is_not_adapted() {
        let value = ConfigFormat::Json
            .read(r#"{ "stars": true }"#, "test")
            .unwrap();
        assert_eq!(value, json!({ "stars": true }));
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("TOML".parse::<ConfigFormat>(), Ok(ConfigFormat::Toml));
        assert_eq!("json".parse::<ConfigFormat>(), Ok(ConfigFormat::Json));
        assert!("yaml".parse::<ConfigFormat>().is_err());
    }
}
