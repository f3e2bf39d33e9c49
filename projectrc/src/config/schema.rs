//! The canonical projectrc schema.
//!
//! A single declarative [`Shape`] tree describes every recognised option.
//! The same tree drives [`validate`], which reports every field-level issue
//! instead of stopping at the first, and [`json_schema`], which renders a
//! JSON Schema document for editors and the `/schema` endpoint.

use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt;

/// A single field-level problem found while validating a config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Dotted path of the offending field (e.g. `extras.npm.name`).
    /// Empty for the document root.
    pub path: String,

    /// Human readable description of the problem.
    pub message: String,
}

/// Every issue found in one config document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            let path = if issue.path.is_empty() {
                "(root)"
            } else {
                issue.path.as_str()
            };
            write!(f, "{path}: {}", issue.message)?;
        }
        Ok(())
    }
}

/// Shape of a value accepted by the schema.
#[derive(Debug, Clone)]
pub(crate) enum Shape {
    Bool,
    String,
    StringList,
    /// Accepts the first alternative whose JSON kind matches the value.
    Either(Box<Shape>, Box<Shape>),
    Object(Vec<Field>),
    List(Box<Shape>),
    /// An object with arbitrary keys whose values share one shape.
    Map(Box<Shape>),
}

#[derive(Debug, Clone)]
pub(crate) struct Field {
    name: &'static str,
    description: &'static str,
    shape: Shape,
    required: bool,
}

impl Field {
    fn optional(name: &'static str, description: &'static str, shape: Shape) -> Self {
        Self {
            name,
            description,
            shape,
            required: false,
        }
    }

    fn required(name: &'static str, description: &'static str, shape: Shape) -> Self {
        Self {
            name,
            description,
            shape,
            required: true,
        }
    }
}

impl Shape {
    fn either(a: Shape, b: Shape) -> Self {
        Self::Either(Box::new(a), Box::new(b))
    }

    /// Whether the JSON kind of `value` is the kind this shape expects.
    fn accepts_kind(&self, value: &Value) -> bool {
        match self {
            Self::Bool => value.is_boolean(),
            Self::String => value.is_string(),
            Self::StringList | Self::List(_) => value.is_array(),
            Self::Object(_) | Self::Map(_) => value.is_object(),
            Self::Either(a, b) => a.accepts_kind(value) || b.accepts_kind(value),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Bool => "a boolean".to_string(),
            Self::String => "a string".to_string(),
            Self::StringList => "a list of strings".to_string(),
            Self::Object(_) | Self::Map(_) => "an object".to_string(),
            Self::List(_) => "a list".to_string(),
            Self::Either(a, b) => format!("{} or {}", a.describe(), b.describe()),
        }
    }

    fn check(&self, value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
        if !self.accepts_kind(value) {
            issues.push(ValidationIssue {
                path: path.to_string(),
                message: format!("expected {}", self.describe()),
            });
            return;
        }

        match self {
            Self::Bool | Self::String => {}
            Self::StringList => {
                for (i, item) in value.as_array().into_iter().flatten().enumerate() {
                    Self::String.check(item, &index_path(path, i), issues);
                }
            }
            Self::Either(a, b) => {
                if a.accepts_kind(value) {
                    a.check(value, path, issues);
                } else {
                    b.check(value, path, issues);
                }
            }
            Self::Object(fields) => {
                let Some(object) = value.as_object() else {
                    return;
                };
                for field in fields {
                    match object.get(field.name) {
                        Some(inner) => {
                            field.shape.check(inner, &child_path(path, field.name), issues)
                        }
                        None if field.required => issues.push(ValidationIssue {
                            path: child_path(path, field.name),
                            message: "required option is missing".to_string(),
                        }),
                        None => {}
                    }
                }
                for key in object.keys() {
                    if !fields.iter().any(|field| field.name == key) {
                        issues.push(ValidationIssue {
                            path: child_path(path, key),
                            message: "unknown option".to_string(),
                        });
                    }
                }
            }
            Self::List(item) => {
                for (i, inner) in value.as_array().into_iter().flatten().enumerate() {
                    item.check(inner, &index_path(path, i), issues);
                }
            }
            Self::Map(item) => {
                for (key, inner) in value.as_object().into_iter().flatten() {
                    item.check(inner, &child_path(path, key), issues);
                }
            }
        }
    }

    fn to_json_schema(&self) -> Value {
        match self {
            Self::Bool => json!({ "type": "boolean" }),
            Self::String => json!({ "type": "string" }),
            Self::StringList => json!({ "type": "array", "items": { "type": "string" } }),
            Self::Either(a, b) => json!({ "anyOf": [a.to_json_schema(), b.to_json_schema()] }),
            Self::Object(fields) => {
                let mut properties = Map::new();
                let mut required = Vec::new();
                for field in fields {
                    let mut schema = field.shape.to_json_schema();
                    if let Some(object) = schema.as_object_mut() {
                        object.insert("description".to_string(), json!(field.description));
                    }
                    properties.insert(field.name.to_string(), schema);
                    if field.required {
                        required.push(json!(field.name));
                    }
                }
                let mut schema = json!({
                    "type": "object",
                    "properties": properties,
                    "additionalProperties": false,
                });
                if !required.is_empty() {
                    schema["required"] = Value::Array(required);
                }
                schema
            }
            Self::List(item) => json!({ "type": "array", "items": item.to_json_schema() }),
            Self::Map(item) => json!({
                "type": "object",
                "additionalProperties": item.to_json_schema(),
            }),
        }
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

fn meta_shape() -> Shape {
    Shape::Object(vec![
        Field::optional("title", "Title used for the project page.", Shape::String),
        Field::optional(
            "description",
            "Description used for the project page.",
            Shape::String,
        ),
        Field::optional(
            "keywords",
            "Keywords used for the project page.",
            Shape::StringList,
        ),
    ])
}

fn extras_shape() -> Shape {
    let deprecated = Shape::Object(vec![
        Field::required("message", "Why the project is deprecated.", Shape::String),
        Field::optional(
            "replacement",
            "Project or URL that replaces this one.",
            Shape::String,
        ),
    ]);
    let npm = Shape::either(
        Shape::Bool,
        Shape::Object(vec![
            Field::required("enabled", "Whether npm information is shown.", Shape::Bool),
            Field::optional(
                "name",
                "Package name; inferred from package.json when omitted.",
                Shape::String,
            ),
            Field::optional(
                "downloads",
                "Whether the last-month download count is shown.",
                Shape::Bool,
            ),
        ]),
    );

    Shape::Object(vec![
        Field::optional("stars", "Show the repository star count.", Shape::Bool),
        Field::optional(
            "version",
            "Show the latest released version.",
            Shape::Bool,
        ),
        Field::optional("deprecated", "Mark the project as deprecated.", deprecated),
        Field::optional(
            "npm",
            "Link the npm package; `true` also shows downloads.",
            npm,
        ),
    ])
}

fn setting_shape() -> Shape {
    Shape::either(Shape::Bool, Shape::String)
}

fn override_shape(name_required: bool) -> Shape {
    let name_description = "Name of the workspace package this override applies to.";
    let name = if name_required {
        Field::required("name", name_description, Shape::String)
    } else {
        Field::optional("name", name_description, Shape::String)
    };

    Shape::Object(vec![
        name,
        Field::optional("ignore", "Leave this package out entirely.", Shape::Bool),
        Field::optional("description", "Package description.", Shape::String),
        Field::optional(
            "readme",
            "`true` for the package README, or a README path.",
            setting_shape(),
        ),
        Field::optional(
            "website",
            "`true` for the repository homepage, `false` to hide, or a URL.",
            setting_shape(),
        ),
        Field::optional("meta", "Page metadata.", meta_shape()),
        Field::optional("extras", "Optional enrichments.", extras_shape()),
    ])
}

/// The schema of a projectrc document.
pub(crate) fn config_shape() -> Shape {
    let workspace = Shape::Object(vec![
        Field::required(
            "enabled",
            "Resolve one project per workspace package.",
            Shape::Bool,
        ),
        Field::optional(
            "ignores",
            "gitignore-style patterns of package paths to skip.",
            Shape::StringList,
        ),
        Field::optional(
            "overrides",
            "Per-package overrides, as a list or keyed by package name.",
            Shape::either(
                Shape::List(Box::new(override_shape(true))),
                Shape::Map(Box::new(override_shape(false))),
            ),
        ),
    ]);

    Shape::Object(vec![
        Field::optional("$schema", "Schema reference for editors.", Shape::String),
        Field::optional("description", "Project description.", Shape::String),
        Field::optional(
            "ignore",
            "Opt the repository out of resolution.",
            Shape::Bool,
        ),
        Field::optional(
            "readme",
            "`true` for the default README, or a README path.",
            setting_shape(),
        ),
        Field::optional(
            "website",
            "`true` for the repository homepage, `false` to hide, or a URL.",
            setting_shape(),
        ),
        Field::optional("meta", "Page metadata.", meta_shape()),
        Field::optional("extras", "Optional enrichments.", extras_shape()),
        Field::optional("workspace", "Workspace (monorepo) settings.", workspace),
    ])
}

/// Validates a parsed config document against the projectrc schema.
///
/// # Errors
///
/// Returns a [`ValidationReport`] listing every issue when the document
/// does not match.
pub fn validate(value: &Value) -> Result<(), ValidationReport> {
    let mut issues = Vec::new();
    config_shape().check(value, "", &mut issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport { issues })
    }
}

/// Renders the projectrc schema as a JSON Schema (draft-07) document.
#[must_use]
pub fn json_schema() -> Value {
    let mut schema = config_shape().to_json_schema();
    if let Some(object) = schema.as_object_mut() {
        object.insert(
            "$schema".to_string(),
            json!("http://json-schema.org/draft-07/schema#"),
        );
        object.insert("title".to_string(), json!("projectrc"));
    }
    schema
}
