//! Workspace package discovery: `package.json` manifests and glob matching.

mod error;
mod manifest;
mod matcher;

pub use error::PackageError;
pub use manifest::{PackageJson, Workspaces};
pub use matcher::WorkspaceMatcher;
