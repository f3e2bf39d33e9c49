#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod github;
pub mod listing;
pub mod npm;
pub mod packages;
pub mod resolver;
pub mod server;
pub mod sync;
pub mod types;

pub use config::{json_schema, parse_config, ConfigError, ConfigFormat, ProjectRc};
pub use github::{GitHubClient, GitHubError};
pub use listing::{list_projects, ListingSummary, ProjectListing};
pub use npm::{NpmClient, NpmError};
pub use packages::{PackageError, PackageJson, WorkspaceMatcher};
pub use resolver::{
    ConfigLookup, ReadmeDocument, RepositoryType, ResolveError, ResolvedProject,
    ResolvedProjectRc, Resolver, ResolverSettings,
};
pub use server::{ApiError, AppState, ServiceConfig, SyncJob};
pub use sync::{sync_listing, SyncError, SyncOutcome, SyncTarget};
pub use types::RepositoryRef;
