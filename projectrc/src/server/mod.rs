//! HTTP surface.
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /resolve/{owner}/{repo}` | config and resolved projects |
//! | `GET /resolve/{owner}/{repo}/config` | validated config |
//! | `GET /resolve/{owner}/{repo}/readme[/{*path}]` | README document |
//! | `GET /schema` | JSON Schema of the config |
//! | `GET /projects` | listing of every project |
//! | `POST /cron/sync` | commits the listing (cron secret required) |
//!
//! Errors are `{"error": "..."}` bodies; invalid configs add `issues`.

mod cache;
mod config;
mod error;
mod handlers;

pub use cache::{bearer_token, CacheMode};
pub use config::{ServiceConfig, SyncJob, DEFAULT_CACHE_TTL};
pub use error::{ApiError, FORBIDDEN_MESSAGE};

use crate::resolver::Resolver;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub resolver: Resolver,
    pub config: ServiceConfig,
    /// Set when `POST /cron/sync` is enabled.
    pub sync: Option<SyncJob>,
}

impl AppState {
    /// Creates state without listing sync.
    #[must_use]
    pub fn new(resolver: Resolver, config: ServiceConfig) -> Self {
        Self {
            resolver,
            config,
            sync: None,
        }
    }

    /// Enables the listing sync.
    #[must_use]
    pub fn with_sync(mut self, job: SyncJob) -> Self {
        self.sync = Some(job);
        self
    }
}

/// Builds the router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/resolve/{owner}/{repo}", get(handlers::resolve))
        .route("/resolve/{owner}/{repo}/config", get(handlers::config))
        .route("/resolve/{owner}/{repo}/readme", get(handlers::readme))
        .route(
            "/resolve/{owner}/{repo}/readme/{*path}",
            get(handlers::readme_at),
        )
        .route("/schema", get(handlers::schema))
        .route("/projects", get(handlers::projects))
        .route("/cron/sync", post(handlers::cron_sync))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serves the router until the process is stopped.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or serving fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Listening");
    axum::serve(listener, router(state)).await
}
