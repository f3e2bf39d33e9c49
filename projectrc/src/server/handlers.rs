//! Route handlers.

use super::{bearer_token, ApiError, AppState, CacheMode};
use crate::config::json_schema;
use crate::listing::list_projects;
use crate::resolver::{ConfigLookup, RepositoryType};
use crate::sync::sync_listing;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::sync::Arc;
use tracing::{debug, info};

type Shared = State<Arc<AppState>>;

/// Only public repositories are served.
async fn ensure_public(state: &AppState, owner: &str, repo: &str) -> Result<(), ApiError> {
    match state.resolver.get_repository_type(owner, repo).await {
        Some(RepositoryType::Public) => Ok(()),
        Some(kind) => {
            debug!(owner, repo, kind = %kind, "Rejected non-public repository");
            Err(ApiError::Forbidden)
        }
        None => Err(ApiError::NotFound(format!(
            "repository {owner}/{repo} not found"
        ))),
    }
}

pub(super) async fn resolve(
    State(state): Shared,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let cache = CacheMode::from_headers(&headers, &state.config)?;
    ensure_public(&state, &owner, &repo).await?;

    match state.resolver.resolve_projectrc(&owner, &repo).await? {
        Some(resolved) => Ok(cache.json(resolved)),
        None => Err(ApiError::NotFound(format!(
            "no projectrc found for {owner}/{repo}"
        ))),
    }
}

pub(super) async fn config(
    State(state): Shared,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let cache = CacheMode::from_headers(&headers, &state.config)?;
    ensure_public(&state, &owner, &repo).await?;

    match state.resolver.resolve_config(&owner, &repo).await {
        ConfigLookup::Found(config) => Ok(cache.json(config)),
        ConfigLookup::Invalid(report) => Err(ApiError::InvalidConfig(report)),
        ConfigLookup::NotFound => Err(ApiError::NotFound(format!(
            "no projectrc found for {owner}/{repo}"
        ))),
    }
}

pub(super) async fn readme(
    State(state): Shared,
    Path((owner, repo)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    serve_readme(&state, &owner, &repo, None, &headers).await
}

pub(super) async fn readme_at(
    State(state): Shared,
    Path((owner, repo, path)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    serve_readme(&state, &owner, &repo, Some(&path), &headers).await
}

async fn serve_readme(
    state: &AppState,
    owner: &str,
    repo: &str,
    path: Option<&str>,
    headers: &HeaderMap,
) -> Result<Response, ApiError> {
    let cache = CacheMode::from_headers(headers, &state.config)?;
    ensure_public(state, owner, repo).await?;

    state
        .resolver
        .get_readme(owner, repo, path)
        .await
        .map(|document| cache.json(document))
        .ok_or_else(|| ApiError::NotFound(format!("no README found for {owner}/{repo}")))
}

pub(super) async fn schema(State(state): Shared, headers: HeaderMap) -> Result<Response, ApiError> {
    let cache = CacheMode::from_headers(&headers, &state.config)?;
    Ok(cache.json(json_schema()))
}

pub(super) async fn projects(
    State(state): Shared,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let cache = CacheMode::from_headers(&headers, &state.config)?;
    let listing = list_projects(&state.resolver).await?;
    Ok(cache.json(listing))
}

pub(super) async fn cron_sync(
    State(state): Shared,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let (Some(secret), Some(job)) = (state.config.cron_secret(), state.sync.as_ref()) else {
        return Err(ApiError::Unavailable(
            "listing sync is not configured".to_string(),
        ));
    };

    if bearer_token(&headers) != Some(secret) {
        return Err(ApiError::Forbidden);
    }

    info!(repo = %job.target.repository(), "Running listing sync");
    let outcome = sync_listing(&state.resolver, &job.committer, &job.target).await?;
    Ok(Json(outcome).into_response())
}
