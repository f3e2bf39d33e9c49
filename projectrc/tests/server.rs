mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use common::MockGitHub;
use projectrc::server::{router, AppState, ServiceConfig, SyncJob, FORBIDDEN_MESSAGE};
use projectrc::{RepositoryRef, SyncTarget};
use serde_json::{json, Value};
use tower::ServiceExt;

const CONFIG_PATH: &str = ".github/.projectrc.json";

fn service_config() -> ServiceConfig {
    ServiceConfig::default()
        .with_cache_ttl(120)
        .with_revalidate_token(Some("revalidate".to_string()))
        .with_isr_bypass_token(Some("bypass".to_string()))
        .with_cron_secret(Some("cron".to_string()))
}

fn app(github: &MockGitHub) -> Router {
    router(AppState::new(github.resolver(), service_config()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let cache = response
        .headers()
        .get(header::CACHE_CONTROL)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, cache, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

async fn projectrc_repository(github: &MockGitHub) {
    github.public_repository("luxass", "projectrc").await;
    github.readme("luxass", "projectrc", "# Hello").await;
    github
        .file(
            "luxass",
            "projectrc",
            CONFIG_PATH,
            r#"{ "readme": true, "extras": { "stars": true } }"#,
        )
        .await;
}

#[tokio::test]
async fn resolve_returns_config_and_projects() {
    let github = MockGitHub::start().await;
    projectrc_repository(&github).await;

    let (status, cache, body) = send(app(&github), get("/resolve/luxass/projectrc")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        cache.as_deref(),
        Some("public, max-age=0, s-maxage=120, stale-while-revalidate=120")
    );
    assert_eq!(body["$projectrc"]["readme"], json!(true));
    assert_eq!(body["projects"][0]["name"], json!("projectrc"));
    assert_eq!(body["projects"][0]["extras"]["stars"], json!(42));
}

#[tokio::test]
async fn revalidation_tokens_bypass_the_cache() {
    let github = MockGitHub::start().await;
    projectrc_repository(&github).await;

    for token in ["revalidate", "bypass"] {
        let (status, cache, _) = send(
            app(&github),
            get_with_token("/resolve/luxass/projectrc", token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
    }
}

#[tokio::test]
async fn unknown_token_is_forbidden() {
    let github = MockGitHub::start().await;
    projectrc_repository(&github).await;

    let (status, _, body) = send(
        app(&github),
        get_with_token("/resolve/luxass/projectrc", "guess"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({ "error": FORBIDDEN_MESSAGE }));
}

#[tokio::test]
async fn non_public_repositories_are_forbidden() {
    let github = MockGitHub::start().await;
    github
        .repository("luxass", "secret", json!({ "private": true }))
        .await;

    let (status, _, _) = send(app(&github), get("/resolve/luxass/secret")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn missing_repository_is_not_found() {
    let github = MockGitHub::start().await;

    let (status, _, body) = send(app(&github), get("/resolve/luxass/missing")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("luxass/missing"));
}

#[tokio::test]
async fn repository_without_config_is_not_found() {
    let github = MockGitHub::start().await;
    github.public_repository("luxass", "plain").await;

    let (status, _, _) = send(app(&github), get("/resolve/luxass/plain")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(app(&github), get("/resolve/luxass/plain/config")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_config_is_a_server_error_with_issues() {
    let github = MockGitHub::start().await;
    github.public_repository("luxass", "projectrc").await;
    github
        .file("luxass", "projectrc", CONFIG_PATH, r#"{ "unknown": 1 }"#)
        .await;

    let (status, _, body) = send(app(&github), get("/resolve/luxass/projectrc/config")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], json!("invalid projectrc"));
    assert_eq!(body["issues"][0]["path"], json!("unknown"));
}

#[tokio::test]
async fn precondition_errors_are_server_errors() {
    let github = MockGitHub::start().await;
    github.public_repository("luxass", "projectrc").await;
    github
        .file(
            "luxass",
            "projectrc",
            CONFIG_PATH,
            r#"{ "workspace": { "enabled": true } }"#,
        )
        .await;

    let (status, _, body) = send(app(&github), get("/resolve/luxass/projectrc")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("projectrc: "));
}

#[tokio::test]
async fn readme_routes_serve_documents() {
    let github = MockGitHub::start().await;
    projectrc_repository(&github).await;
    github
        .file("luxass", "projectrc", "packages/core/README.md", "# Core")
        .await;

    let (status, _, body) = send(app(&github), get("/resolve/luxass/projectrc/readme")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], json!("# Hello"));

    let (status, _, body) = send(
        app(&github),
        get("/resolve/luxass/projectrc/readme/packages/core"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], json!("# Core"));

    let (status, _, _) = send(
        app(&github),
        get("/resolve/luxass/projectrc/readme/packages/missing"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schema_is_served() {
    let github = MockGitHub::start().await;

    let (status, cache, body) = send(app(&github), get("/schema")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cache.is_some());
    assert!(body["properties"]["workspace"].is_object());
}

#[tokio::test]
async fn cron_sync_requires_configuration_and_secret() {
    let github = MockGitHub::start().await;

    let request = || {
        Request::builder()
            .method("POST")
            .uri("/cron/sync")
            .header(header::AUTHORIZATION, "Bearer cron")
            .body(Body::empty())
            .unwrap()
    };

    let (status, _, _) = send(app(&github), request()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let state = AppState::new(github.resolver(), service_config()).with_sync(SyncJob {
        committer: github.client(),
        target: SyncTarget::new(RepositoryRef::new("luxass", "luxass.dev"), "projects.json"),
    });

    let wrong = Request::builder()
        .method("POST")
        .uri("/cron/sync")
        .header(header::AUTHORIZATION, "Bearer revalidate")
        .body(Body::empty())
        .unwrap();
    let (status, _, _) = send(router(state), wrong).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
