//! Shared mock GitHub / npm server for integration tests.

#![allow(dead_code)]

use projectrc::github::encode_content;
use projectrc::{GitHubClient, NpmClient, Resolver, ResolverSettings};
use serde_json::{json, Value};
use std::path::PathBuf;
use wiremock::matchers::{any, body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCOUNT: &str = "luxass";
pub const PUBLIC_URL: &str = "https://projectrc.test";

pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn fixture(name: &str) -> String {
    std::fs::read_to_string(fixtures_root().join(name)).unwrap()
}

/// octocrab builds its TLS config through the process-wide provider.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
}

/// A mock serving both the GitHub API and the npm endpoints.
pub struct MockGitHub {
    pub server: MockServer,
}

impl MockGitHub {
    /// Starts a server; every unmatched request gets GitHub's 404 body.
    pub async fn start() -> Self {
        install_crypto_provider();
        let server = MockServer::start().await;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest"
            })))
            .with_priority(u8::MAX)
            .mount(&server)
            .await;

        Self { server }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn client(&self) -> GitHubClient {
        GitHubClient::with_base_url("test-token", &self.uri()).unwrap()
    }

    pub fn settings(&self) -> ResolverSettings {
        ResolverSettings::new(ACCOUNT).with_public_url(PUBLIC_URL)
    }

    pub fn resolver(&self) -> Resolver {
        self.resolver_with(self.settings())
    }

    pub fn resolver_with(&self, settings: ResolverSettings) -> Resolver {
        Resolver::new(
            self.client(),
            NpmClient::with_base_urls(&self.uri(), &self.uri()),
            settings,
        )
    }

    /// Serves a file through the contents API.
    pub async fn file(&self, owner: &str, repo: &str, file_path: &str, text: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/contents/{file_path}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(contents(file_path, text)))
            .mount(&self.server)
            .await;
    }

    /// Serves the default README.
    pub async fn readme(&self, owner: &str, repo: &str, text: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/readme")))
            .respond_with(ResponseTemplate::new(200).set_body_json(contents("README.md", text)))
            .mount(&self.server)
            .await;
    }

    /// Serves `GET /repos/{owner}/{repo}` with the given flags.
    pub async fn repository(&self, owner: &str, repo: &str, flags: Value) {
        let mut body = json!({
            "id": 1,
            "name": repo,
            "full_name": format!("{owner}/{repo}"),
            "default_branch": "main"
        });
        if let (Some(body), Some(flags)) = (body.as_object_mut(), flags.as_object()) {
            body.extend(flags.clone());
        }

        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Serves a public repository over REST and GraphQL.
    pub async fn public_repository(&self, owner: &str, repo: &str) {
        self.repository(
            owner,
            repo,
            json!({ "private": false, "fork": false, "archived": false }),
        )
        .await;
        self.metadata(owner, repo, metadata(owner, repo)).await;
    }

    /// Serves the GraphQL `repository` query.
    pub async fn metadata(&self, owner: &str, repo: &str, repository: Value) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({
                "variables": { "owner": owner, "name": repo }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({
                    "data": { "repository": repository }
                })),
            )
            .mount(&self.server)
            .await;
    }

    /// Serves the GraphQL `viewer.repositories` query as a single page.
    pub async fn viewer(&self, nodes: Vec<Value>) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("viewer"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "viewer": {
                        "repositories": {
                            "nodes": nodes,
                            "pageInfo": { "hasNextPage": false, "endCursor": null }
                        }
                    }
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Serves a recursive tree of `branch`.
    pub async fn tree(&self, owner: &str, repo: &str, branch: &str, entries: Value, truncated: bool) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/git/trees/{branch}")))
            .and(query_param("recursive", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sha": "tree-sha",
                "url": format!("{}/repos/{owner}/{repo}/git/trees/tree-sha", self.uri()),
                "tree": entries,
                "truncated": truncated
            })))
            .mount(&self.server)
            .await;
    }

    /// Serves the latest release.
    pub async fn release(&self, owner: &str, repo: &str, tag: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/{owner}/{repo}/releases/latest")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1,
                "tag_name": tag,
                "name": tag
            })))
            .mount(&self.server)
            .await;
    }

    /// Serves npm download counts.
    pub async fn npm_downloads(&self, package: &str, downloads: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/downloads/point/last-month/{package}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "downloads": downloads,
                "start": "2026-09-01",
                "end": "2026-09-30",
                "package": package
            })))
            .mount(&self.server)
            .await;
    }

    /// Serves an npm registry document.
    pub async fn npm_package(&self, package: &str, latest: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/{package}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": package,
                "dist-tags": { "latest": latest }
            })))
            .mount(&self.server)
            .await;
    }
}

/// Contents API payload for a file.
pub fn contents(file_path: &str, text: &str) -> Value {
    let name = file_path.rsplit('/').next().unwrap_or(file_path);
    json!({
        "type": "file",
        "encoding": "base64",
        "name": name,
        "path": file_path,
        "sha": format!("sha-{}", text.len()),
        "content": encode_content(text)
    })
}

/// GraphQL repository node.
pub fn metadata(owner: &str, repo: &str) -> Value {
    json!({
        "name": repo,
        "nameWithOwner": format!("{owner}/{repo}"),
        "owner": { "login": owner },
        "description": "A project from GitHub",
        "homepageUrl": "https://projectrc.dev",
        "url": format!("https://github.com/{owner}/{repo}"),
        "stargazerCount": 42,
        "isPrivate": false,
        "isFork": false,
        "isArchived": false,
        "defaultBranchRef": { "name": "main" },
        "primaryLanguage": { "name": "TypeScript", "color": "#3178c6" }
    })
}

pub fn tree_entry(entry_path: &str, kind: &str) -> Value {
    json!({ "path": entry_path, "type": kind, "mode": "100644", "sha": "entry-sha" })
}
