//! Cache-Control negotiation and bearer tokens.

use super::{ApiError, ServiceConfig};
use axum::http::header::{AUTHORIZATION, CACHE_CONTROL};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// How a response may be cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    /// Cacheable by shared caches for the given number of seconds.
    Shared(u64),
    /// Must not be cached; forces the edge cache to refetch.
    Bypass,
}

impl CacheMode {
    /// Picks the mode from the request's bearer token.
    ///
    /// No token gives a shared response, a revalidation token bypasses the
    /// cache, any other token is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Forbidden`] for an unknown token.
    pub fn from_headers(headers: &HeaderMap, config: &ServiceConfig) -> Result<Self, ApiError> {
        match bearer_token(headers) {
            None => Ok(Self::Shared(config.cache_ttl())),
            Some(token) if config.is_revalidation_token(token) => Ok(Self::Bypass),
            Some(_) => Err(ApiError::Forbidden),
        }
    }

    /// `Cache-Control` value for this mode.
    #[must_use]
    pub fn header_value(self) -> HeaderValue {
        match self {
            Self::Shared(ttl) => HeaderValue::from_str(&format!(
                "public, max-age=0, s-maxage={ttl}, stale-while-revalidate={ttl}"
            ))
            .unwrap_or_else(|_| HeaderValue::from_static("no-store")),
            Self::Bypass => HeaderValue::from_static("no-store"),
        }
    }

    /// Serializes `body` as JSON with this mode's Cache-Control header.
    pub fn json<T: Serialize>(self, body: T) -> Response {
        let mut response = Json(body).into_response();
        response
            .headers_mut()
            .insert(CACHE_CONTROL, self.header_value());
        response
    }
}

/// Token of an `Authorization: Bearer <token>` header.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
