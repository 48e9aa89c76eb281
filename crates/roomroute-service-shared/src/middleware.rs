//! Request correlation and HTTP metrics middleware.
//!
//! [`track_requests`] resolves a [`RequestId`] for every call (the incoming
//! `X-Request-ID` header, or a fresh UUID v7), stores it in the request
//! extensions for handlers, echoes it on the response and records the HTTP
//! metrics. Install it with `axum::middleware::from_fn(track_requests)`.

use std::convert::Infallible;
use std::time::Instant;

use axum::{
    extract::{FromRequestParts, MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use http::{request::Parts, HeaderMap, HeaderName, HeaderValue};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::metrics::record_http_request;

/// Header carrying the correlation id in both directions.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Correlation id of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Time-sortable UUID v7.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Use `X-Request-ID` when present and non-empty, otherwise generate one.
pub fn extract_or_generate_request_id(headers: &HeaderMap) -> RequestId {
    headers
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(RequestId::new)
        .unwrap_or_else(RequestId::generate)
}

/// Handlers can take `RequestId` directly. The id stored by
/// [`track_requests`] wins so logs and responses agree.
impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<RequestId>() {
            return Ok(id.clone());
        }
        Ok(extract_or_generate_request_id(&parts.headers))
    }
}

/// Correlate, trace and measure one request.
pub async fn track_requests(mut request: Request, next: Next) -> Response {
    let started = Instant::now();
    let request_id = extract_or_generate_request_id(request.headers());
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    request.extensions_mut().insert(request_id.clone());
    let span = info_span!("request", request_id = %request_id, method = %method, path = %path);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    record_http_request(&method, &path, response.status().as_u16(), started.elapsed());
    response
}
