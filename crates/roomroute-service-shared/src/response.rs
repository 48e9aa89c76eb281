//! Response wrapper for successful HTTP responses.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Successful JSON response.
///
/// The payload is serialised as-is so documented body contracts stay exact.
/// Occupancy changes between requests, so responses are marked `no-store`.
///
/// # Example
///
/// ```
/// use roomroute_service_shared::ServiceResponse;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     rooms: usize,
/// }
///
/// let response = ServiceResponse::new(Summary { rooms: 8 });
/// assert_eq!(response.status, axum::http::StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
pub struct ServiceResponse<T> {
    pub data: T,
    pub status: StatusCode,
}

impl<T> ServiceResponse<T> {
    /// Create a 200 OK response.
    pub fn new(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Override the status code (e.g. 503 for a not-ready probe).
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T> From<T> for ServiceResponse<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

impl<T: Serialize> IntoResponse for ServiceResponse<T> {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.data)).into_response();
        response
            .headers_mut()
            .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Serialize, PartialEq)]
    struct Payload {
        value: i32,
    }

    #[test]
    fn default_status_is_ok() {
        let response = ServiceResponse::from(Payload { value: 42 });
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.data, Payload { value: 42 });
    }

    #[test]
    fn into_response_sets_status_and_headers() {
        let response = ServiceResponse::new(Payload { value: 1 })
            .with_status(StatusCode::SERVICE_UNAVAILABLE)
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL),
            Some(&HeaderValue::from_static("no-store"))
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
    }
}
