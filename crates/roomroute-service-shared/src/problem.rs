//! RFC 9457 Problem Details for HTTP APIs.
//!
//! Every failed request answers with `application/problem+json`; the
//! `instance` member carries the request id so callers can quote it back.
//! See: <https://www.rfc-editor.org/rfc/rfc9457.html>

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use roomroute_lib::{Error as LibError, FailureKind};

/// Problem type URI for room names or ids that do not resolve.
pub const PROBLEM_UNKNOWN_ROOM: &str = "/problems/unknown-room";

/// Problem type URI for room names matching more than one room.
pub const PROBLEM_AMBIGUOUS_ROOM: &str = "/problems/ambiguous-room";

/// Problem type URI for queries with no path inside the bounds.
pub const PROBLEM_NO_PATH: &str = "/problems/no-path";

/// Problem type URI for invalid request parameters.
pub const PROBLEM_INVALID_REQUEST: &str = "/problems/invalid-request";

/// Problem type URI for internal server errors.
pub const PROBLEM_INTERNAL_ERROR: &str = "/problems/internal-error";

const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// RFC 9457 Problem Details response structure.
///
/// # Example
///
/// ```
/// use roomroute_service_shared::{ProblemDetails, PROBLEM_UNKNOWN_ROOM};
/// use axum::http::StatusCode;
///
/// let problem = ProblemDetails::new(PROBLEM_UNKNOWN_ROOM, "Unknown Room", StatusCode::NOT_FOUND)
///     .with_detail("Room 'Libary' not found. Did you mean: Library?")
///     .with_request_id("req-12345");
/// assert_eq!(problem.status, 404);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProblemDetails {
    /// URI reference identifying the problem type (relative).
    #[serde(rename = "type")]
    pub type_uri: String,

    /// Short, human-readable summary of the problem.
    pub title: String,

    /// HTTP status code for this problem.
    pub status: u16,

    /// Human-readable explanation specific to this occurrence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Request identifier of the failing call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    pub fn new(type_uri: impl Into<String>, title: impl Into<String>, status: StatusCode) -> Self {
        Self {
            type_uri: type_uri.into(),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.instance = Some(request_id.into());
        self
    }

    /// 400 for malformed or out-of-range input.
    pub fn bad_request(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INVALID_REQUEST,
            "Invalid Request",
            StatusCode::BAD_REQUEST,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }

    /// 404 for a room name that matches nothing.
    pub fn unknown_room(name: &str, suggestions: &[String], request_id: impl Into<String>) -> Self {
        let detail = if suggestions.is_empty() {
            format!("Room '{name}' not found")
        } else {
            format!(
                "Room '{name}' not found. Did you mean: {}?",
                suggestions.join(", ")
            )
        };

        Self::new(PROBLEM_UNKNOWN_ROOM, "Unknown Room", StatusCode::NOT_FOUND)
            .with_detail(detail)
            .with_request_id(request_id)
    }

    /// 404 for a name query that matches several rooms.
    pub fn ambiguous_room(
        query: &str,
        candidates: &[String],
        request_id: impl Into<String>,
    ) -> Self {
        Self::new(
            PROBLEM_AMBIGUOUS_ROOM,
            "Ambiguous Room",
            StatusCode::NOT_FOUND,
        )
        .with_detail(format!(
            "Room name '{query}' matches several rooms: {}",
            candidates.join(", ")
        ))
        .with_request_id(request_id)
    }

    /// 404 when the rooms exist but no bounded path joins them.
    pub fn no_path(start: &str, target: &str, request_id: impl Into<String>) -> Self {
        Self::new(PROBLEM_NO_PATH, "No Path Found", StatusCode::NOT_FOUND)
            .with_detail(format!("No path exists from '{start}' to '{target}'"))
            .with_request_id(request_id)
    }

    pub fn internal_error(detail: impl Into<String>, request_id: impl Into<String>) -> Self {
        Self::new(
            PROBLEM_INTERNAL_ERROR,
            "Internal Error",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_detail(detail)
        .with_request_id(request_id)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.title, self.detail.as_deref().unwrap_or(""))
    }
}

impl std::error::Error for ProblemDetails {}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(&self)).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
        );
        response
    }
}

/// Convert library errors to ProblemDetails.
///
/// Invalid input maps to 400 and unresolved rooms or missing paths to 404.
/// Everything else is a server-side fault and maps to 500.
pub fn from_lib_error(error: &LibError, request_id: &str) -> ProblemDetails {
    match error {
        LibError::InvalidInput { reason } => ProblemDetails::bad_request(reason.clone(), request_id),
        LibError::UnknownRoom { name, suggestions } => {
            ProblemDetails::unknown_room(name, suggestions, request_id)
        }
        LibError::UnknownRoomId { id } => {
            ProblemDetails::new(PROBLEM_UNKNOWN_ROOM, "Unknown Room", StatusCode::NOT_FOUND)
                .with_detail(format!("No room with id {id}"))
                .with_request_id(request_id)
        }
        LibError::AmbiguousRoom { query, candidates } => {
            ProblemDetails::ambiguous_room(query, candidates, request_id)
        }
        LibError::NoPathFound { start, target } => {
            ProblemDetails::no_path(start, target, request_id)
        }
        other if other.kind() == FailureKind::Storage => ProblemDetails::internal_error(
            format!("Room snapshot could not be read: {other}"),
            request_id,
        ),
        other => ProblemDetails::internal_error(other.to_string(), request_id),
    }
}
