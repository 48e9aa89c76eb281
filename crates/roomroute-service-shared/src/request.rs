//! Request types and validation for HTTP endpoints.

use serde::{Deserialize, Serialize};

use roomroute_lib::RoomId;

use crate::config::{MAX_DEPTH_LIMIT, MAX_PATHS_LIMIT};
use crate::ProblemDetails;

/// Validation trait for request types.
///
/// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
/// The `request_id` populates the problem's `instance` member.
pub trait Validate {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body of `POST /api/v1/pathfinding`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathfindingRequest {
    /// Destination room name, matched case-insensitively.
    pub target: String,

    /// Starting room id.
    #[serde(default = "default_start")]
    pub start: RoomId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_paths: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Block rooms from 90% occupancy instead of only full ones.
    #[serde(default)]
    pub strict_capacity: bool,
}

fn default_start() -> RoomId {
    1
}

impl PathfindingRequest {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            start: default_start(),
            max_paths: None,
            max_depth: None,
            strict_capacity: false,
        }
    }
}

impl Validate for PathfindingRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        let fail = |detail: String| Err(Box::new(ProblemDetails::bad_request(detail, request_id)));

        if self.target.trim().is_empty() {
            return fail("The 'target' field is required and cannot be empty".to_string());
        }

        if self.start <= 0 {
            return fail("The 'start' field must be a positive room id".to_string());
        }

        if let Some(max_paths) = self.max_paths {
            if !(1..=MAX_PATHS_LIMIT).contains(&max_paths) {
                return fail(format!(
                    "The 'max_paths' field must be between 1 and {MAX_PATHS_LIMIT}"
                ));
            }
        }

        if let Some(max_depth) = self.max_depth {
            if !(1..=MAX_DEPTH_LIMIT).contains(&max_depth) {
                return fail(format!(
                    "The 'max_depth' field must be between 1 and {MAX_DEPTH_LIMIT}"
                ));
            }
        }

        Ok(())
    }
}
