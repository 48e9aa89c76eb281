//! Shared infrastructure for roomroute HTTP services.
//!
//! - [`AppState`]: the live room snapshot, re-read per request
//! - [`health`]: liveness and readiness probes
//! - [`ProblemDetails`]: RFC 9457 error bodies
//! - [`ServiceResponse`]: successful JSON responses
//! - [`metrics`]: Prometheus recorder and business counters
//! - [`logging`]: JSON or text tracing setup
//! - [`middleware`]: request ids and HTTP metrics
//! - [`config`]: environment-driven settings
//!
//! # Architecture
//!
//! Handlers stay thin; route finding, scoring and capacity checks live in
//! `roomroute-lib`. This crate provides only HTTP glue:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  axum Handler                                               │
//! │  - Parse and validate the request                           │
//! │  - Refresh the room snapshot                                │
//! │  - Call roomroute-lib                                       │
//! │  - Map the result or error to JSON                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides fixture-backed state for handler
//! tests. Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod config;
mod health;
pub mod logging;
pub mod metrics;
pub mod middleware;
mod problem;
mod request;
mod response;
mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::{PathfindingConfig, ServiceConfig};
pub use health::{health_live, health_ready, HealthStatus};
pub use logging::{init_logging, LogFormat, LoggingConfig};
pub use metrics::{
    failure_reason, init_metrics, metrics_handler, record_route_calculated, record_route_failed,
    record_route_steps, MetricsConfig, MetricsError,
};
pub use middleware::{extract_or_generate_request_id, track_requests, RequestId};
pub use problem::{
    from_lib_error, ProblemDetails, PROBLEM_AMBIGUOUS_ROOM, PROBLEM_INTERNAL_ERROR,
    PROBLEM_INVALID_REQUEST, PROBLEM_NO_PATH, PROBLEM_UNKNOWN_ROOM,
};
pub use request::{PathfindingRequest, Validate};
pub use response::ServiceResponse;
pub use state::{AppState, AppStateError};
