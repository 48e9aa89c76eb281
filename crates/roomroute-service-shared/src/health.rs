//! Health check handlers for liveness and readiness probes.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{AppState, ServiceResponse};

/// Health status response for liveness and readiness probes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    /// `ok`, or `not_ready: <reason>`.
    pub status: String,
    pub service: String,
    pub version: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms_loaded: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub connections_loaded: Option<usize>,

    /// RFC 3339 time of the snapshot being served.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_loaded_at: Option<String>,
}

impl HealthStatus {
    pub fn alive(service: &str, version: &str) -> Self {
        Self {
            status: "ok".to_string(),
            service: service.to_string(),
            version: version.to_string(),
            rooms_loaded: None,
            connections_loaded: None,
            snapshot_loaded_at: None,
        }
    }

    pub fn ready(service: &str, version: &str, rooms: usize, connections: usize) -> Self {
        Self {
            rooms_loaded: Some(rooms),
            connections_loaded: Some(connections),
            ..Self::alive(service, version)
        }
    }

    pub fn not_ready(service: &str, version: &str, reason: &str) -> Self {
        Self {
            status: format!("not_ready: {reason}"),
            ..Self::alive(service, version)
        }
    }

    fn loaded_at(mut self, timestamp: String) -> Self {
        self.snapshot_loaded_at = Some(timestamp);
        self
    }
}

/// Liveness probe: 200 whenever the process can answer.
///
/// ```text
/// GET /health/live
/// {"status":"ok","service":"roomroute-service-shared","version":"0.1.0"}
/// ```
pub async fn health_live() -> impl IntoResponse {
    ServiceResponse::new(HealthStatus::alive(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
    ))
}

/// Readiness probe: 200 with room and connection counts, 503 when the
/// snapshot holds no rooms.
pub async fn health_ready(State(state): State<AppState>) -> impl IntoResponse {
    let service = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");

    let snapshot = state.current_snapshot().await;
    let loaded_at = state.loaded_at().to_rfc3339();

    if snapshot.rooms.is_empty() {
        let status =
            HealthStatus::not_ready(service, version, "no rooms loaded").loaded_at(loaded_at);
        return ServiceResponse::new(status).with_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    let status = HealthStatus::ready(
        service,
        version,
        snapshot.rooms.len(),
        snapshot.connections.len(),
    )
    .loaded_at(loaded_at);
    ServiceResponse::new(status)
}
