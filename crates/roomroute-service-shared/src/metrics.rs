//! Prometheus metrics for roomroute services.
//!
//! Business series:
//! - `roomroute_routes_calculated_total{status}`: successful queries by verdict
//! - `roomroute_routes_failed_total{reason}`: failed queries by failure class
//! - `roomroute_route_steps`: histogram of optimal route lengths
//!
//! HTTP series recorded by [`crate::middleware::track_requests`]:
//! - `http_requests_total{method,path,status}`
//! - `http_request_duration_seconds{method,path}`
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use roomroute_service_shared::metrics::{init_metrics, metrics_handler, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default()).expect("failed to initialize metrics");
//! let app: Router = Router::new().route("/metrics", get(metrics_handler));
//! ```

use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use roomroute_lib::{Error as LibError, FailureKind, RouteStatus};

static PROMETHEUS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    /// Route serving the exposition text.
    pub path: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
        }
    }
}

impl MetricsConfig {
    /// `METRICS_ENABLED` (anything but `false` enables) and `METRICS_PATH`.
    pub fn from_env() -> Self {
        let enabled = std::env::var("METRICS_ENABLED")
            .map(|v| !v.trim().eq_ignore_ascii_case("false"))
            .unwrap_or(true);
        let path = std::env::var("METRICS_PATH")
            .ok()
            .filter(|p| p.starts_with('/'))
            .unwrap_or_else(|| "/metrics".to_string());
        Self { enabled, path }
    }
}

/// Errors that can occur during metrics initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    Disabled,
    AlreadyInitialized,
    InstallFailed(String),
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::Disabled => write!(f, "metrics are disabled"),
            MetricsError::AlreadyInitialized => write!(f, "metrics recorder already initialized"),
            MetricsError::InstallFailed(e) => write!(f, "failed to install metrics recorder: {e}"),
        }
    }
}

impl std::error::Error for MetricsError {}

/// Install the Prometheus recorder. Call once at startup.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    if !config.enabled {
        return Err(MetricsError::Disabled);
    }
    if PROMETHEUS_HANDLE.get().is_some() {
        return Err(MetricsError::AlreadyInitialized);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::InstallFailed(e.to_string()))?;

    PROMETHEUS_HANDLE
        .set(handle)
        .map_err(|_| MetricsError::AlreadyInitialized)
}

/// Axum handler for the metrics route; Prometheus exposition text.
pub async fn metrics_handler() -> String {
    PROMETHEUS_HANDLE
        .get()
        .map(PrometheusHandle::render)
        .unwrap_or_else(|| "# Metrics not initialized\n".to_string())
}

/// Label value for a failed query.
pub fn failure_reason(error: &LibError) -> &'static str {
    match error.kind() {
        FailureKind::InvalidInput => "invalid_input",
        FailureKind::NotFound => "not_found",
        FailureKind::NoPathFound => "no_path",
        FailureKind::InternalInconsistency => "internal_inconsistency",
        FailureKind::Storage => "storage",
    }
}

pub fn record_route_calculated(status: RouteStatus) {
    metrics::counter!(
        "roomroute_routes_calculated_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// `reason` is a [`failure_reason`] label or `validation_error` for rejected requests.
pub fn record_route_failed(reason: &'static str) {
    metrics::counter!("roomroute_routes_failed_total", "reason" => reason).increment(1);
}

pub fn record_route_steps(steps: usize) {
    metrics::histogram!("roomroute_route_steps").record(steps as f64);
}

pub(crate) fn record_http_request(method: &str, path: &str, status: u16, elapsed: Duration) {
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_bucket(status)
    )
    .increment(1);
    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string()
    )
    .record(elapsed.as_secs_f64());
}

fn status_bucket(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
