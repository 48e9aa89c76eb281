//! Occupancy-aware room routing HTTP service.
//!
//! # Endpoints
//!
//! - `POST /api/v1/pathfinding` - rank routes from a start room to a named target
//! - `GET /api/v1/pathfinding/graph` - room graph structure
//! - `GET /api/v1/rooms/stats` - occupancy summary
//! - `GET /metrics` - Prometheus metrics (path from `METRICS_PATH`)
//! - `GET /health/live`, `GET /health/ready` - probes
//!
//! # Configuration
//!
//! - `ROOMROUTE_DATA_PATH` - room snapshot, SQLite or `.json` (default `/data/rooms.db`)
//! - `SERVICE_PORT` - HTTP port (default 8080)
//! - `ROOMROUTE_MAX_PATHS`, `ROOMROUTE_MAX_DEPTH`, `ROOMROUTE_BLOCKING_PERCENT` - query defaults
//! - `RUST_LOG`, `LOG_FORMAT`, `SERVICE_NAME` - logging
//! - `METRICS_ENABLED`, `METRICS_PATH` - metrics

use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use roomroute_lib::{find_path_observed, GraphSummary, RoomStats, TracingObserver};
use roomroute_service_shared::{
    failure_reason, from_lib_error, health_live, health_ready, init_logging, init_metrics,
    metrics_handler, record_route_calculated, record_route_failed, record_route_steps,
    track_requests, AppState, LoggingConfig, MetricsConfig, PathfindingConfig,
    PathfindingRequest, ProblemDetails, RequestId, ServiceConfig, ServiceResponse, Validate,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let logging_config = LoggingConfig::from_env().with_service("roomroute-route");
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("failed to initialise logging: {e}");
    }

    let metrics_config = MetricsConfig::from_env();
    if let Err(e) = init_metrics(&metrics_config) {
        warn!(error = %e, "failed to initialize metrics, continuing without metrics");
    }

    let service_config = ServiceConfig::from_env();
    let pathfinding_config = PathfindingConfig::from_env();
    info!(
        data_path = %service_config.data_path.display(),
        port = service_config.port,
        max_paths = pathfinding_config.max_paths,
        max_depth = pathfinding_config.max_depth,
        blocking_percent = pathfinding_config.blocking_percent,
        "starting route service"
    );

    let state = AppState::load(&service_config.data_path, pathfinding_config).map_err(|e| {
        error!(
            error = %e,
            path = %service_config.data_path.display(),
            "failed to load application state"
        );
        e
    })?;

    let app = router(state, &metrics_config.path);

    let addr = SocketAddr::from(([0, 0, 0, 0], service_config.port));
    info!(addr = %addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the service router around `state`.
fn router(state: AppState, metrics_path: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")]);

    Router::new()
        .route("/api/v1/pathfinding", post(pathfinding_handler))
        .route("/api/v1/pathfinding/graph", get(graph_handler))
        .route("/api/v1/rooms/stats", get(stats_handler))
        .route(metrics_path, get(metrics_handler))
        .route("/health/live", get(health_live))
        .route("/health/ready", get(health_ready))
        .layer(middleware::from_fn(track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Handle `POST /api/v1/pathfinding`.
async fn pathfinding_handler(
    State(state): State<AppState>,
    request_id: RequestId,
    body: Result<Json<PathfindingRequest>, JsonRejection>,
) -> Response {
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            record_route_failed("validation_error");
            return ProblemDetails::bad_request(rejection.body_text(), request_id.as_str())
                .into_response();
        }
    };

    info!(
        request_id = %request_id,
        start = request.start,
        target = %request.target,
        strict_capacity = request.strict_capacity,
        "handling pathfinding request"
    );

    if let Err(problem) = request.validate(request_id.as_str()) {
        record_route_failed("validation_error");
        return problem.into_response();
    }

    let snapshot = state.current_snapshot().await;
    let options = state.config().route_options(
        request.max_paths,
        request.max_depth,
        request.strict_capacity,
    );

    match find_path_observed(
        &snapshot.rooms,
        &snapshot.connections,
        request.start,
        &request.target,
        &options,
        Some(&TracingObserver),
    ) {
        Ok(result) => {
            record_route_calculated(result.status);
            record_route_steps(result.optimal_steps());
            info!(
                request_id = %request_id,
                status = %result.status,
                steps = result.optimal_steps(),
                candidates = result.all_routes.len(),
                "route computed"
            );
            ServiceResponse::new(result).into_response()
        }
        Err(e) => {
            let reason = failure_reason(&e);
            record_route_failed(reason);
            if reason == "internal_inconsistency" || reason == "storage" {
                error!(request_id = %request_id, error = %e, "pathfinding failed");
            } else {
                info!(request_id = %request_id, error = %e, reason, "pathfinding rejected");
            }
            from_lib_error(&e, request_id.as_str()).into_response()
        }
    }
}

/// Handle `GET /api/v1/pathfinding/graph`.
async fn graph_handler(State(state): State<AppState>) -> ServiceResponse<GraphSummary> {
    let snapshot = state.current_snapshot().await;
    ServiceResponse::new(GraphSummary::from_snapshot(&snapshot))
}

/// Handle `GET /api/v1/rooms/stats`.
async fn stats_handler(State(state): State<AppState>) -> ServiceResponse<RoomStats> {
    let snapshot = state.current_snapshot().await;
    ServiceResponse::new(RoomStats::from_rooms(&snapshot.rooms))
}
