//! Roomroute library entry points.
//!
//! This crate loads a snapshot of rooms and their connections, builds the
//! room graph, enumerates candidate routes, scores them by length and
//! occupancy, and checks the winning route against a capacity policy.
//! Higher-level consumers (CLI, HTTP service) should only depend on the
//! functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod capacity;
pub mod dataset;
pub mod db;
pub mod error;
pub mod graph;
pub mod output;
pub mod path;
pub mod ranking;
pub mod routing;
pub mod scoring;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use capacity::{
    evaluate_capacity, BlockingRoom, CapacityPolicy, CapacityVerdict, RouteStatus,
    FULL_CAPACITY_PERCENT, STRICT_CAPACITY_PERCENT,
};
pub use dataset::{default_snapshot_path, resolve_snapshot_path, SNAPSHOT_ENV_VAR};
pub use db::{
    index_rooms, load_snapshot, load_snapshot_json, load_snapshot_sqlite, Connection,
    OccupancyLevel, Room, RoomId, RoomIndex, RoomSnapshot, SnapshotIssue,
};
pub use error::{Error, FailureKind, Result};
pub use graph::{build_graph, build_room_graph, GraphNode, GraphSummary, RoomGraph};
pub use output::{RouteEntry, RouteRenderMode, RouteResult};
pub use path::{
    enumerate_paths_bfs, enumerate_paths_dfs, PathLimits, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PATHS,
};
pub use ranking::rank_routes;
pub use routing::{
    find_path, find_path_observed, normalize_room_name, resolve_target, select_enumerator,
    BreadthFirstEnumerator, DepthFirstEnumerator, EnumerationStrategy, PathEnumerator,
    PathfindingStage, RouteObserver, RouteOptions, TracingObserver,
};
pub use scoring::{RouteScorer, ScoredRoute, ScoringPolicy, MAX_EFFICIENCY_SCORE};
pub use stats::{RoomStats, StatusBreakdown};
