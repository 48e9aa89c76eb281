//! Occupancy-aware route planning.
//!
//! This module provides:
//! - [`RouteOptions`] - Enumeration bounds, strategy and policies for one query
//! - [`PathfindingStage`] - The stages a query moves through
//! - [`RouteObserver`] - Optional hook notified as a query progresses
//! - [`find_path`] / [`find_path_observed`] - Main entry points
//!
//! # Strategy Pattern
//!
//! Candidate paths are produced by a [`PathEnumerator`] chosen from
//! [`EnumerationStrategy`], so depth-first and breadth-first enumeration share
//! the same scoring, ranking and capacity pipeline.
//!
//! # Example
//!
//! ```ignore
//! use roomroute_lib::{find_path, load_snapshot, RouteOptions};
//!
//! let snapshot = load_snapshot("rooms.db".as_ref())?;
//! let result = find_path(&snapshot.rooms, &snapshot.connections, 1, "Lab", &RouteOptions::default())?;
//! println!("{}: {}", result.status, result.optimal_route.join(" -> "));
//! ```

mod planner;

pub use planner::{select_enumerator, BreadthFirstEnumerator, DepthFirstEnumerator, PathEnumerator};

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::capacity::{evaluate_capacity, CapacityPolicy};
use crate::db::{fuzzy_matches, index_rooms, Connection, Room, RoomId};
use crate::error::{Error, Result};
use crate::graph::build_room_graph;
use crate::output::RouteResult;
use crate::path::{PathLimits, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PATHS};
use crate::ranking::rank_routes;
use crate::scoring::{RouteScorer, ScoringPolicy};

/// Number of fuzzy suggestions attached to unknown-room errors.
const SUGGESTION_LIMIT: usize = 3;

/// Supported path enumeration strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationStrategy {
    /// Bounded depth-first search with backtracking.
    #[default]
    DepthFirst,
    /// Bounded breadth-first search over partial paths.
    BreadthFirst,
}

impl fmt::Display for EnumerationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            EnumerationStrategy::DepthFirst => "dfs",
            EnumerationStrategy::BreadthFirst => "bfs",
        };
        f.write_str(value)
    }
}

/// Tunables applied to one route query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteOptions {
    pub max_paths: usize,
    pub max_depth: usize,
    pub strategy: EnumerationStrategy,
    pub scoring: ScoringPolicy,
    pub capacity: CapacityPolicy,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_PATHS,
            max_depth: DEFAULT_MAX_DEPTH,
            strategy: EnumerationStrategy::default(),
            scoring: ScoringPolicy::default(),
            capacity: CapacityPolicy::default(),
        }
    }
}

impl RouteOptions {
    pub fn limits(&self) -> PathLimits {
        PathLimits {
            max_paths: self.max_paths,
            max_depth: self.max_depth,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.max_paths == 0 {
            return Err(Error::invalid_input("max_paths must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(Error::invalid_input("max_depth must be at least 1"));
        }
        if self.capacity.blocking_percent == 0 {
            return Err(Error::invalid_input("blocking_percent must be at least 1"));
        }
        let weights = [
            self.scoring.length_weight,
            self.scoring.occupancy_weight,
            self.scoring.step_penalty,
        ];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::invalid_input(
                "scoring weights must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Stages a route query passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PathfindingStage {
    ValidatingInput,
    BuildingGraph,
    ResolvingEndpoints,
    Enumerating,
    Scoring,
    Ranking,
    EvaluatingCapacity,
    Done,
}

impl fmt::Display for PathfindingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PathfindingStage::ValidatingInput => "validating_input",
            PathfindingStage::BuildingGraph => "building_graph",
            PathfindingStage::ResolvingEndpoints => "resolving_endpoints",
            PathfindingStage::Enumerating => "enumerating",
            PathfindingStage::Scoring => "scoring",
            PathfindingStage::Ranking => "ranking",
            PathfindingStage::EvaluatingCapacity => "evaluating_capacity",
            PathfindingStage::Done => "done",
        };
        f.write_str(value)
    }
}

/// Receives progress notifications from [`find_path_observed`].
///
/// All methods default to no-ops so implementors only override what they need.
pub trait RouteObserver {
    fn on_stage(&self, _stage: PathfindingStage) {}

    fn on_paths_enumerated(&self, _count: usize) {}

    fn on_failure(&self, _stage: PathfindingStage, _error: &Error) {}
}

/// Observer that forwards progress to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RouteObserver for TracingObserver {
    fn on_stage(&self, stage: PathfindingStage) {
        debug!(%stage, "pathfinding stage");
    }

    fn on_paths_enumerated(&self, count: usize) {
        debug!(count, "candidate paths enumerated");
    }

    fn on_failure(&self, stage: PathfindingStage, error: &Error) {
        debug!(%stage, %error, "pathfinding failed");
    }
}

struct Progress<'a> {
    observer: Option<&'a dyn RouteObserver>,
    stage: PathfindingStage,
}

impl Progress<'_> {
    fn enter(&mut self, stage: PathfindingStage) {
        self.stage = stage;
        if let Some(observer) = self.observer {
            observer.on_stage(stage);
        }
    }

    fn enumerated(&self, count: usize) {
        if let Some(observer) = self.observer {
            observer.on_paths_enumerated(count);
        }
    }
}

/// Compute ranked routes from `start_id` to the room matching `target_query`.
///
/// Equivalent to [`find_path_observed`] without an observer.
pub fn find_path(
    rooms: &[Room],
    connections: &[Connection],
    start_id: RoomId,
    target_query: &str,
    options: &RouteOptions,
) -> Result<RouteResult> {
    find_path_observed(rooms, connections, start_id, target_query, options, None)
}

/// Compute ranked routes, notifying `observer` of each stage.
///
/// A blocked route is a successful result; only unresolvable input,
/// disconnected endpoints and internal mismatches are errors.
pub fn find_path_observed(
    rooms: &[Room],
    connections: &[Connection],
    start_id: RoomId,
    target_query: &str,
    options: &RouteOptions,
    observer: Option<&dyn RouteObserver>,
) -> Result<RouteResult> {
    let mut progress = Progress {
        observer,
        stage: PathfindingStage::ValidatingInput,
    };

    let outcome = run_query(
        rooms,
        connections,
        start_id,
        target_query,
        options,
        &mut progress,
    );
    if let (Err(error), Some(observer)) = (&outcome, observer) {
        observer.on_failure(progress.stage, error);
    }
    outcome
}

fn run_query(
    rooms: &[Room],
    connections: &[Connection],
    start_id: RoomId,
    target_query: &str,
    options: &RouteOptions,
    progress: &mut Progress<'_>,
) -> Result<RouteResult> {
    progress.enter(PathfindingStage::ValidatingInput);
    if target_query.trim().is_empty() {
        return Err(Error::invalid_input("target room must not be empty"));
    }
    options.validate()?;

    progress.enter(PathfindingStage::BuildingGraph);
    let graph = build_room_graph(rooms, connections);
    let index = index_rooms(rooms);

    progress.enter(PathfindingStage::ResolvingEndpoints);
    let start = index
        .get(&start_id)
        .copied()
        .ok_or(Error::UnknownRoomId { id: start_id })?;
    let target = resolve_target(rooms, target_query)?;
    if start.id == target.id {
        return Err(Error::invalid_input(format!(
            "start and target both resolve to '{}'",
            start.name
        )));
    }

    progress.enter(PathfindingStage::Enumerating);
    let enumerator = select_enumerator(options.strategy);
    let paths = enumerator.enumerate(&graph, start.id, target.id, options.limits());
    progress.enumerated(paths.len());
    if paths.is_empty() {
        return Err(Error::NoPathFound {
            start: start.name.clone(),
            target: target.name.clone(),
        });
    }

    progress.enter(PathfindingStage::Scoring);
    let scored = RouteScorer::new(&index, options.scoring).score_all(&paths);

    progress.enter(PathfindingStage::Ranking);
    let ranked = rank_routes(scored);

    progress.enter(PathfindingStage::EvaluatingCapacity);
    let optimal = ranked.first().ok_or_else(|| Error::InternalInconsistency {
        reason: "ranking discarded every enumerated path".to_string(),
    })?;
    check_endpoints(&optimal.path, start.id, target.id)?;
    let verdict = evaluate_capacity(&optimal.path, &index, options.capacity);

    let result = RouteResult::new(start, target, ranked, verdict);
    progress.enter(PathfindingStage::Done);
    Ok(result)
}

fn check_endpoints(path: &[RoomId], start: RoomId, target: RoomId) -> Result<()> {
    match (path.first(), path.last()) {
        (Some(&first), Some(&last)) if first == start && last == target => Ok(()),
        _ => Err(Error::InternalInconsistency {
            reason: format!("optimal route {path:?} does not run from room {start} to room {target}"),
        }),
    }
}

/// Normalise a room name for matching: trimmed, lowercased, single-spaced.
pub fn normalize_room_name(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a target query against the room list.
///
/// An exact match on the normalised name wins. Otherwise the query must be a
/// substring of exactly one normalised name; several candidates are reported
/// as ambiguous instead of picking one.
pub fn resolve_target<'a>(rooms: &'a [Room], query: &str) -> Result<&'a Room> {
    let needle = normalize_room_name(query);
    if needle.is_empty() {
        return Err(Error::invalid_input("target room must not be empty"));
    }

    let normalized: Vec<(String, &Room)> = rooms
        .iter()
        .map(|room| (normalize_room_name(&room.name), room))
        .collect();

    let exact: Vec<&Room> = normalized
        .iter()
        .filter(|(name, _)| *name == needle)
        .map(|(_, room)| *room)
        .collect();
    let candidates = if exact.is_empty() {
        normalized
            .iter()
            .filter(|(name, _)| name.contains(&needle))
            .map(|(_, room)| *room)
            .collect()
    } else {
        exact
    };

    match candidates.as_slice() {
        [room] => Ok(*room),
        [] => Err(Error::UnknownRoom {
            name: query.trim().to_string(),
            suggestions: fuzzy_matches(rooms, query, SUGGESTION_LIMIT),
        }),
        many => Err(Error::AmbiguousRoom {
            query: query.trim().to_string(),
            candidates: many.iter().map(|room| room.name.clone()).collect(),
        }),
    }
}
