//! Path enumeration strategies.
//!
//! The `PathEnumerator` trait lets the orchestrator swap between depth-first
//! and breadth-first enumeration without knowing how either one walks the
//! graph. Both honour the same bounds and simple-path guarantees.

use crate::db::RoomId;
use crate::graph::RoomGraph;
use crate::path::{enumerate_paths_bfs, enumerate_paths_dfs, PathLimits};

use super::EnumerationStrategy;

/// Strategy for collecting candidate paths between two rooms.
pub trait PathEnumerator: Send + Sync {
    /// Strategy identifier for this enumerator.
    fn strategy(&self) -> EnumerationStrategy;

    /// Collect up to `limits.max_paths` simple paths from `start` to `target`.
    fn enumerate(
        &self,
        graph: &RoomGraph,
        start: RoomId,
        target: RoomId,
        limits: PathLimits,
    ) -> Vec<Vec<RoomId>>;
}

/// Depth-first enumeration with backtracking; paths appear in neighbour order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirstEnumerator;

impl PathEnumerator for DepthFirstEnumerator {
    fn strategy(&self) -> EnumerationStrategy {
        EnumerationStrategy::DepthFirst
    }

    fn enumerate(
        &self,
        graph: &RoomGraph,
        start: RoomId,
        target: RoomId,
        limits: PathLimits,
    ) -> Vec<Vec<RoomId>> {
        enumerate_paths_dfs(graph, start, target, limits)
    }
}

/// Queue-based enumeration; shorter paths are found first.
#[derive(Debug, Clone, Copy, Default)]
pub struct BreadthFirstEnumerator;

impl PathEnumerator for BreadthFirstEnumerator {
    fn strategy(&self) -> EnumerationStrategy {
        EnumerationStrategy::BreadthFirst
    }

    fn enumerate(
        &self,
        graph: &RoomGraph,
        start: RoomId,
        target: RoomId,
        limits: PathLimits,
    ) -> Vec<Vec<RoomId>> {
        enumerate_paths_bfs(graph, start, target, limits)
    }
}

/// Select the enumerator for a strategy.
pub fn select_enumerator(strategy: EnumerationStrategy) -> Box<dyn PathEnumerator> {
    match strategy {
        EnumerationStrategy::DepthFirst => Box::new(DepthFirstEnumerator),
        EnumerationStrategy::BreadthFirst => Box::new(BreadthFirstEnumerator),
    }
}
