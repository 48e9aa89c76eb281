use std::collections::{HashSet, VecDeque};

use crate::db::RoomId;
use crate::graph::RoomGraph;

/// Default number of candidate paths collected per query.
pub const DEFAULT_MAX_PATHS: usize = 10;
/// Default maximum number of edges in a candidate path.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Bounds applied to path enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLimits {
    /// Stop collecting once this many paths have been found.
    pub max_paths: usize,
    /// Maximum number of edges in any returned path.
    pub max_depth: usize,
}

impl Default for PathLimits {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_PATHS,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Enumerate simple paths from `start` to `target` depth-first.
///
/// Neighbours are explored in graph insertion order and the first
/// `limits.max_paths` paths found are returned. Paths never repeat a room and
/// never exceed `limits.max_depth` edges. Unknown endpoints, identical
/// endpoints, and disconnected endpoints all yield an empty list.
pub fn enumerate_paths_dfs(
    graph: &RoomGraph,
    start: RoomId,
    target: RoomId,
    limits: PathLimits,
) -> Vec<Vec<RoomId>> {
    if !searchable(graph, start, target, limits) {
        return Vec::new();
    }

    let mut search = DepthFirstSearch {
        graph,
        target,
        limits,
        path: vec![start],
        visited: HashSet::from([start]),
        found: Vec::new(),
    };
    search.visit(start);
    search.found
}

struct DepthFirstSearch<'a> {
    graph: &'a RoomGraph,
    target: RoomId,
    limits: PathLimits,
    path: Vec<RoomId>,
    visited: HashSet<RoomId>,
    found: Vec<Vec<RoomId>>,
}

impl DepthFirstSearch<'_> {
    fn visit(&mut self, current: RoomId) {
        if current == self.target {
            self.found.push(self.path.clone());
            return;
        }
        if self.path.len() > self.limits.max_depth {
            return;
        }

        let graph = self.graph;
        for &next in graph.neighbours(current) {
            if self.found.len() >= self.limits.max_paths {
                return;
            }
            if !self.visited.insert(next) {
                continue;
            }
            self.path.push(next);
            self.visit(next);
            self.path.pop();
            self.visited.remove(&next);
        }
    }
}

/// Enumerate simple paths from `start` to `target` breadth-first.
///
/// Paths are produced in non-decreasing edge count, subject to the same bounds
/// and edge cases as [`enumerate_paths_dfs`].
pub fn enumerate_paths_bfs(
    graph: &RoomGraph,
    start: RoomId,
    target: RoomId,
    limits: PathLimits,
) -> Vec<Vec<RoomId>> {
    if !searchable(graph, start, target, limits) {
        return Vec::new();
    }

    let mut found = Vec::new();
    let mut queue = VecDeque::from([vec![start]]);

    while let Some(path) = queue.pop_front() {
        let Some(&current) = path.last() else {
            continue;
        };
        if current == target {
            found.push(path);
            if found.len() >= limits.max_paths {
                break;
            }
            continue;
        }
        if path.len() > limits.max_depth {
            continue;
        }

        for &next in graph.neighbours(current) {
            if path.contains(&next) {
                continue;
            }
            let mut extended = Vec::with_capacity(path.len() + 1);
            extended.extend_from_slice(&path);
            extended.push(next);
            queue.push_back(extended);
        }
    }

    found
}

fn searchable(graph: &RoomGraph, start: RoomId, target: RoomId, limits: PathLimits) -> bool {
    start != target
        && graph.contains(start)
        && graph.contains(target)
        && limits.max_paths > 0
        && limits.max_depth > 0
}
