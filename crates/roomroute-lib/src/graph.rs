use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::db::{Connection, Room, RoomId, RoomSnapshot};

/// Undirected adjacency structure over the rooms of one snapshot.
///
/// Every room gets an entry, so isolated rooms are valid nodes without
/// neighbours. Neighbour lists keep connection insertion order, which is the
/// traversal order used by the path enumerators.
#[derive(Debug, Clone, Default)]
pub struct RoomGraph {
    adjacency: Arc<HashMap<RoomId, Vec<RoomId>>>,
}

impl RoomGraph {
    /// Neighbours of `room`, or an empty slice for unknown rooms.
    pub fn neighbours(&self, room: RoomId) -> &[RoomId] {
        self.adjacency
            .get(&room)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, room: RoomId) -> bool {
        self.adjacency.contains_key(&room)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of unique undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum::<usize>() / 2
    }
}

/// Build the room graph from a snapshot.
pub fn build_graph(snapshot: &RoomSnapshot) -> RoomGraph {
    build_room_graph(&snapshot.rooms, &snapshot.connections)
}

/// Build the room graph from raw room and connection lists.
///
/// Connections that reference unknown rooms or loop onto a single room are
/// ignored. Duplicate connections between the same pair collapse to one edge
/// regardless of their direction.
pub fn build_room_graph(rooms: &[Room], connections: &[Connection]) -> RoomGraph {
    let mut adjacency: HashMap<RoomId, Vec<RoomId>> = HashMap::with_capacity(rooms.len());
    for room in rooms {
        adjacency.entry(room.id).or_default();
    }

    for connection in connections {
        if connection.is_self_loop() {
            continue;
        }
        let (from, to) = (connection.room_from, connection.room_to);
        if !adjacency.contains_key(&from) || !adjacency.contains_key(&to) {
            continue;
        }
        insert_neighbour(&mut adjacency, from, to);
        insert_neighbour(&mut adjacency, to, from);
    }

    RoomGraph {
        adjacency: Arc::new(adjacency),
    }
}

fn insert_neighbour(adjacency: &mut HashMap<RoomId, Vec<RoomId>>, from: RoomId, to: RoomId) {
    let entry = adjacency.entry(from).or_default();
    if !entry.contains(&to) {
        entry.push(to);
    }
}

/// One node of the graph summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: RoomId,
    pub name: String,
    pub neighbors: Vec<RoomId>,
}

/// Structure overview of the room graph, used for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub nodes: Vec<GraphNode>,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub isolated_rooms: Vec<String>,
}

impl GraphSummary {
    pub fn from_snapshot(snapshot: &RoomSnapshot) -> Self {
        let graph = build_graph(snapshot);

        let mut nodes: Vec<GraphNode> = snapshot
            .rooms
            .iter()
            .map(|room| {
                let mut neighbors = graph.neighbours(room.id).to_vec();
                neighbors.sort_unstable();
                GraphNode {
                    id: room.id,
                    name: room.name.clone(),
                    neighbors,
                }
            })
            .collect();
        nodes.sort_by_key(|node| node.id);

        let isolated_rooms = nodes
            .iter()
            .filter(|node| node.neighbors.is_empty())
            .map(|node| node.name.clone())
            .collect();

        Self {
            total_nodes: graph.node_count(),
            total_edges: graph.edge_count(),
            nodes,
            isolated_rooms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{links, room, SnapshotBuilder};

    #[test]
    fn build_is_symmetric_and_deduplicated() {
        let rooms = vec![room(1, "A", 5, 0), room(2, "B", 5, 0), room(3, "C", 5, 0)];
        let graph = build_room_graph(&rooms, &links(&[(1, 2), (2, 1), (1, 2), (2, 3)]));

        assert_eq!(graph.neighbours(1), &[2]);
        assert_eq!(graph.neighbours(2), &[1, 3]);
        assert_eq!(graph.neighbours(3), &[2]);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn unknown_rooms_and_self_loops_are_ignored() {
        let rooms = vec![room(1, "A", 5, 0), room(2, "B", 5, 0)];
        let graph = build_room_graph(&rooms, &links(&[(1, 1), (1, 99), (1, 2)]));

        assert_eq!(graph.neighbours(1), &[2]);
        assert!(!graph.contains(99));
        assert!(graph.neighbours(99).is_empty());
    }

    #[test]
    fn isolated_rooms_are_nodes() {
        let rooms = vec![room(1, "A", 5, 0), room(4, "Annex", 5, 0)];
        let graph = build_room_graph(&rooms, &[]);
        assert_eq!(graph.node_count(), 2);
        assert!(graph.contains(4));
        assert!(graph.neighbours(4).is_empty());
    }

    #[test]
    fn summary_lists_nodes_by_id_and_isolated_rooms() {
        let snapshot = SnapshotBuilder::new()
            .room(3, "Lab", 5, 0)
            .room(1, "Lobby", 10, 0)
            .room(2, "Hall", 10, 0)
            .room(4, "Annex", 5, 0)
            .link(2, 3)
            .link(1, 2)
            .build();

        let summary = GraphSummary::from_snapshot(&snapshot);
        let ids: Vec<RoomId> = summary.nodes.iter().map(|node| node.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(summary.nodes[1].neighbors, vec![1, 3]);
        assert_eq!(summary.total_nodes, 4);
        assert_eq!(summary.total_edges, 2);
        assert_eq!(summary.isolated_rooms, vec!["Annex".to_string()]);
    }
}
