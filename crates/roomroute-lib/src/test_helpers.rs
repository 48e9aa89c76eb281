// Test-only helpers for `roomroute-lib` unit tests
#![allow(dead_code)]

use crate::db::{Connection, Room, RoomId, RoomSnapshot};

/// Room with a fixed area; only capacity and occupancy matter to routing.
pub fn room(id: RoomId, name: &str, capacity_max: u32, occupancy: u32) -> Room {
    Room {
        id,
        name: name.to_string(),
        area: 20.0,
        capacity_max,
        occupancy,
    }
}

/// Connections numbered in declaration order.
pub fn links(pairs: &[(RoomId, RoomId)]) -> Vec<Connection> {
    pairs
        .iter()
        .enumerate()
        .map(|(index, &(room_from, room_to))| Connection {
            id: index as i64 + 1,
            room_from,
            room_to,
        })
        .collect()
}

/// Builder for small snapshots used across the unit tests.
#[derive(Default)]
pub struct SnapshotBuilder {
    rooms: Vec<Room>,
    pairs: Vec<(RoomId, RoomId)>,
}

impl SnapshotBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room(mut self, id: RoomId, name: &str, capacity_max: u32, occupancy: u32) -> Self {
        self.rooms.push(room(id, name, capacity_max, occupancy));
        self
    }

    pub fn link(mut self, from: RoomId, to: RoomId) -> Self {
        self.pairs.push((from, to));
        self
    }

    pub fn build(self) -> RoomSnapshot {
        RoomSnapshot::new(self.rooms, links(&self.pairs))
    }
}

/// Lobby -> Hall -> Lab chain.
pub fn lobby_hall_lab(hall_occupancy: u32) -> RoomSnapshot {
    SnapshotBuilder::new()
        .room(1, "Lobby", 10, 2)
        .room(2, "Hall", 10, hall_occupancy)
        .room(3, "Lab", 5, 1)
        .link(1, 2)
        .link(2, 3)
        .build()
}
