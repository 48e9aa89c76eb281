//! Shared fixture helpers for integration tests.

use std::path::PathBuf;

use roomroute_lib::{load_snapshot, Connection, Room, RoomId, RoomSnapshot};

/// Path to the fixtures directory shared by the workspace.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// The eight-room campus fixture.
pub fn campus_snapshot() -> RoomSnapshot {
    load_snapshot(&fixtures_dir().join("campus.json")).expect("campus fixture loads")
}

#[allow(dead_code)]
pub fn room(id: RoomId, name: &str, capacity_max: u32, occupancy: u32) -> Room {
    Room {
        id,
        name: name.to_string(),
        area: 25.0,
        capacity_max,
        occupancy,
    }
}

#[allow(dead_code)]
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
