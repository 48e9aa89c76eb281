//! Test fixtures for handler tests.
//!
//! Enable the `test-utils` feature to use these from dependent crates.

use std::path::PathBuf;

use roomroute_lib::{load_snapshot, RoomSnapshot};

use crate::config::PathfindingConfig;
use crate::state::AppState;

/// Campus snapshot shared by the workspace tests.
pub const TEST_FIXTURE_PATH: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../docs/fixtures/campus.json");

/// Room names in the campus fixture.
pub mod fixture_rooms {
    /// Room 1, the default start.
    pub const LOBBY: &str = "Lobby";
    /// Reached via Library and Computer Lab; every route to it is safe.
    pub const SERVER_ROOM: &str = "Server Room";
    /// Full (25/25), so every route to it is blocked.
    pub const CHEMISTRY_LAB: &str = "Chemistry Lab";
    /// No connections at all.
    pub const ANNEX: &str = "Annex";
}

pub fn fixture_path() -> PathBuf {
    PathBuf::from(TEST_FIXTURE_PATH)
}

/// # Panics
///
/// Panics if the fixture cannot be loaded, which means the checkout is broken.
pub fn fixture_snapshot() -> RoomSnapshot {
    load_snapshot(&fixture_path())
        .unwrap_or_else(|e| panic!("failed to load fixture {TEST_FIXTURE_PATH}: {e}"))
}

/// State backed by the fixture file, re-read on every request like production.
///
/// # Panics
///
/// Panics if the fixture cannot be loaded.
pub fn test_state() -> AppState {
    AppState::load(fixture_path(), PathfindingConfig::default())
        .unwrap_or_else(|e| panic!("failed to load fixture {TEST_FIXTURE_PATH}: {e}"))
}

/// State around an in-memory snapshot.
pub fn state_with(snapshot: RoomSnapshot) -> AppState {
    AppState::from_snapshot(snapshot, PathfindingConfig::default())
}
