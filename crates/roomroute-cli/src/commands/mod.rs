// Subcommand handlers. main.rs parses arguments and dispatches here; each
// handler loads the snapshot, calls the library and prints rendered output.

pub mod graph;
pub mod route;
pub mod stats;

use std::path::Path;

use anyhow::{Context, Result};
use roomroute_lib::{load_snapshot, resolve_snapshot_path, RoomSnapshot};

/// Locate and load the room snapshot named by `--data` (or its fallbacks).
pub fn load_room_snapshot(data: Option<&Path>) -> Result<RoomSnapshot> {
    let path = resolve_snapshot_path(data).context("failed to locate the room snapshot")?;
    load_snapshot(&path)
        .with_context(|| format!("failed to load room snapshot from {}", path.display()))
}
