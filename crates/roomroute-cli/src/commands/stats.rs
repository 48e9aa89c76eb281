//! Stats command handler.

use std::path::Path;

use anyhow::{Context, Result};
use roomroute_cli::output::{render_stats, OutputFormat};
use roomroute_cli::terminal::ColorPalette;
use roomroute_lib::RoomStats;

use super::load_room_snapshot;

pub fn handle_stats(data: Option<&Path>, format: OutputFormat) -> Result<()> {
    let snapshot = load_room_snapshot(data)?;
    let stats = RoomStats::from_rooms(&snapshot.rooms);
    let rendered = render_stats(&stats, format, &ColorPalette::detect())
        .context("failed to render room statistics")?;
    print!("{rendered}");
    Ok(())
}
