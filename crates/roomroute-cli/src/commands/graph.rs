//! Graph command handler.

use std::path::Path;

use anyhow::{Context, Result};
use roomroute_cli::output::{render_graph, OutputFormat};
use roomroute_cli::terminal::ColorPalette;
use roomroute_lib::GraphSummary;
use tracing::debug;

use super::load_room_snapshot;

pub fn handle_graph(data: Option<&Path>, format: OutputFormat) -> Result<()> {
    let snapshot = load_room_snapshot(data)?;
    let summary = GraphSummary::from_snapshot(&snapshot);
    debug!(
        nodes = summary.total_nodes,
        edges = summary.total_edges,
        isolated = summary.isolated_rooms.len(),
        "graph summary built"
    );
    let rendered = render_graph(&summary, format, &ColorPalette::detect())
        .context("failed to render graph summary")?;
    print!("{rendered}");
    Ok(())
}
