//! Output formatting for route, stats and graph views.
//!
//! Every renderer returns a `String` so the commands stay thin and the
//! formats can be checked without spawning the binary.

use std::fmt::Write;

use clap::ValueEnum;
use roomroute_lib::{GraphSummary, RoomStats, RouteRenderMode, RouteResult};

use crate::terminal::ColorPalette;

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-friendly text, colored when the terminal allows it.
    #[default]
    Text,
    /// Markdown-flavoured text for chat and issue trackers.
    Rich,
    /// Compact note: a headline then one room per line.
    Note,
    /// The JSON contract shared with the HTTP service.
    Json,
}

impl OutputFormat {
    /// Library render mode backing the non-JSON formats.
    fn render_mode(self) -> Option<RouteRenderMode> {
        match self {
            OutputFormat::Text => Some(RouteRenderMode::PlainText),
            OutputFormat::Rich => Some(RouteRenderMode::RichText),
            OutputFormat::Note => Some(RouteRenderMode::Note),
            OutputFormat::Json => None,
        }
    }
}

/// Render a route result in the requested format.
pub fn render_route(
    result: &RouteResult,
    format: OutputFormat,
    palette: &ColorPalette,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => to_json(result),
        OutputFormat::Text => Ok(render_route_text(result, palette)),
        other => Ok(other
            .render_mode()
            .map(|mode| result.render(mode))
            .unwrap_or_default()),
    }
}

fn render_route_text(result: &RouteResult, p: &ColorPalette) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Route: {wb}{}{r} -> {wb}{}{r} ({} steps, status: {sc}{}{r})",
        result.origin_room,
        result.target_room,
        result.optimal_steps(),
        result.status,
        wb = p.white_bold,
        sc = p.status(result.status),
        r = p.reset,
    );
    let _ = writeln!(buffer, "Optimal: {}", result.optimal_route.join(" -> "));
    let _ = writeln!(buffer, "Target occupancy: {}", result.target_occupancy);

    for room in &result.blocking_rooms {
        let _ = writeln!(
            buffer,
            "{}Blocked:{} {} ({})",
            p.red,
            p.reset,
            room.name,
            room.occupancy_label()
        );
    }

    let _ = writeln!(buffer, "Candidates:");
    for (index, entry) in result.all_routes.iter().enumerate() {
        let (marker, tint) = if entry.is_optimal {
            ("*", "")
        } else {
            (" ", p.gray)
        };
        let _ = writeln!(
            buffer,
            "{tint}{marker}{:>2}: score {:>3} ({:>4}) steps {} avg {} | {}{}",
            index + 1,
            entry.score,
            entry.relative_to_optimal,
            entry.steps,
            entry.avg_occupancy,
            entry.route.join(" -> "),
            p.reset,
        );
    }
    buffer
}

/// Render aggregate room statistics.
pub fn render_stats(
    stats: &RoomStats,
    format: OutputFormat,
    palette: &ColorPalette,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return to_json(stats);
    }

    let p = palette;
    let breakdown = &stats.status_breakdown;
    let mut buffer = String::new();
    match format {
        OutputFormat::Rich => {
            let _ = writeln!(buffer, "**Rooms** `{}`", stats.total_rooms);
            let _ = writeln!(
                buffer,
                "* occupancy `{}/{}` (average {})",
                stats.total_occupancy, stats.total_capacity, stats.average_occupancy
            );
            let _ = writeln!(
                buffer,
                "* green `{}` yellow `{}` red `{}`",
                breakdown.green, breakdown.yellow, breakdown.red
            );
        }
        OutputFormat::Note => {
            let _ = writeln!(
                buffer,
                "{} rooms, {}/{} occupied, avg {}",
                stats.total_rooms,
                stats.total_occupancy,
                stats.total_capacity,
                stats.average_occupancy
            );
        }
        _ => {
            let _ = writeln!(buffer, "Rooms: {}", stats.total_rooms);
            let _ = writeln!(buffer, "Total capacity: {}", stats.total_capacity);
            let _ = writeln!(buffer, "Total occupancy: {}", stats.total_occupancy);
            let _ = writeln!(buffer, "Average occupancy: {}", stats.average_occupancy);
            let _ = writeln!(
                buffer,
                "Status: {}green {}{r}, {}yellow {}{r}, {}red {}{r}",
                p.green,
                breakdown.green,
                p.yellow,
                breakdown.yellow,
                p.red,
                breakdown.red,
                r = p.reset,
            );
        }
    }
    Ok(buffer)
}

/// Render the room graph structure.
pub fn render_graph(
    summary: &GraphSummary,
    format: OutputFormat,
    palette: &ColorPalette,
) -> serde_json::Result<String> {
    if format == OutputFormat::Json {
        return to_json(summary);
    }

    let p = palette;
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "Graph: {} rooms, {} connections",
        summary.total_nodes, summary.total_edges
    );
    for node in &summary.nodes {
        let neighbors = node
            .neighbors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            buffer,
            "{:>4} {wb}{}{r} {}->{r} [{}]",
            node.id,
            node.name,
            p.gray,
            neighbors,
            wb = p.white_bold,
            r = p.reset,
        );
    }
    if !summary.isolated_rooms.is_empty() {
        let _ = writeln!(
            buffer,
            "{}Isolated:{} {}",
            p.yellow,
            p.reset,
            summary.isolated_rooms.join(", ")
        );
    }
    Ok(buffer)
}

fn to_json<T: serde::Serialize>(value: &T) -> serde_json::Result<String> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomroute_lib::{find_path, Connection, Room, RoomSnapshot, RouteOptions};

    fn snapshot() -> RoomSnapshot {
        let room = |id, name: &str, capacity_max, occupancy| Room {
            id,
            name: name.to_string(),
            area: 10.0,
            capacity_max,
            occupancy,
        };
        RoomSnapshot::new(
            vec![
                room(1, "Lobby", 10, 1),
                room(2, "Hall", 10, 10),
                room(3, "Lab", 5, 1),
                room(4, "Annex", 5, 4),
            ],
            vec![
                Connection {
                    id: 1,
                    room_from: 1,
                    room_to: 2,
                },
                Connection {
                    id: 2,
                    room_from: 2,
                    room_to: 3,
                },
            ],
        )
    }

    fn blocked_result() -> RouteResult {
        let snapshot = snapshot();
        find_path(
            &snapshot.rooms,
            &snapshot.connections,
            1,
            "Lab",
            &RouteOptions::default(),
        )
        .expect("route exists")
    }

    #[test]
    fn plain_text_matches_library_render() {
        let result = blocked_result();
        let text = render_route(&result, OutputFormat::Text, &ColorPalette::plain()).expect("text");
        assert_eq!(text, result.render(RouteRenderMode::PlainText));
    }

    #[test]
    fn colored_text_highlights_blocked_status() {
        let result = blocked_result();
        let text =
            render_route(&result, OutputFormat::Text, &ColorPalette::colored()).expect("text");
        assert!(text.contains("status: \x1b[31mblocked\x1b[0m"));
    }

    #[test]
    fn json_route_uses_contract_keys() {
        let text = render_route(&blocked_result(), OutputFormat::Json, &ColorPalette::plain())
            .expect("json");
        let value: serde_json::Value = serde_json::from_str(&text).expect("valid json");
        assert_eq!(value["status"], "blocked");
        assert_eq!(value["blockedRooms"], serde_json::json!(["Hall"]));
    }

    #[test]
    fn stats_text_lists_breakdown() {
        let stats = RoomStats::from_rooms(&snapshot().rooms);
        let text = render_stats(&stats, OutputFormat::Text, &ColorPalette::plain()).expect("text");
        assert!(text.contains("Rooms: 4"));
        assert!(text.contains("Total capacity: 30"));
        assert!(text.contains("Status: green 2, yellow 1, red 1"));
    }

    #[test]
    fn graph_text_reports_isolated_rooms() {
        let summary = GraphSummary::from_snapshot(&snapshot());
        let text =
            render_graph(&summary, OutputFormat::Text, &ColorPalette::plain()).expect("text");
        assert!(text.starts_with("Graph: 4 rooms, 2 connections"));
        assert!(text.contains("   2 Hall -> [1, 3]"));
        assert!(text.contains("Isolated: Annex"));
    }
}
