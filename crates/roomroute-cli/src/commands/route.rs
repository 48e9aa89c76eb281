//! Route command handler for finding paths between rooms.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;

use roomroute_cli::output::{render_route, OutputFormat};
use roomroute_cli::terminal::ColorPalette;
use roomroute_lib::{
    find_path_observed, CapacityPolicy, EnumerationStrategy, Error as RouteError, RoomId,
    RouteOptions, TracingObserver, DEFAULT_MAX_DEPTH,
};

use super::load_room_snapshot;

/// Enumeration strategy accepted by `--strategy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StrategyArg {
    /// Depth-first search with backtracking.
    #[default]
    Dfs,
    /// Breadth-first search; shorter paths surface first.
    Bfs,
}

impl From<StrategyArg> for EnumerationStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Dfs => EnumerationStrategy::DepthFirst,
            StrategyArg::Bfs => EnumerationStrategy::BreadthFirst,
        }
    }
}

/// Arguments for the route command.
#[derive(Debug, Clone)]
pub struct RouteCommandArgs {
    /// Starting room id.
    pub from: RoomId,
    /// Destination room name (case-insensitive, substring allowed).
    pub to: String,
    pub max_paths: usize,
    pub max_depth: usize,
    pub strategy: StrategyArg,
    /// Treat rooms at 90% or more as blocking.
    pub strict_capacity: bool,
}

impl RouteCommandArgs {
    /// Convert CLI args to library route options.
    pub fn to_options(&self) -> RouteOptions {
        let capacity = if self.strict_capacity {
            CapacityPolicy::strict()
        } else {
            CapacityPolicy::full()
        };
        RouteOptions {
            max_paths: self.max_paths,
            max_depth: self.max_depth,
            strategy: self.strategy.into(),
            capacity,
            ..RouteOptions::default()
        }
    }
}

pub fn handle_route(
    data: Option<&Path>,
    args: &RouteCommandArgs,
    format: OutputFormat,
) -> Result<()> {
    let snapshot = load_room_snapshot(data)?;
    let options = args.to_options();

    let result = find_path_observed(
        &snapshot.rooms,
        &snapshot.connections,
        args.from,
        &args.to,
        &options,
        Some(&TracingObserver),
    )
    .map_err(|err| handle_route_failure(args, err))?;

    let rendered = render_route(&result, format, &ColorPalette::detect())
        .context("failed to render route result")?;
    print!("{rendered}");
    Ok(())
}

fn handle_route_failure(args: &RouteCommandArgs, err: RouteError) -> anyhow::Error {
    match err {
        RouteError::UnknownRoom { name, suggestions } => {
            anyhow::anyhow!(format_unknown_room_message(&name, &suggestions))
        }
        RouteError::AmbiguousRoom { query, candidates } => {
            anyhow::anyhow!(format_ambiguous_room_message(&query, &candidates))
        }
        RouteError::UnknownRoomId { id } => {
            anyhow::anyhow!("Unknown start room id {id}. Run `stats` or `graph` to list rooms.")
        }
        RouteError::NoPathFound { start, target } => {
            anyhow::anyhow!(format_no_path_message(&start, &target, args))
        }
        other => anyhow::Error::new(other),
    }
}

fn format_unknown_room_message(name: &str, suggestions: &[String]) -> String {
    let mut message = format!("Unknown room '{name}'.");
    match suggestions {
        [] => {}
        [only] => message.push_str(&format!(" Did you mean '{only}'?")),
        many => {
            message.push_str(&format!(" Did you mean one of: {}?", quote_all(many)));
        }
    }
    message
}

fn format_ambiguous_room_message(query: &str, candidates: &[String]) -> String {
    format!(
        "Room name '{query}' is ambiguous. It matches {}. Use a more specific name.",
        quote_all(candidates)
    )
}

fn format_no_path_message(start: &str, target: &str, args: &RouteCommandArgs) -> String {
    let mut message = format!("No route found between {start} and {target}.");
    if args.max_depth < DEFAULT_MAX_DEPTH {
        message.push_str(" Try increasing --max-depth.");
    } else {
        message.push_str(" The rooms may not be connected; check the snapshot with `graph`.");
    }
    message
}

fn quote_all(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomroute_lib::DEFAULT_MAX_PATHS;

    fn args(max_depth: usize) -> RouteCommandArgs {
        RouteCommandArgs {
            from: 1,
            to: "Lab".to_string(),
            max_paths: DEFAULT_MAX_PATHS,
            max_depth,
            strategy: StrategyArg::Bfs,
            strict_capacity: true,
        }
    }

    #[test]
    fn options_follow_flags() {
        let options = args(4).to_options();
        assert_eq!(options.max_depth, 4);
        assert_eq!(options.strategy, EnumerationStrategy::BreadthFirst);
        assert_eq!(options.capacity, CapacityPolicy::strict());
    }

    #[test]
    fn unknown_room_message_lists_suggestions() {
        assert_eq!(format_unknown_room_message("Zzz", &[]), "Unknown room 'Zzz'.");
        assert_eq!(
            format_unknown_room_message("Libary", &["Library".to_string()]),
            "Unknown room 'Libary'. Did you mean 'Library'?"
        );
        let many = vec!["Lab".to_string(), "Lobby".to_string()];
        assert!(format_unknown_room_message("Lb", &many).contains("one of: 'Lab', 'Lobby'?"));
    }

    #[test]
    fn no_path_message_suggests_depth_when_lowered() {
        assert!(format_no_path_message("A", "B", &args(2)).contains("--max-depth"));
        assert!(format_no_path_message("A", "B", &args(DEFAULT_MAX_DEPTH)).contains("`graph`"));
    }
}
