mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use roomroute_cli::output::OutputFormat;
use roomroute_lib::{RoomId, DEFAULT_MAX_DEPTH, DEFAULT_MAX_PATHS};

use commands::route::{RouteCommandArgs, StrategyArg};

#[derive(Parser, Debug)]
#[command(author, version, about = "Occupancy-aware routing between rooms")]
struct Cli {
    /// Room snapshot to load (`.json` or SQLite). Falls back to
    /// `ROOMROUTE_SNAPSHOT`, then the platform data directory.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find and rank routes from a room to a named destination.
    Route {
        /// Starting room id.
        #[arg(long = "from", default_value_t = 1)]
        from: RoomId,
        /// Destination room name (case-insensitive; a unique substring is enough).
        #[arg(long = "to")]
        to: String,
        /// Maximum number of candidate routes to enumerate.
        #[arg(long, default_value_t = DEFAULT_MAX_PATHS)]
        max_paths: usize,
        /// Maximum route length in steps.
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
        /// Enumeration strategy.
        #[arg(long, value_enum, default_value_t = StrategyArg::Dfs)]
        strategy: StrategyArg,
        /// Block rooms at 90% occupancy instead of only full rooms.
        #[arg(long)]
        strict_capacity: bool,
    },
    /// Summarise occupancy across all rooms.
    Stats,
    /// Show the room graph: neighbours per room and isolated rooms.
    Graph,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data = cli.data.as_deref();

    match cli.command {
        Command::Route {
            from,
            to,
            max_paths,
            max_depth,
            strategy,
            strict_capacity,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                max_paths,
                max_depth,
                strategy,
                strict_capacity,
            };
            commands::route::handle_route(data, &args, cli.format)
        }
        Command::Stats => commands::stats::handle_stats(data, cli.format),
        Command::Graph => commands::graph::handle_graph(data, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
