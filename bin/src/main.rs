//! gaslamp CLI - Browse and export oBIX history data.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "gaslamp")]
#[command(about = "Browse and export oBIX history data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    server: ServerArgs,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (only log errors)
    #[arg(short, long, global = true)]
    quiet: bool,
}

/// Connection settings shared by every command.
#[derive(Args)]
pub(crate) struct ServerArgs {
    /// Server base URL (e.g., http://192.168.1.23)
    #[arg(long, env = "GASLAMP_URL", global = true)]
    pub(crate) url: Option<String>,

    /// User name for Basic authentication
    #[arg(long, env = "GASLAMP_USER", global = true, default_value = "")]
    pub(crate) user: String,

    /// Password for Basic authentication
    #[arg(long, env = "GASLAMP_PASSWORD", global = true, default_value = "", hide_env_values = true)]
    pub(crate) password: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "20")]
    pub(crate) timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// List history locations
    Locations,

    /// List the points of a location
    Points {
        /// Location name (e.g., site1)
        location: String,

        /// Print feed URLs instead of names
        #[arg(long)]
        urls: bool,
    },

    /// Export the history of a point
    History {
        /// Location name (e.g., site1)
        location: String,

        /// Point name (e.g., SolarPanelTemperature)
        point: String,

        /// Window start (ISO-8601 with offset). Defaults to 24 hours before the end.
        #[arg(short, long)]
        start: Option<String>,

        /// Window end (ISO-8601 with offset). Defaults to now.
        #[arg(short, long)]
        end: Option<String>,

        /// Maximum number of records the server should return
        #[arg(short, long, default_value = "100")]
        limit: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Output file path. Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Locations => commands::locations::list_locations(&cli.server),
        Commands::Points { location, urls } => {
            commands::points::list_points(&cli.server, &location, urls)
        }
        Commands::History {
            location,
            point,
            start,
            end,
            limit,
            format,
            output,
        } => commands::history::export_history(
            &cli.server,
            &location,
            &point,
            start.as_deref(),
            end.as_deref(),
            limit,
            format,
            output,
        ),
    }
}
