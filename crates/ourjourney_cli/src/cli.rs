use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ourjourney_core::Party;

/// OurJourney custody calendar tools.
#[derive(Debug, Parser)]
#[command(
    name = "ourjourney",
    version,
    about = "Custody schedule queries and journal API server"
)]
pub struct Cli {
    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files; without it `--log-level`
    /// logs to stderr.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show custody for one date (YYYY-MM-DD).
    Status { date: String },
    /// Show custody for every day in an inclusive range.
    Range { start: String, end: String },
    /// Show custody for a month (1 = January).
    Month { year: i32, month: u32 },
    /// List upcoming free evenings.
    Free(FreeArgs),
    /// Run the HTTP API.
    Serve(ServeArgs),
}

#[derive(Debug, clap::Args)]
pub struct FreeArgs {
    /// First date to consider; defaults to today.
    #[arg(long)]
    pub from: Option<String>,

    #[arg(short, long, default_value_t = ourjourney_core::schedule::DEFAULT_FREE_EVENING_COUNT)]
    pub count: usize,

    /// Days to scan before giving up.
    #[arg(long, default_value_t = ourjourney_core::schedule::DEFAULT_FREE_EVENING_HORIZON_DAYS)]
    pub horizon: u32,

    /// Whose free evenings to list (you|mom).
    #[arg(long, default_value = "you", value_parser = parse_party)]
    pub side: Party,
}

#[derive(Debug, clap::Args)]
pub struct ServeArgs {
    /// Path to TOML configuration; defaults apply when the file is missing.
    #[arg(short, long, default_value = "ourjourney.toml")]
    pub config: PathBuf,

    /// Override `bind` from the config file.
    #[arg(long)]
    pub bind: Option<String>,

    /// Override `db_path` from the config file.
    #[arg(long)]
    pub db: Option<PathBuf>,
}

fn parse_party(value: &str) -> Result<Party, String> {
    value.parse()
}
