//! `ourjourney` command-line entry point.
//!
//! # Responsibility
//! - Run custody queries locally and print JSON to stdout.
//! - Start the HTTP API with file config plus flag overrides.

mod cli;
mod commands;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};
use crate::commands::LogFlags;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let flags = LogFlags {
        level: cli.log_level,
        dir: cli.log_dir,
    };

    match cli.command {
        Command::Status { date } => {
            flags.init()?;
            commands::status(&date)
        }
        Command::Range { start, end } => {
            flags.init()?;
            commands::range(&start, &end)
        }
        Command::Month { year, month } => {
            flags.init()?;
            commands::month(year, month)
        }
        Command::Free(args) => {
            flags.init()?;
            commands::free(&args)
        }
        Command::Serve(args) => commands::serve(args, flags),
    }
}
