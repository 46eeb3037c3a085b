use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use ourjourney_core::{
    assignment_for_date, assignments_for_month, assignments_for_range, next_free_evenings_for,
    parse_civil_date,
};
use ourjourney_server::ServerConfig;
use serde::Serialize;

use crate::cli::{FreeArgs, ServeArgs};

/// Global logging flags.
///
/// A directory selects rolling file logs, a level alone selects stderr, and
/// neither leaves query commands silent.
#[derive(Debug, Default)]
pub struct LogFlags {
    pub level: Option<String>,
    pub dir: Option<PathBuf>,
}

impl LogFlags {
    pub fn init(&self) -> Result<()> {
        match (self.dir.as_deref(), self.level.as_deref()) {
            (Some(dir), level) => {
                let dir = dir.to_str().context("log dir must be valid UTF-8")?;
                let level = level.map_or_else(
                    || ourjourney_core::default_log_level().to_string(),
                    str::to_string,
                );
                ourjourney_core::init_logging(&level, dir).context("failed to initialize logging")
            }
            (None, Some(level)) => ourjourney_core::init_stderr_logging(level)
                .context("failed to initialize stderr logging"),
            (None, None) => Ok(()),
        }
    }

    /// Applies flag values over the `[log]` section of a server config.
    fn apply_to(self, config: &mut ServerConfig) {
        if let Some(level) = self.level {
            config.log.level = level;
        }
        if let Some(dir) = self.dir {
            config.log.dir = Some(dir);
        }
    }
}

pub fn status(date: &str) -> Result<()> {
    let date = parse_civil_date(date)?;
    print_json(&assignment_for_date(date))
}

pub fn range(start: &str, end: &str) -> Result<()> {
    let start = parse_civil_date(start)?;
    let end = parse_civil_date(end)?;
    print_json(&assignments_for_range(start, end)?)
}

pub fn month(year: i32, month: u32) -> Result<()> {
    print_json(&assignments_for_month(year, month)?)
}

pub fn free(args: &FreeArgs) -> Result<()> {
    let from = match args.from.as_deref() {
        Some(raw) => parse_civil_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    let evenings = next_free_evenings_for(args.side, from, args.count, args.horizon);
    print_json(&evenings)
}

pub fn serve(args: ServeArgs, flags: LogFlags) -> Result<()> {
    let mut config = ServerConfig::load_or_default(&args.config)?;
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(db) = args.db {
        config.db_path = db;
    }
    flags.apply_to(&mut config);

    let log_flags = LogFlags {
        level: Some(config.log.level.clone()),
        dir: config.log.dir.clone(),
    };
    // The level is always set, so `serve` falls back to stderr without a dir.
    log_flags.init()?;
    info!(
        "event=cli_serve module=cli status=start config={}",
        args.config.display()
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime
        .block_on(ourjourney_server::serve(config))
        .context("server stopped with an error")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
