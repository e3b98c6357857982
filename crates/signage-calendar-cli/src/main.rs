//! `signcal` CLI: expand signage schedules into calendar events from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Expand a schedules payload (stdin → stdout) over one week
//! cat schedules.json | signcal expand --from 2025-01-01 --to 2025-01-07
//!
//! # One player, colors recomputed from local overlaps
//! signcal expand -i schedules.json --from 2025-01-01 --to 2025-01-31 \
//!     --player 12 --conflicts client --pretty
//!
//! # View options from a JSON file; flags override it
//! signcal expand -i schedules.json --from 2025-01-01 --to 2025-01-07 --config view.json
//!
//! # Which color rule each schedule hits
//! signcal classify -i schedules.json
//!
//! # Overlapping pairs per player
//! signcal overlaps -i schedules.json --from 2025-01-01 --to 2025-01-07
//! ```
//!
//! Malformed schedules and records are skipped and reported on stderr at `warn`; set
//! `RUST_LOG` or pass `-v` for more.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use signage_calendar::diagnostics::TracingSink;
use signage_calendar::palette::Colors;
use signage_calendar::schedule::{parse_schedules_json_with_sink, Schedule};
use signage_calendar::{ColorRule, ConflictSource, DateRange, ViewOptions};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "signcal",
    version,
    about = "Expand digital-signage schedules into calendar events"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log expansion details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand schedules into calendar events
    Expand {
        #[command(flatten)]
        files: IoArgs,
        #[command(flatten)]
        window: WindowArgs,
        /// Where conflict colors come from
        #[arg(long, value_enum)]
        conflicts: Option<ConflictArg>,
        /// Leave overlay content off the calendar
        #[arg(long)]
        hide_overlay: bool,
        /// JSON file with view options
        #[arg(long)]
        config: Option<String>,
    },
    /// Show the color rule and colors each schedule resolves to
    Classify {
        #[command(flatten)]
        files: IoArgs,
    },
    /// List overlapping event pairs per player
    Overlaps {
        #[command(flatten)]
        files: IoArgs,
        #[command(flatten)]
        window: WindowArgs,
    },
}

#[derive(Args)]
struct IoArgs {
    /// Input schedules JSON file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Args)]
struct WindowArgs {
    /// First visible day (YYYY-MM-DD or DD/MM/YYYY)
    #[arg(long)]
    from: String,
    /// Last visible day, inclusive
    #[arg(long)]
    to: String,
    /// Only this player's schedules
    #[arg(long)]
    player: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum ConflictArg {
    /// Colors from server conflict metadata
    Server,
    /// Recompute overlaps per player
    Client,
}

impl From<ConflictArg> for ConflictSource {
    fn from(arg: ConflictArg) -> Self {
        match arg {
            ConflictArg::Server => ConflictSource::Server,
            ConflictArg::Client => ConflictSource::Client,
        }
    }
}

#[derive(Serialize)]
struct Classification<'a> {
    id: u64,
    name: &'a str,
    rule: ColorRule,
    colors: Colors,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Expand {
            files,
            window,
            conflicts,
            hide_overlay,
            config,
        } => {
            let schedules = read_schedules(files.input.as_deref())?;
            let range = parse_range(&window)?;

            let mut options = match config.as_deref() {
                Some(path) => load_options(path)?,
                None => ViewOptions::default(),
            };
            if window.player.is_some() {
                options.player_id = window.player;
            }
            if let Some(source) = conflicts {
                options.conflict_source = source.into();
            }
            if hide_overlay {
                options.include_overlay = false;
            }

            let events = signage_calendar::build_calendar(&schedules, &range, &options, &TracingSink);
            tracing::info!(
                schedules = schedules.len(),
                events = events.len(),
                from = %range.start,
                to = %range.end,
                "expanded schedules"
            );
            write_json(files.output.as_deref(), &events, files.pretty)?;
        }
        Commands::Classify { files } => {
            let schedules = read_schedules(files.input.as_deref())?;
            let rows: Vec<Classification> = schedules
                .iter()
                .map(|s| Classification {
                    id: s.id,
                    name: &s.name,
                    rule: signage_calendar::classify_rule(s),
                    colors: signage_calendar::classify(s),
                })
                .collect();
            write_json(files.output.as_deref(), &rows, files.pretty)?;
        }
        Commands::Overlaps { files, window } => {
            let schedules = read_schedules(files.input.as_deref())?;
            let range = parse_range(&window)?;
            let options = ViewOptions {
                player_id: window.player,
                ..ViewOptions::default()
            };

            let events = signage_calendar::build_calendar(&schedules, &range, &options, &TracingSink);
            let report = signage_calendar::conflict_report(&events);
            tracing::info!(
                events = events.len(),
                conflicts = report.len(),
                "checked overlaps"
            );
            write_json(files.output.as_deref(), &report, files.pretty)?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_range(window: &WindowArgs) -> Result<DateRange> {
    DateRange::parse(&window.from, &window.to)
        .with_context(|| format!("Invalid range: --from {} --to {}", window.from, window.to))
}

fn read_schedules(path: Option<&str>) -> Result<Vec<Schedule>> {
    let json = read_input(path)?;
    parse_schedules_json_with_sink(&json, &TracingSink).context("Failed to parse schedules JSON")
}

fn load_options(path: &str) -> Result<ViewOptions> {
    let json =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;
    ViewOptions::from_json(&json).with_context(|| format!("Invalid view options in {}", path))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize + ?Sized>(path: Option<&str>, value: &T, pretty: bool) -> Result<()> {
    let content = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
