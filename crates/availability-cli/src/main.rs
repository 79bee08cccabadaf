//! `availability` CLI — list bookable slots, estimate queue start times and
//! check bookings for conflicts from JSON request files.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable slots for the day in the request (stdin → stdout)
//! cat request.json | availability slots --now 2026-03-16T10:07:00Z
//!
//! # Estimated start for someone joining the queue now
//! availability eta -i queue.json
//!
//! # Check a proposed booking against existing ones (exit code 1 on conflict)
//! availability check -i proposed.json
//!
//! # Normalize a weekly-hours document
//! availability hours -i hours.json -o normalized.json
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use availability_engine::request::{parse_instant, ConflictRequest, QueueRequest, SlotRequest};
use availability_engine::{parse_weekly_hours_str, try_estimate_queue, try_generate_slots};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "availability",
    version,
    about = "Appointment slots and walk-in queue estimates"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable slots for a company, service, provider and date
    Slots {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reference instant, RFC 3339 (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
    },
    /// Estimate when someone joining the queue now would be served
    Eta {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Reference instant, RFC 3339 (defaults to the system clock)
        #[arg(long)]
        now: Option<String>,
    },
    /// Check a proposed booking against existing bookings
    Check {
        /// Input request file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse and normalize a weekly-hours document
    Hours {
        /// Input JSON file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Slots { input, output, now } => {
            let request = SlotRequest::from_json(&read_input(input.as_deref())?)
                .context("Failed to parse slot request")?;
            let now = resolve_now(now.as_deref())?;

            let slots = match try_generate_slots(
                &request.company,
                &request.service,
                &request.provider,
                request.date,
                &request.bookings,
                now,
            ) {
                Ok(slots) => slots,
                Err(reason) => {
                    info!(%reason, date = %request.date, "no slots");
                    Vec::new()
                }
            };

            write_output(output.as_deref(), &slots)?;
        }
        Commands::Eta { input, output, now } => {
            let request = QueueRequest::from_json(&read_input(input.as_deref())?)
                .context("Failed to parse queue request")?;
            let now = resolve_now(now.as_deref())?;

            let estimate = match try_estimate_queue(
                &request.company,
                &request.service,
                &request.provider,
                &request.bookings,
                &request.queue,
                now,
            ) {
                Ok(estimate) => Some(estimate),
                Err(reason) => {
                    info!(%reason, "no queue estimate");
                    None
                }
            };

            write_output(output.as_deref(), &estimate)?;
        }
        Commands::Check { input, output } => {
            let request = ConflictRequest::from_json(&read_input(input.as_deref())?)
                .context("Failed to parse conflict request")?;

            let conflicts = request.conflicts();
            write_output(output.as_deref(), &conflicts)?;

            if !conflicts.is_empty() {
                process::exit(1);
            }
        }
        Commands::Hours { input, output } => {
            let hours = parse_weekly_hours_str(&read_input(input.as_deref())?);
            write_output(output.as_deref(), &hours)?;
        }
    }

    Ok(())
}

/// Install a stderr subscriber so stdout stays clean JSON.
///
/// `RUST_LOG` sets the level; `--verbose` forces `DEBUG`.
fn init_logging(verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Level::WARN)
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(raw) => parse_instant(raw).with_context(|| format!("Invalid --now value: {}", raw)),
        None => {
            let now = Utc::now();
            debug!(%now, "using system clock");
            Ok(now)
        }
    }
}

/// Read a request from `path`, or from stdin when no file is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    let Some(path) = path else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        return Ok(buf);
    };
    fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
}

/// Pretty-print `value` as JSON to `path`, or to stdout when no file is given.
fn write_output<T: Serialize>(path: Option<&Path>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize result")?;
    match path {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write file: {}", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
