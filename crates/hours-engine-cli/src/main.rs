//! `hours` — parse opening hours and query open/closed status.

mod config;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use hours_engine::{Facility, FacilityStatus, IntervalSet, StatusQuery, StructuredHours};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[derive(Parser)]
#[command(name = "hours", version, about = "Parse opening hours and query open/closed status")]
struct Cli {
    /// TOML config file (defaults to $HOURS_CONFIG, then ./hours.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log parsing decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse free-text hours lines (one per line) into canonical intervals
    Parse {
        /// Input file (reads stdin if omitted or "-")
        input: Option<PathBuf>,

        /// Print canonical text lines instead of JSON
        #[arg(long)]
        render: bool,
    },
    /// Normalize structured hours JSON ({days, hours} list or weekday map)
    Normalize {
        /// Input file (reads stdin if omitted or "-")
        input: Option<PathBuf>,

        /// Print canonical text lines instead of JSON
        #[arg(long)]
        render: bool,
    },
    /// Compute the status of one facility or a list of facilities
    Status {
        /// Facility JSON file (a single facility or an array)
        facility: PathBuf,

        /// RFC 3339 instant to evaluate (defaults to now)
        #[arg(long)]
        at: Option<String>,

        /// Service or amenity to evaluate instead of the general hours
        #[arg(long)]
        service: Option<String>,

        /// Minutes before closing that count as "closing soon"
        #[arg(long)]
        closing_soon: Option<u32>,

        /// Minutes before opening that count as "opening soon"
        #[arg(long)]
        opening_soon: Option<u32>,

        /// Only report facilities in this state (open, closing_soon, opening_soon, closed)
        #[arg(long)]
        state: Option<String>,

        /// Print one human-readable line per facility instead of JSON
        #[arg(long)]
        summary: bool,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FacilityInput {
    One(Box<Facility>),
    Many(Vec<Facility>),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Parse { input, render } => {
            let text = read_input(input.as_deref())?;
            let set = IntervalSet::from_lines(text.lines());
            print_set(&set, render)
        }
        Command::Normalize { input, render } => {
            let text = read_input(input.as_deref())?;
            let structured: StructuredHours = serde_json::from_str(&text)
                .context("failed to parse structured hours JSON")?;
            print_set(&structured.to_interval_set(), render)
        }
        Command::Status {
            facility,
            at,
            service,
            closing_soon,
            opening_soon,
            state,
            summary,
        } => {
            let query = StatusQuery {
                at,
                service,
                closing_soon_minutes: closing_soon,
                opening_soon_minutes: opening_soon,
            };
            let (statuses, single) = facility_statuses(&facility, &query, &config)?;
            let statuses: Vec<FacilityStatus> = statuses
                .into_iter()
                .filter(|s| state.as_deref().is_none_or(|wanted| s.status.label() == wanted))
                .collect();

            if summary {
                for status in &statuses {
                    println!("{}: {}", status.name, status.summary);
                }
            } else if single && state.is_none() {
                println!("{}", serde_json::to_string_pretty(&statuses[0])?);
            } else {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            }
            Ok(())
        }
    }
}

/// Evaluate every facility in `path`. The flag is true when the file held a
/// single facility object rather than an array.
fn facility_statuses(
    path: &Path,
    query: &StatusQuery,
    config: &Config,
) -> Result<(Vec<FacilityStatus>, bool)> {
    let text = read_input(Some(path))?;
    let input: FacilityInput = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse facility JSON {}", path.display()))?;
    let (facilities, single) = match input {
        FacilityInput::One(facility) => (vec![*facility], true),
        FacilityInput::Many(facilities) => (facilities, false),
    };

    let now = Utc::now();
    let statuses = facilities
        .into_iter()
        .map(|mut facility| {
            if facility.time_zone.trim().is_empty() {
                if let Some(zone) = &config.default_time_zone {
                    facility.time_zone = zone.clone();
                }
            }
            facility.status(query, &config.thresholds, now)
        })
        .collect();
    Ok((statuses, single))
}

fn print_set(set: &IntervalSet, render: bool) -> Result<()> {
    if render {
        for line in set.sorted().render_lines() {
            println!("{line}");
        }
    } else {
        println!("{}", serde_json::to_string_pretty(set)?);
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}
