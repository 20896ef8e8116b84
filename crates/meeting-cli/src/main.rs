//! `meetcal` CLI — check recurring meeting definitions for channel conflicts and
//! publish them as iCalendar.
//!
//! ## Usage
//!
//! ```sh
//! # Check a directory of YAML meeting definitions for conflicts
//! meetcal check meetings/
//!
//! # Pin the reference time so the result is reproducible
//! meetcal check meetings/ --now 2026-01-01T00:00:00Z
//!
//! # Write one combined calendar (refuses to write when meetings conflict)
//! meetcal convert meetings/ -o all.ics --calname "Team meetings"
//!
//! # Write one calendar per meeting
//! meetcal convert meetings/ --output-dir ics/
//!
//! # List the expanded occurrences as JSON
//! meetcal occurrences meetings/ --window-days 28 --json
//! ```
//!
//! Logs go to stderr. `RUST_LOG` sets the filter (default `warn`); `-v` / `-vv`
//! override it with `info` / `debug`.

mod ical;
mod loader;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand};
use meeting_engine::{
    check_for_conflicts, expand, Meeting, MeetingInstance, ProjectionWindow, DEFAULT_WINDOW_DAYS,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::ical::CalendarInfo;

#[derive(Parser)]
#[command(
    name = "meetcal",
    version,
    about = "Recurring meeting definitions to iCalendar, with channel conflict checks"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check meeting definitions for overlapping meetings on the same channel
    Check {
        /// YAML file, directory of YAML files, or "-" for stdin
        path: PathBuf,
        #[command(flatten)]
        clock: ClockArgs,
    },
    /// Convert meeting definitions to iCalendar
    Convert {
        /// YAML file, directory of YAML files, or "-" for stdin
        path: PathBuf,
        /// Write all meetings into this single .ics file
        #[arg(
            short,
            long,
            conflicts_with = "output_dir",
            required_unless_present = "output_dir"
        )]
        output: Option<PathBuf>,
        /// Write one .ics file per meeting into this directory
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Calendar name (combined output only)
        #[arg(long)]
        calname: Option<String>,
        /// Calendar description (combined output only)
        #[arg(long)]
        caldescription: Option<String>,
        /// Write output even if meetings conflict
        #[arg(long)]
        skip_check: bool,
        #[command(flatten)]
        clock: ClockArgs,
    },
    /// List every occurrence within the projection window
    Occurrences {
        /// YAML file, directory of YAML files, or "-" for stdin
        path: PathBuf,
        /// Emit a JSON array instead of one line per occurrence
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        clock: ClockArgs,
    },
}

/// Reference time and projection window shared by all subcommands.
#[derive(Args)]
struct ClockArgs {
    /// Reference time (RFC 3339); defaults to the current time
    #[arg(long)]
    now: Option<DateTime<Utc>>,
    /// Length of the projection window in days
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    window_days: u32,
}

impl ClockArgs {
    fn window(&self) -> Result<ProjectionWindow> {
        ProjectionWindow::from_now(self.now.unwrap_or_else(Utc::now), self.window_days)
            .context("Invalid --window-days")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Check { path, clock } => {
            let window = clock.window()?;
            let meetings = loader::load_meetings(&path, window.start.date_naive())?;
            check_for_conflicts(&meetings, window.start, window.end)?;
            println!(
                "No conflicts found in {} meetings ({} schedules)",
                meetings.len(),
                schedule_count(&meetings)
            );
        }
        Commands::Convert {
            path,
            output,
            output_dir,
            calname,
            caldescription,
            skip_check,
            clock,
        } => {
            let window = clock.window()?;
            let meetings = loader::load_meetings(&path, window.start.date_naive())?;

            if skip_check {
                info!("conflict check skipped");
            } else {
                check_for_conflicts(&meetings, window.start, window.end)
                    .context("Refusing to write calendar output")?;
            }

            if let Some(dir) = output_dir {
                ical::write_per_meeting(&meetings, &dir)?;
            }
            if let Some(file) = output {
                let meta = CalendarInfo {
                    name: calname,
                    description: caldescription,
                };
                ical::write_combined(&meetings, &meta, &file)?;
            }
            println!("Wrote {} meetings to iCal", meetings.len());
        }
        Commands::Occurrences { path, json, clock } => {
            let window = clock.window()?;
            let meetings = loader::load_meetings(&path, window.start.date_naive())?;
            let instances = occurrences(&meetings, &window);

            if json {
                println!("{}", serde_json::to_string_pretty(&instances)?);
            } else {
                for instance in &instances {
                    println!(
                        "{}  {}  #{}  {}",
                        instance.start.format("%Y-%m-%d %H:%M"),
                        instance.end.format("%H:%M"),
                        instance.channel,
                        instance.owner_name
                    );
                }
            }
        }
    }

    Ok(())
}

/// Every occurrence of every schedule, sorted by start time (stable across meetings).
fn occurrences(meetings: &[Meeting], window: &ProjectionWindow) -> Vec<MeetingInstance> {
    let mut instances: Vec<MeetingInstance> = meetings
        .iter()
        .flat_map(|m| m.schedules())
        .flat_map(|s| expand(s, window.start, window.end))
        .collect();
    instances.sort_by_key(|i| i.start);
    instances
}

fn schedule_count(meetings: &[Meeting]) -> usize {
    meetings.iter().map(|m| m.schedules().len()).sum()
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
