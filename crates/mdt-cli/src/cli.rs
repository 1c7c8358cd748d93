//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::{Months, TimeDelta, Utc};
use clap::{Args, Parser, Subcommand};
use mdt_core::timestamp;

/// Defender device-timeline exporter.
///
/// Pulls the full event timeline for a device through the security
/// portal's paginated API and writes one JSON event per line.
#[derive(Debug, Parser)]
#[command(name = "mdt", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Browser cookie header for the API proxy.
    #[arg(long, global = true)]
    pub cookie: Option<String>,

    /// Anti-forgery token matching the cookie session.
    #[arg(long, global = true)]
    pub xsrf: Option<String>,

    /// Append output to this file instead of stdout.
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Export a device's event timeline.
    Timeline(TimelineArgs),
}

/// Arguments for the `timeline` subcommand.
#[derive(Debug, Args)]
pub struct TimelineArgs {
    /// Start of the export window (e.g. 2024-01-01T00:00:00Z).
    #[arg(long, default_value_t = default_from())]
    pub from: String,

    /// End of the export window.
    #[arg(long, default_value_t = default_to())]
    pub to: String,

    /// Identifier of the device to export.
    #[arg(short, long)]
    pub machine: String,
}

/// Default window start: six months back, nudged one minute forward so
/// the window stays inside the service's retention period.
fn default_from() -> String {
    let now = Utc::now();
    let from = now
        .checked_sub_months(Months::new(6))
        .and_then(|start| start.checked_add_signed(TimeDelta::minutes(1)))
        .unwrap_or(now);
    timestamp::format(from)
}

/// Default window end: the current time.
fn default_to() -> String {
    timestamp::format(Utc::now())
}
