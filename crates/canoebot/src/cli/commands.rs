//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Canoebot - SRC facility availability with a cached booking table
#[derive(Parser, Debug)]
#[command(name = "canoebot")]
#[command(about = "SRC facility availability with a cached booking table", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Read configuration from this TOML file instead of the layered defaults
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List configured facilities
    Facilities,

    /// Show availability of a facility on a date
    Query {
        /// Facility number, code or name
        facility: String,

        /// Date (YYYY-MM-DD, DD/MM/YYYY, "tomorrow", ...); defaults to today
        #[arg(long)]
        date: Option<String>,

        /// Re-fetch the covering table first
        #[arg(long)]
        refresh: bool,
    },

    /// List the hourly time slots of a facility
    Slots {
        /// Facility number, code or name
        facility: String,
    },

    /// Prefill the cache, refresh it on a schedule and answer commands from stdin
    Serve,
}
