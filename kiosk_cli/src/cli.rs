//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "kiosk", version, about = "Height/weight kiosk controller")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/kiosk_config.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Boot the kiosk and run measurement cycles until Ctrl-C
    Run {
        /// Stop after this many completed cycles
        #[arg(long, value_name = "N")]
        max_cycles: Option<u64>,
        /// Read scale advertisements from a feed file ("-" for stdin) instead
        /// of the simulated scale. Lines are `<MAC> <hex manufacturer data>`.
        #[arg(long, value_name = "FILE")]
        ble_feed: Option<PathBuf>,
    },
    /// Validate the config and probe the sensors, scanner and server
    SelfCheck,
    /// Decode scale manufacturer data (hex) to kilograms
    Decode {
        /// Manufacturer data as hex, e.g. ffff185a
        hex: String,
    },
}
