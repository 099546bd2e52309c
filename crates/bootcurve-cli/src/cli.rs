//! CLI argument definitions.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{BatchArgs, BootstrapArgs};

/// Bootcurve - sequential bootstrap of discount curves from deposits and swaps
#[derive(Parser)]
#[command(name = "bootcurve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (report output is unchanged)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter implied by the verbosity flags, used when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "warn,bootcurve=info",
            2 => "info,bootcurve=debug",
            _ => "debug,bootcurve=trace",
        }
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Bootstrap a curve for one valuation date
    Bootstrap(BootstrapArgs),

    /// Bootstrap the same quotes for every day in a date range
    Batch(BatchArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the values)
    Minimal,
}
