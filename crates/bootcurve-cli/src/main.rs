//! Bootcurve CLI - bootstrap discount curves from deposit and swap quotes.
//!
//! # Usage
//!
//! ```bash
//! # Bootstrap from a CSV quote feed
//! bootcurve bootstrap --instruments quotes.csv --as-of 2026-01-08
//!
//! # Bootstrap from a TOML run file, query two dates, emit JSON
//! bootcurve -f json bootstrap --config run.toml --query 2026-07-08,2027-01-08
//!
//! # Rebuild the curve for every day of a month
//! bootcurve batch --instruments quotes.csv --from 2026-01-01 --to 2026-01-31
//! ```
//!
//! Logs go to stderr; `RUST_LOG` overrides the `-v`/`-q` flags.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;

    match cli.command {
        Commands::Bootstrap(args) => commands::bootstrap::execute(args, format)?,
        Commands::Batch(args) => commands::batch::execute(args, format)?,
    }

    Ok(())
}
