//! Batch command implementation.
//!
//! Rebuilds the curve from the same quotes for every calendar day in a
//! range. Dates that fail are reported alongside the ones that solve.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

use bootcurve_curves::batch::{BatchEntry, BatchRunner};
use bootcurve_curves::bootstrap::BootstrapOutcome;

use crate::cli::OutputFormat;
use crate::commands::{parse_date, InputArgs};
use crate::error::CliError;
use crate::output::{print_json, print_output, print_success, print_warning};

/// Arguments for the batch command.
#[derive(Args, Debug)]
pub struct BatchArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// First valuation date (YYYY-MM-DD)
    #[arg(long)]
    pub from: String,

    /// Last valuation date, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub to: String,
}

#[derive(Debug, Serialize, Tabled)]
struct BatchRow {
    #[tabled(rename = "As Of")]
    as_of: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Segments")]
    segments: usize,
    #[tabled(rename = "First Fwd")]
    first_forward: String,
    #[tabled(rename = "Last Fwd")]
    last_forward: String,
    #[tabled(rename = "Detail")]
    detail: String,
}

impl From<&BatchEntry> for BatchRow {
    fn from(entry: &BatchEntry) -> Self {
        let forwards = entry
            .outcome
            .as_ref()
            .map(BootstrapOutcome::solved_forwards)
            .unwrap_or_default();
        let (status, detail) = match (&entry.outcome, &entry.error) {
            (Some(BootstrapOutcome::Solved { curve, .. }), _) => {
                ("solved", format!("horizon {}", curve.horizon()))
            }
            (Some(BootstrapOutcome::Failed(failure)), _) => (
                "failed",
                format!(
                    "#{} ({}): {}",
                    failure.at_instrument_index, failure.tenor, failure.reason
                ),
            ),
            (Some(BootstrapOutcome::Cancelled { completed, .. }), _) => {
                ("cancelled", format!("{completed} segments before cancel"))
            }
            (None, error) => ("error", error.clone().unwrap_or_default()),
        };

        Self {
            as_of: entry.as_of.to_string(),
            status,
            segments: forwards.len(),
            first_forward: forwards.first().map(|f| format!("{f:.8}")).unwrap_or_default(),
            last_forward: forwards.last().map(|f| format!("{f:.8}")).unwrap_or_default(),
            detail,
        }
    }
}

/// Execute the batch command.
pub fn execute(args: BatchArgs, format: OutputFormat) -> Result<()> {
    let from = parse_date(&args.from)?;
    let to = parse_date(&args.to)?;
    let inputs = args.input.resolve()?;

    let mut runner = BatchRunner::new(inputs.quotes)
        .with_day_count(inputs.day_count)
        .with_coupon_frequency(inputs.coupon_frequency)
        .with_config(inputs.config);
    if let Some(knots) = inputs.knots {
        runner = runner.with_knots(knots);
    }

    let entries = runner.run(from, to).map_err(CliError::from)?;
    let solved = entries.iter().filter(|e| e.is_solved()).count();
    info!(solved, total = entries.len(), "Batch finished");

    match format {
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Minimal => {
            for entry in &entries {
                let status = if entry.is_solved() { "solved" } else { "failed" };
                println!("{} {}", entry.as_of, status);
            }
        }
        OutputFormat::Table | OutputFormat::Csv => {
            let rows: Vec<BatchRow> = entries.iter().map(BatchRow::from).collect();
            print_output(&rows, format)?;
        }
    }

    if solved == entries.len() {
        if format == OutputFormat::Table {
            print_success(&format!("Solved {solved} of {} dates", entries.len()));
        }
    } else {
        warn!(failed = entries.len() - solved, "Some valuation dates did not solve");
        print_warning(&format!(
            "{} of {} dates did not solve",
            entries.len() - solved,
            entries.len()
        ));
    }

    Ok(())
}
