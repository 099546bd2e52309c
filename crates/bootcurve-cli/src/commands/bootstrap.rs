//! Bootstrap command implementation.
//!
//! Solves one curve for one valuation date, then reports the solved
//! segments, queried discount factors and the repricing check.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::{info, warn};

use bootcurve_curves::bootstrap::{
    BootstrapEngine, BootstrapFailure, BootstrapOutcome, SolvedStep, TracePoint,
};
use bootcurve_curves::instruments::{Instrument, ValuationContext};
use bootcurve_curves::nodes::CurveNodeIndex;
use bootcurve_curves::pricing::{CashflowKind, InstrumentPricer};
use bootcurve_curves::repricing::{reprice, RepricingReport, DEFAULT_TOLERANCE};
use bootcurve_curves::{CurveError, CurveQuery, DiscountCurve};

use crate::cli::OutputFormat;
use crate::commands::{parse_date, today, InputArgs};
use crate::error::{CliError, CliResult};
use crate::output::{
    format_percent, print_csv, print_error, print_header, print_json, print_output, print_success,
    print_table, print_warning, KeyValue,
};

/// Arguments for the bootstrap command.
#[derive(Args, Debug)]
pub struct BootstrapArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Valuation date (YYYY-MM-DD). Defaults to the run file, then today.
    #[arg(short = 'd', long)]
    pub as_of: Option<String>,

    /// Dates to query on the solved curve (comma-separated YYYY-MM-DD)
    #[arg(long, value_delimiter = ',')]
    pub query: Vec<String>,

    /// Show the discounted cash flows of every instrument
    #[arg(long)]
    pub cashflows: bool,

    /// Record and show every pricing-error evaluation
    #[arg(long)]
    pub trace: bool,

    /// Tolerance for the repricing check
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    pub reprice_tolerance: f64,
}

#[derive(Debug, Serialize, Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Instrument")]
    instrument: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Maturity")]
    maturity: String,
    #[tabled(rename = "Knot")]
    knot: String,
    #[tabled(rename = "Forward")]
    forward: String,
    #[tabled(rename = "DF(knot)")]
    discount_factor: String,
    #[tabled(rename = "Iter")]
    iterations: u32,
    #[tabled(rename = "Residual")]
    residual: String,
}

impl StepRow {
    fn new(step: &SolvedStep, curve: &DiscountCurve) -> Self {
        Self {
            index: step.index,
            instrument: format!("{} {}", step.kind, step.tenor),
            rate: format_percent(step.rate),
            maturity: step.maturity.to_string(),
            knot: step.knot.to_string(),
            forward: format_percent(step.forward),
            discount_factor: format!("{:.10}", curve.discount_factor(step.knot)),
            iterations: step.iterations,
            residual: format!("{:.2e}", step.residual),
        }
    }
}

#[derive(Debug, Serialize, Tabled)]
struct QueryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Discount Factor")]
    discount_factor: f64,
    #[tabled(rename = "Zero Rate")]
    zero_rate: String,
}

#[derive(Debug, Serialize, Tabled)]
struct CashflowDisplay {
    #[tabled(rename = "Instrument")]
    instrument: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Flow")]
    kind: &'static str,
    #[tabled(rename = "Accrual")]
    accrual: String,
    #[tabled(rename = "DF")]
    discount_factor: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "PV")]
    present_value: String,
}

#[derive(Debug, Serialize, Tabled)]
struct TraceRow {
    #[tabled(rename = "Step")]
    step: usize,
    #[tabled(rename = "Eval")]
    evaluation: usize,
    #[tabled(rename = "Trial")]
    trial: String,
    #[tabled(rename = "Error")]
    error: String,
}

impl From<&TracePoint> for TraceRow {
    fn from(point: &TracePoint) -> Self {
        Self {
            step: point.step,
            evaluation: point.evaluation,
            trial: format!("{:.12}", point.trial),
            error: format!("{:.3e}", point.error),
        }
    }
}

/// Everything a solved run reports, for JSON output.
#[derive(Debug, Serialize)]
struct BootstrapReport<'a> {
    #[serde(flatten)]
    outcome: &'a BootstrapOutcome,
    queries: Vec<QueryRow>,
    repricing: RepricingReport,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cashflows: Vec<CashflowDisplay>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    trace: &'a [TracePoint],
}

/// Execute the bootstrap command.
pub fn execute(args: BootstrapArgs, format: OutputFormat) -> Result<()> {
    let inputs = args.input.resolve()?;
    let as_of = match &args.as_of {
        Some(s) => parse_date(s)?,
        None => inputs.as_of.unwrap_or_else(today),
    };
    let queries = args
        .query
        .iter()
        .map(|s| parse_date(s))
        .collect::<CliResult<Vec<_>>>()?;

    let context = ValuationContext::new(as_of, inputs.day_count, inputs.coupon_frequency);
    let instruments = Instrument::resolve_all(&inputs.quotes, &context).map_err(CliError::from)?;
    let nodes = match inputs.knots {
        Some(knots) => CurveNodeIndex::new(knots).map_err(CliError::from)?,
        None => CurveNodeIndex::from_maturities(&instruments).map_err(CliError::from)?,
    };
    let config = inputs.config.with_trace(args.trace || inputs.config.record_trace);

    info!(
        as_of = %as_of,
        instruments = instruments.len(),
        knots = nodes.len(),
        solver = %config.solver,
        "Bootstrapping curve"
    );

    let mut engine = BootstrapEngine::new(context, instruments, &nodes, config)
        .map_err(CliError::from)?;
    let outcome = engine.run();

    let (curve, steps) = match &outcome {
        BootstrapOutcome::Solved { curve, steps } => (curve, steps),
        BootstrapOutcome::Failed(failure) => {
            report_failure(&outcome, failure, format)?;
            return Err(CliError::BootstrapFailed {
                index: failure.at_instrument_index,
                tenor: failure.tenor.clone(),
                reason: failure.reason.clone(),
            }
            .into());
        }
        BootstrapOutcome::Cancelled { completed, .. } => {
            return Err(CliError::from(CurveError::Cancelled {
                completed: *completed,
            })
            .into());
        }
    };

    let repricing = reprice(curve, engine.instruments(), &context, args.reprice_tolerance)
        .map_err(CliError::from)?;
    if !repricing.is_valid() {
        warn!(
            failed = repricing.failed_count(),
            max_error = repricing.max_error(),
            "Solved curve does not reprice every instrument"
        );
    }

    let step_rows: Vec<StepRow> = steps.iter().map(|s| StepRow::new(s, curve)).collect();
    let query_rows: Vec<QueryRow> = queries
        .iter()
        .map(|&date| QueryRow {
            date: date.to_string(),
            time: format!("{:.6}", curve.time(date)),
            discount_factor: curve.discount_factor(date),
            zero_rate: format_percent(curve.zero_rate(date)),
        })
        .collect();
    let cashflows = if args.cashflows {
        cashflow_rows(curve, engine.instruments(), &context)?
    } else {
        Vec::new()
    };
    let trace: Vec<TraceRow> = engine.trace().iter().map(TraceRow::from).collect();

    match format {
        OutputFormat::Table => {
            print_header("Bootstrapped Curve");
            print_table(&[
                KeyValue::new("Valuation Date", as_of.to_string()),
                KeyValue::new("Day Count", context.day_count.to_string()),
                KeyValue::new("Coupon Frequency", context.coupon_frequency.to_string()),
                KeyValue::new("Solver", config.solver.to_string()),
                KeyValue::new("Horizon", curve.horizon().to_string()),
            ])?;
            println!();
            print_table(&step_rows)?;

            if !query_rows.is_empty() {
                print_header("Curve Queries");
                print_table(&query_rows)?;
            }

            print_header("Repricing");
            println!("{}", repricing);

            if !cashflows.is_empty() {
                print_header("Cash Flows");
                print_table(&cashflows)?;
            }
            if !trace.is_empty() {
                print_header("Solver Trace");
                print_table(&trace)?;
            }

            if repricing.is_valid() {
                print_success(&format!("Solved {} segments", curve.len()));
            } else {
                print_warning(&format!(
                    "{} of {} instruments outside tolerance",
                    repricing.failed_count(),
                    repricing.total_count()
                ));
            }
        }
        OutputFormat::Json => {
            print_json(&BootstrapReport {
                outcome: &outcome,
                queries: query_rows,
                repricing,
                cashflows,
                trace: engine.trace(),
            })?;
        }
        OutputFormat::Csv => {
            if query_rows.is_empty() {
                print_csv(&step_rows)?;
            } else {
                print_csv(&query_rows)?;
            }
        }
        OutputFormat::Minimal => {
            if query_rows.is_empty() {
                for forward in curve.forwards() {
                    println!("{forward}");
                }
            } else {
                for row in &query_rows {
                    println!("{}", row.discount_factor);
                }
            }
        }
    }

    Ok(())
}

fn cashflow_rows(
    curve: &DiscountCurve,
    instruments: &[Instrument],
    context: &ValuationContext,
) -> CliResult<Vec<CashflowDisplay>> {
    let mut rows = Vec::new();
    for instrument in instruments {
        let pricer = InstrumentPricer::new(instrument, curve.knots(), context)?;
        let label = instrument.label();
        rows.extend(pricer.cashflows(curve).into_iter().map(|flow| CashflowDisplay {
            instrument: label.clone(),
            date: flow.date.to_string(),
            kind: match flow.kind {
                CashflowKind::Initial => "initial",
                CashflowKind::Coupon => "coupon",
                CashflowKind::Redemption => "redemption",
            },
            accrual: format!("{:.6}", flow.accrual),
            discount_factor: format!("{:.10}", flow.discount_factor),
            amount: format!("{:.8}", flow.amount),
            present_value: format!("{:.10}", flow.present_value),
        }));
    }
    Ok(rows)
}

fn report_failure(
    outcome: &BootstrapOutcome,
    failure: &BootstrapFailure,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(outcome)?,
        OutputFormat::Table => {
            print_header("Bootstrap Failed");
            print_output(
                &[
                    KeyValue::new("Instrument", format!("#{} ({})", failure.at_instrument_index, failure.tenor)),
                    KeyValue::new("Reason", failure.reason.clone()),
                    KeyValue::new("Last Trial", format!("{:.12}", failure.last_trial)),
                    KeyValue::new("Last Error", format!("{:.3e}", failure.last_error)),
                    KeyValue::new("Iterations", failure.iterations.to_string()),
                    KeyValue::new("Segments Solved", failure.solved.len().to_string()),
                ],
                format,
            )?;
        }
        OutputFormat::Csv | OutputFormat::Minimal => {}
    }
    print_error(&format!(
        "Bootstrap failed at instrument #{} ({})",
        failure.at_instrument_index, failure.tenor
    ));
    Ok(())
}
