//! CLI command implementations.

pub mod batch;
pub mod bootstrap;

pub use batch::BatchArgs;
pub use bootstrap::BootstrapArgs;

use std::path::PathBuf;

use bootcurve_core::{Date, DayCountConvention, Frequency};
use bootcurve_curves::bootstrap::{BootstrapConfig, RateBounds};
use bootcurve_curves::instruments::MarketQuote;
use bootcurve_math::solvers::SolverMethod;
use clap::Args;
use tracing::debug;

use crate::config::{load_knots_csv, load_quotes_csv, RunConfig};
use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<Date> {
    Date::parse(s.trim()).map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Today's date in UTC.
pub fn today() -> Date {
    Date::from(chrono::Utc::now().date_naive())
}

/// Input and solver options shared by every command.
///
/// Flags override values from the run file.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// TOML run file (valuation, bootstrap, knots, instruments)
    #[arg(short, long, env = "BOOTCURVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Instrument CSV with columns tenor,kind,rate
    #[arg(short, long)]
    pub instruments: Option<PathBuf>,

    /// Knot CSV with a date column; defaults to instrument maturities
    #[arg(short, long)]
    pub knots: Option<PathBuf>,

    /// Day count convention (ACT/365, ACT/360, 30/360, ACT/ACT)
    #[arg(long)]
    pub day_count: Option<DayCountConvention>,

    /// Swap coupons per year (1, 2, 4 or 12)
    #[arg(long)]
    pub frequency: Option<u32>,

    /// Root finder (newton, secant, brent, bisection)
    #[arg(long)]
    pub solver: Option<SolverMethod>,

    /// Convergence tolerance on the pricing error
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Iteration limit per instrument
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Lower bound on solved forwards (requires --max-rate)
    #[arg(long, requires = "max_rate", allow_hyphen_values = true)]
    pub min_rate: Option<f64>,

    /// Upper bound on solved forwards (requires --min-rate)
    #[arg(long, requires = "min_rate", allow_hyphen_values = true)]
    pub max_rate: Option<f64>,
}

/// Inputs after merging the run file with command-line flags.
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    /// Valuation date from the run file, if any.
    pub as_of: Option<Date>,
    /// Instrument quotes, in input order.
    pub quotes: Vec<MarketQuote>,
    /// Explicit knots, or `None` to use instrument maturities.
    pub knots: Option<Vec<Date>>,
    /// Day count convention.
    pub day_count: DayCountConvention,
    /// Swap coupon frequency.
    pub coupon_frequency: Frequency,
    /// Solver settings.
    pub config: BootstrapConfig,
}

impl InputArgs {
    /// Loads the run file and feeds, then applies flag overrides.
    pub fn resolve(&self) -> CliResult<ResolvedInputs> {
        let run = match &self.config {
            Some(path) => {
                debug!(path = %path.display(), "Loading run file");
                RunConfig::from_file(path)?
            }
            None => RunConfig::default(),
        };

        let quotes = match &self.instruments {
            Some(path) => load_quotes_csv(path)?,
            None => run.instruments,
        };
        if quotes.is_empty() {
            return Err(CliError::MissingArgument(
                "--instruments (or [[instruments]] in --config)".to_string(),
            ));
        }

        let knots = match &self.knots {
            Some(path) => Some(load_knots_csv(path)?),
            None if run.knots.is_empty() => None,
            None => Some(run.knots),
        };

        let coupon_frequency = match self.frequency {
            Some(value) => Frequency::try_from(value)
                .map_err(|e| CliError::Config(e.to_string()))?,
            None => run.valuation.coupon_frequency,
        };

        let mut config = run.bootstrap;
        if let Some(solver) = self.solver {
            config = config.with_solver(solver);
        }
        if let Some(tolerance) = self.tolerance {
            config = config.with_tolerance(tolerance);
        }
        if let Some(max_iterations) = self.max_iterations {
            config = config.with_max_iterations(max_iterations);
        }
        if let (Some(min), Some(max)) = (self.min_rate, self.max_rate) {
            config = config.with_rate_bounds(RateBounds::new(min, max));
        }
        config.validate()?;

        Ok(ResolvedInputs {
            as_of: run.valuation.as_of,
            quotes,
            knots,
            day_count: self.day_count.unwrap_or(run.valuation.day_count),
            coupon_frequency,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-01-08").unwrap(), Date::from_ymd(2026, 1, 8).unwrap());
        assert!(matches!(parse_date("08/01/2026"), Err(CliError::InvalidDate(_))));
    }

    #[test]
    fn test_resolve_requires_instruments() {
        let err = InputArgs::default().resolve().unwrap_err();
        assert!(matches!(err, CliError::MissingArgument(_)));
    }

    #[test]
    fn test_flags_override_run_file() {
        let mut run = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            run,
            r#"
[valuation]
as_of = "2026-01-08"
day_count = "ACT/360"
coupon_frequency = 2

[bootstrap]
solver = "secant"

[[instruments]]
tenor = "1D"
kind = "Deposit"
rate = 0.025
"#
        )
        .unwrap();

        let args = InputArgs {
            config: Some(run.path().to_path_buf()),
            day_count: Some(DayCountConvention::Act365),
            frequency: Some(4),
            solver: Some(SolverMethod::Brent),
            min_rate: Some(-0.01),
            max_rate: Some(0.2),
            ..InputArgs::default()
        };
        let resolved = args.resolve().unwrap();

        assert_eq!(resolved.as_of, Some(Date::from_ymd(2026, 1, 8).unwrap()));
        assert_eq!(resolved.quotes.len(), 1);
        assert_eq!(resolved.knots, None);
        assert_eq!(resolved.day_count, DayCountConvention::Act365);
        assert_eq!(resolved.coupon_frequency, Frequency::Quarterly);
        assert_eq!(resolved.config.solver, SolverMethod::Brent);
        assert_eq!(resolved.config.rate_bounds, Some(RateBounds::new(-0.01, 0.2)));
    }

    #[test]
    fn test_bad_frequency() {
        let mut quotes = tempfile::NamedTempFile::new().unwrap();
        writeln!(quotes, "tenor,kind,rate\n1D,Deposit,0.025").unwrap();

        let args = InputArgs {
            instruments: Some(quotes.path().to_path_buf()),
            frequency: Some(3),
            ..InputArgs::default()
        };
        assert!(matches!(args.resolve(), Err(CliError::Config(_))));
    }
}
