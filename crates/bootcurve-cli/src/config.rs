//! Run files and input feeds.
//!
//! A run file is TOML:
//!
//! ```toml
//! knots = ["2026-01-09", "2026-04-08", "2027-01-08"]
//!
//! [valuation]
//! as_of = "2026-01-08"
//! day_count = "ACT/365"
//! coupon_frequency = 4
//!
//! [bootstrap]
//! tolerance = 1e-10
//! max_iterations = 100
//! solver = "newton"
//!
//! [[instruments]]
//! tenor = "1D"
//! kind = "Deposit"
//! rate = 0.025
//! ```
//!
//! Instrument CSV feeds carry `tenor,kind,rate` columns (`type` and
//! `market_rate` are accepted too); knot CSV feeds carry a `date` column.

use std::path::Path;

use bootcurve_core::{Date, DayCountConvention, Frequency};
use bootcurve_curves::bootstrap::BootstrapConfig;
use bootcurve_curves::instruments::MarketQuote;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// `[valuation]` section of a run file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationSection {
    /// Valuation date.
    pub as_of: Option<Date>,
    /// Day count convention.
    pub day_count: DayCountConvention,
    /// Swap coupon frequency.
    pub coupon_frequency: Frequency,
}

/// A complete run description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Knot dates; empty means "use instrument maturities".
    pub knots: Vec<Date>,
    /// Valuation conventions.
    pub valuation: ValuationSection,
    /// Solver settings.
    pub bootstrap: BootstrapConfig,
    /// Instrument quotes.
    pub instruments: Vec<MarketQuote>,
}

impl RunConfig {
    /// Loads a run file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| CliError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Deserialize)]
struct KnotRecord {
    #[serde(alias = "jump_date", alias = "knot")]
    date: Date,
}

/// Reads an instrument feed.
pub fn load_quotes_csv(path: &Path) -> CliResult<Vec<MarketQuote>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CliError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    reader
        .deserialize()
        .collect::<Result<Vec<MarketQuote>, _>>()
        .map_err(|source| CliError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads a knot feed.
pub fn load_knots_csv(path: &Path) -> CliResult<Vec<Date>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| CliError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    reader
        .deserialize()
        .map(|row| row.map(|r: KnotRecord| r.date))
        .collect::<Result<Vec<Date>, _>>()
        .map_err(|source| CliError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bootcurve_curves::instruments::InstrumentKind;
    use bootcurve_math::solvers::SolverMethod;
    use std::io::Write;

    #[test]
    fn test_run_file() {
        let toml = r#"
knots = ["2026-01-09", "2026-04-08"]

[valuation]
as_of = "2026-01-08"
day_count = "ACT/360"
coupon_frequency = 2

[bootstrap]
solver = "brent"

[[instruments]]
tenor = "1D"
kind = "Deposit"
rate = 0.025

[[instruments]]
tenor = "3M"
type = "Deposit"
market_rate = 0.027
"#;
        let config: RunConfig = toml::from_str(toml).unwrap();

        assert_eq!(config.valuation.as_of, Some(Date::from_ymd(2026, 1, 8).unwrap()));
        assert_eq!(config.valuation.day_count, DayCountConvention::Act360);
        assert_eq!(config.valuation.coupon_frequency, Frequency::SemiAnnual);
        assert_eq!(config.bootstrap.solver, SolverMethod::Brent);
        assert_eq!(config.bootstrap.max_iterations, 100);
        assert_eq!(config.knots.len(), 2);
        assert_eq!(config.instruments[1], MarketQuote::new("3M", InstrumentKind::Deposit, 0.027));
    }

    #[test]
    fn test_empty_run_file_uses_defaults() {
        let config: RunConfig = toml::from_str("").unwrap();
        assert_eq!(config, RunConfig::default());
    }

    #[test]
    fn test_csv_feeds() {
        let mut quotes = tempfile::NamedTempFile::new().unwrap();
        writeln!(quotes, "tenor, type, rate\n1D, Deposit, 0.025\n1Y, Swap, 0.028").unwrap();
        let loaded = load_quotes_csv(quotes.path()).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[1].kind, InstrumentKind::Swap);

        let mut knots = tempfile::NamedTempFile::new().unwrap();
        writeln!(knots, "jump_date\n2026-01-09\n2027-01-08").unwrap();
        let loaded = load_knots_csv(knots.path()).unwrap();
        assert_eq!(loaded, vec![
            Date::from_ymd(2026, 1, 9).unwrap(),
            Date::from_ymd(2027, 1, 8).unwrap(),
        ]);
    }

    #[test]
    fn test_missing_file() {
        let err = RunConfig::from_file(Path::new("/nonexistent/run.toml")).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }
}
