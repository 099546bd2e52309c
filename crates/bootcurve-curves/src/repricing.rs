//! Repricing validation.
//!
//! A solved curve must price every input instrument back to par. The
//! report built here records each instrument's residual pricing error
//! against the final curve.
//!
//! # Usage
//!
//! ```rust
//! use bootcurve_curves::prelude::*;
//!
//! let context = ValuationContext::new(
//!     Date::from_ymd(2026, 1, 8).unwrap(),
//!     DayCountConvention::Act365,
//!     Frequency::Quarterly,
//! );
//! let quotes = [
//!     MarketQuote::new("3M", InstrumentKind::Deposit, 0.027),
//!     MarketQuote::new("1Y", InstrumentKind::Swap, 0.028),
//! ];
//! let instruments = Instrument::resolve_all(&quotes, &context).unwrap();
//! let nodes = CurveNodeIndex::from_maturities(&instruments).unwrap();
//! let curve = BootstrapEngine::new(context, instruments.clone(), &nodes, BootstrapConfig::default())
//!     .unwrap()
//!     .run()
//!     .into_result()
//!     .unwrap();
//!
//! let report = reprice(&curve, &instruments, &context, 1e-9).unwrap();
//! assert!(report.is_valid());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::discount::DiscountCurve;
use crate::error::{CurveError, CurveResult};
use crate::instruments::{Instrument, InstrumentKind, ValuationContext};
use crate::pricing::InstrumentPricer;

/// Default repricing tolerance, in PV per unit notional.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Result of repricing a single instrument against the curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepricingCheck {
    /// Instrument label (e.g., "Swap 2Y")
    pub instrument_id: String,

    /// Kind of instrument
    pub kind: InstrumentKind,

    /// The target PV (0 for par instruments)
    pub target_pv: f64,

    /// Model-implied PV from the curve
    pub model_pv: f64,

    /// Absolute error |model_pv - target_pv|
    pub error: f64,

    /// Tolerance applied
    pub tolerance: f64,

    /// Whether this instrument passed validation
    pub passed: bool,
}

impl RepricingCheck {
    /// Creates a new repricing check result.
    #[must_use]
    pub fn new(
        instrument_id: String,
        kind: InstrumentKind,
        target_pv: f64,
        model_pv: f64,
        tolerance: f64,
    ) -> Self {
        let error = (model_pv - target_pv).abs();
        let passed = error <= tolerance;

        Self {
            instrument_id,
            kind,
            target_pv,
            model_pv,
            error,
            tolerance,
            passed,
        }
    }
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "✓" } else { "✗" };
        write!(
            f,
            "{} {} | PV: {:.2e} | Error: {:.2e} (tol: {:.2e})",
            status, self.instrument_id, self.model_pv, self.error, self.tolerance
        )
    }
}

/// Repricing results for every input instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepricingReport {
    checks: Vec<RepricingCheck>,
    max_error: f64,
    rms_error: f64,
    all_passed: bool,
    passed_count: usize,
    failed_count: usize,
}

impl RepricingReport {
    /// Creates a report from individual checks.
    #[must_use]
    pub fn new(checks: Vec<RepricingCheck>) -> Self {
        let max_error = checks.iter().map(|c| c.error).fold(0.0_f64, f64::max);

        let rms_error = if checks.is_empty() {
            0.0
        } else {
            let sum_sq: f64 = checks.iter().map(|c| c.error * c.error).sum();
            (sum_sq / checks.len() as f64).sqrt()
        };

        let passed_count = checks.iter().filter(|c| c.passed).count();
        let failed_count = checks.len() - passed_count;

        Self {
            all_passed: failed_count == 0,
            checks,
            max_error,
            rms_error,
            passed_count,
            failed_count,
        }
    }

    /// True when every instrument reprices within tolerance.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.all_passed
    }

    /// Individual checks, in instrument order.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Largest absolute error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    /// Root mean square error.
    #[must_use]
    pub fn rms_error(&self) -> f64 {
        self.rms_error
    }

    /// Number of instruments that passed.
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.passed_count
    }

    /// Number of instruments that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failed_count
    }

    /// Number of instruments checked.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.checks.len()
    }

    /// Labels of the instruments that failed.
    #[must_use]
    pub fn failed_instruments(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.instrument_id.as_str())
            .collect()
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Repricing Report")?;
        writeln!(f, "================")?;
        writeln!(f, "Status: {}", if self.all_passed { "PASSED" } else { "FAILED" })?;
        writeln!(f, "Instruments: {}/{} passed", self.passed_count, self.checks.len())?;
        writeln!(f, "Max Error: {:.2e}", self.max_error)?;
        writeln!(f, "RMS Error: {:.2e}", self.rms_error)?;

        if !self.checks.is_empty() {
            writeln!(f)?;
            writeln!(f, "Details:")?;
            for check in &self.checks {
                writeln!(f, "  {check}")?;
            }
        }

        Ok(())
    }
}

/// Reprices `instruments` against a curve solved from them.
///
/// Instrument `i` must correspond to segment `i` of the curve.
pub fn reprice(
    curve: &DiscountCurve,
    instruments: &[Instrument],
    context: &ValuationContext,
    tolerance: f64,
) -> CurveResult<RepricingReport> {
    if instruments.len() != curve.len() {
        return Err(CurveError::LengthMismatch {
            knots: curve.len(),
            forwards: instruments.len(),
        });
    }

    let checks = instruments
        .iter()
        .map(|inst| {
            let pricer = InstrumentPricer::new(inst, curve.knots(), context)?;
            Ok(RepricingCheck::new(
                inst.label(),
                inst.kind,
                0.0,
                pricer.error_against(curve),
                tolerance,
            ))
        })
        .collect::<CurveResult<Vec<_>>>()?;

    Ok(RepricingReport::new(checks))
}
