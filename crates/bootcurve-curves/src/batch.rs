//! Batch bootstrapping across valuation dates.
//!
//! Each valuation date is an independent run with its own context, nodes
//! and engine, so dates are solved in parallel on the rayon pool. A date
//! that fails to set up or solve is reported in its entry and does not
//! affect the others.

use bootcurve_core::{Date, DayCountConvention, Frequency};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::bootstrap::{BootstrapConfig, BootstrapEngine, BootstrapOutcome, CancellationToken};
use crate::error::{CurveError, CurveResult};
use crate::instruments::{Instrument, MarketQuote, ValuationContext};
use crate::nodes::CurveNodeIndex;

/// Result for one valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEntry {
    /// Valuation date.
    pub as_of: Date,
    /// Run result, when the run could be set up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<BootstrapOutcome>,
    /// Setup error, when it could not.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchEntry {
    /// True when the date produced a curve.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        self.outcome.as_ref().is_some_and(BootstrapOutcome::is_solved)
    }
}

/// Runs the same quotes over a range of valuation dates.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    quotes: Vec<MarketQuote>,
    knots: Option<Vec<Date>>,
    day_count: DayCountConvention,
    coupon_frequency: Frequency,
    config: BootstrapConfig,
    cancellation: Option<CancellationToken>,
}

impl BatchRunner {
    /// Creates a runner; knots default to each date's instrument maturities.
    #[must_use]
    pub fn new(quotes: Vec<MarketQuote>) -> Self {
        Self {
            quotes,
            knots: None,
            day_count: DayCountConvention::default(),
            coupon_frequency: Frequency::default(),
            config: BootstrapConfig::default(),
            cancellation: None,
        }
    }

    /// Uses a fixed knot list for every date.
    #[must_use]
    pub fn with_knots(mut self, knots: Vec<Date>) -> Self {
        self.knots = Some(knots);
        self
    }

    /// Sets the day count.
    #[must_use]
    pub fn with_day_count(mut self, day_count: DayCountConvention) -> Self {
        self.day_count = day_count;
        self
    }

    /// Sets the swap coupon frequency.
    #[must_use]
    pub fn with_coupon_frequency(mut self, frequency: Frequency) -> Self {
        self.coupon_frequency = frequency;
        self
    }

    /// Sets the bootstrap configuration.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares a cancellation token with every run.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Bootstraps every calendar day in `from..=to`.
    ///
    /// Entries come back in date order.
    pub fn run(&self, from: Date, to: Date) -> CurveResult<Vec<BatchEntry>> {
        if from > to {
            return Err(CurveError::invalid_config(format!(
                "batch range is empty: {from} is after {to}"
            )));
        }
        self.config.validate()?;

        let dates: Vec<Date> = (0..=from.days_between(&to))
            .map(|offset| from.add_days(offset))
            .collect();

        info!(from = %from, to = %to, dates = dates.len(), "Starting batch bootstrap");

        let entries: Vec<BatchEntry> = dates
            .par_iter()
            .map(|&as_of| match self.run_date(as_of) {
                Ok(outcome) => BatchEntry {
                    as_of,
                    outcome: Some(outcome),
                    error: None,
                },
                Err(e) => BatchEntry {
                    as_of,
                    outcome: None,
                    error: Some(e.to_string()),
                },
            })
            .collect();

        let solved = entries.iter().filter(|e| e.is_solved()).count();
        info!(solved, total = entries.len(), "Batch bootstrap complete");

        Ok(entries)
    }

    /// Bootstraps a single valuation date.
    pub fn run_date(&self, as_of: Date) -> CurveResult<BootstrapOutcome> {
        let context = ValuationContext::new(as_of, self.day_count, self.coupon_frequency);
        let instruments = Instrument::resolve_all(&self.quotes, &context)?;
        let nodes = match &self.knots {
            Some(knots) => CurveNodeIndex::new(knots.clone())?,
            None => CurveNodeIndex::from_maturities(&instruments)?,
        };

        let mut engine = BootstrapEngine::new(context, instruments, &nodes, self.config)?;
        if let Some(token) = &self.cancellation {
            engine = engine.with_cancellation(token.clone());
        }
        Ok(engine.run())
    }
}
