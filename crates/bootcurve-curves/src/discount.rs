//! Piecewise-flat forward discounting.
//!
//! There is exactly one discount function, [`log_discount`], operating on
//! year fractions measured from the valuation date. The date-based
//! [`discount_factor`], the queryable [`DiscountCurve`] and the instrument
//! pricer are thin adapters over it.
//!
//! Between knots the instantaneous forward is constant, so
//!
//! ```text
//! ln DF(t) = -Σ f_i * (min(t, t_i) - t_{i-1})
//! ```
//!
//! Beyond the last knot the last forward is extended flat.

use bootcurve_core::{Date, DayCountConvention};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Forward rates seen by the discount function.
///
/// `solved` holds the segments fixed by earlier bootstrap steps; `trial`,
/// when present, is the newest segment currently being searched. Keeping
/// the two apart lets the pricer evaluate a trial rate without building a
/// new vector.
#[derive(Debug, Clone, Copy)]
pub struct ForwardProfile<'a> {
    solved: &'a [f64],
    trial: Option<f64>,
}

impl<'a> ForwardProfile<'a> {
    /// Profile made of solved segments only.
    #[must_use]
    pub fn solved(solved: &'a [f64]) -> Self {
        Self {
            solved,
            trial: None,
        }
    }

    /// Solved segments followed by one trial segment.
    #[must_use]
    pub fn with_trial(solved: &'a [f64], trial: f64) -> Self {
        Self {
            solved,
            trial: Some(trial),
        }
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.solved.len() + usize::from(self.trial.is_some())
    }

    /// True when there are no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forward of the last segment.
    #[must_use]
    pub fn last(&self) -> Option<f64> {
        self.trial.or_else(|| self.solved.last().copied())
    }

    fn iter(&self) -> impl Iterator<Item = f64> + 'a {
        self.solved.iter().copied().chain(self.trial)
    }
}

/// Natural log of the discount factor at `target_t` years.
///
/// `knot_times[i]` is the year fraction of the i-th knot; it must have at
/// least as many entries as `forwards`. Returns `0.0` (DF = 1) for
/// `target_t <= 0` or an empty profile.
#[must_use]
pub fn log_discount(target_t: f64, knot_times: &[f64], forwards: ForwardProfile<'_>) -> f64 {
    debug_assert!(knot_times.len() >= forwards.len());

    if target_t <= 0.0 {
        return 0.0;
    }
    let Some(last_rate) = forwards.last() else {
        return 0.0;
    };

    let mut log_df = 0.0;
    let mut prev_t = 0.0;
    for (&knot_t, rate) in knot_times.iter().zip(forwards.iter()) {
        if target_t <= knot_t {
            return log_df - rate * (target_t - prev_t);
        }
        log_df -= rate * (knot_t - prev_t);
        prev_t = knot_t;
    }

    log_df - last_rate * (target_t - prev_t)
}

/// Discount factor for `target` given paired knots and forwards.
///
/// # Errors
///
/// [`CurveError::LengthMismatch`] when `knots` and `forwards` differ in
/// length.
pub fn discount_factor(
    target: Date,
    as_of: Date,
    knots: &[Date],
    forwards: &[f64],
    day_count: DayCountConvention,
) -> CurveResult<f64> {
    if knots.len() != forwards.len() {
        return Err(CurveError::LengthMismatch {
            knots: knots.len(),
            forwards: forwards.len(),
        });
    }

    let target_t = day_count.year_fraction(as_of, target);
    if target_t <= 0.0 {
        return Ok(1.0);
    }

    let knot_times: Vec<f64> = knots
        .iter()
        .map(|&k| day_count.year_fraction(as_of, k))
        .collect();
    Ok(log_discount(target_t, &knot_times, ForwardProfile::solved(forwards)).exp())
}

/// One flat segment of the forward curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForwardStep {
    /// Segment start (valuation date or previous knot).
    pub start: Date,
    /// Segment end (knot).
    pub end: Date,
    /// Forward rate over the segment.
    pub rate: f64,
}

/// Serialized form of a [`DiscountCurve`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CurveData {
    as_of: Date,
    day_count: DayCountConvention,
    knots: Vec<Date>,
    forwards: Vec<f64>,
}

/// A solved discount curve.
///
/// Holds the valuation date, the day count, and the knot/forward pairs of
/// every solved segment. Queries go through [`CurveQuery`](crate::CurveQuery).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CurveData", into = "CurveData")]
pub struct DiscountCurve {
    as_of: Date,
    day_count: DayCountConvention,
    knots: Vec<Date>,
    forwards: Vec<f64>,
    knot_times: Vec<f64>,
}

impl DiscountCurve {
    /// Creates a curve from paired knots and forwards.
    ///
    /// Knots must be strictly increasing and after `as_of`; forwards must be
    /// finite and as many as the knots.
    pub fn new(
        as_of: Date,
        day_count: DayCountConvention,
        knots: Vec<Date>,
        forwards: Vec<f64>,
    ) -> CurveResult<Self> {
        if knots.is_empty() {
            return Err(CurveError::EmptyNodes);
        }
        if knots.len() != forwards.len() {
            return Err(CurveError::LengthMismatch {
                knots: knots.len(),
                forwards: forwards.len(),
            });
        }
        if knots[0] <= as_of {
            return Err(CurveError::DegenerateSegment {
                index: 0,
                knot: knots[0],
                previous: as_of,
            });
        }
        if let Some(i) = knots.windows(2).position(|w| w[0] >= w[1]) {
            return Err(CurveError::NonMonotonicNodes {
                index: i + 1,
                previous: knots[i],
                current: knots[i + 1],
            });
        }
        if let Some(bad) = forwards.iter().find(|f| !f.is_finite()) {
            return Err(CurveError::invalid_value(format!(
                "forward rate {bad} is not finite"
            )));
        }

        Ok(Self::from_parts(as_of, day_count, knots, forwards))
    }

    /// Builds a curve from parts already validated by the bootstrap.
    pub(crate) fn from_parts(
        as_of: Date,
        day_count: DayCountConvention,
        knots: Vec<Date>,
        forwards: Vec<f64>,
    ) -> Self {
        let knot_times = knots
            .iter()
            .map(|&k| day_count.year_fraction(as_of, k))
            .collect();
        Self {
            as_of,
            day_count,
            knots,
            forwards,
            knot_times,
        }
    }

    /// Valuation date.
    #[must_use]
    pub fn as_of(&self) -> Date {
        self.as_of
    }

    /// Day count used for curve time.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Knot dates, one per segment.
    #[must_use]
    pub fn knots(&self) -> &[Date] {
        &self.knots
    }

    /// Forward rates, one per segment.
    #[must_use]
    pub fn forwards(&self) -> &[f64] {
        &self.forwards
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.forwards.len()
    }

    /// Always false for a constructed curve.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forwards.is_empty()
    }

    /// Last knot; queries beyond it are extrapolated flat.
    #[must_use]
    pub fn horizon(&self) -> Date {
        self.knots[self.knots.len() - 1]
    }

    /// Year fraction from the valuation date.
    #[must_use]
    pub fn time(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.as_of, date)
    }

    /// Natural log of the discount factor at `date`.
    #[must_use]
    pub fn log_discount_factor(&self, date: Date) -> f64 {
        log_discount(
            self.time(date),
            &self.knot_times,
            ForwardProfile::solved(&self.forwards),
        )
    }

    /// The step profile of the forward curve.
    #[must_use]
    pub fn forward_steps(&self) -> Vec<ForwardStep> {
        let starts = std::iter::once(self.as_of).chain(self.knots.iter().copied());
        starts
            .zip(self.knots.iter().zip(&self.forwards))
            .map(|(start, (&end, &rate))| ForwardStep { start, end, rate })
            .collect()
    }
}

impl TryFrom<CurveData> for DiscountCurve {
    type Error = CurveError;

    fn try_from(data: CurveData) -> Result<Self, Self::Error> {
        Self::new(data.as_of, data.day_count, data.knots, data.forwards)
    }
}

impl From<DiscountCurve> for CurveData {
    fn from(curve: DiscountCurve) -> Self {
        Self {
            as_of: curve.as_of,
            day_count: curve.day_count,
            knots: curve.knots,
            forwards: curve.forwards,
        }
    }
}
