//! Curve query surface.

use bootcurve_core::Date;

use crate::discount::DiscountCurve;
use crate::error::{CurveError, CurveResult};

/// Read-only queries against a solved curve.
///
/// Implementors only provide the valuation date, the log discount factor,
/// curve time and the segment forwards; rates are derived from those.
pub trait CurveQuery {
    /// Valuation date of the curve.
    fn as_of(&self) -> Date;

    /// Year fraction from the valuation date to `date`.
    fn year_fraction(&self, date: Date) -> f64;

    /// Natural log of the discount factor at `date`.
    fn log_discount(&self, date: Date) -> f64;

    /// Forward rates of the solved segments.
    fn segment_forwards(&self) -> &[f64];

    /// Discount factor at `date`; `1.0` on or before the valuation date.
    fn discount_factor(&self, date: Date) -> f64 {
        self.log_discount(date).exp()
    }

    /// Continuously compounded zero rate, `-ln(DF) / yf`.
    ///
    /// At or before the valuation date the instantaneous short rate (the
    /// first segment's forward) is returned.
    fn zero_rate(&self, date: Date) -> f64 {
        let t = self.year_fraction(date);
        if t <= 0.0 {
            return self.segment_forwards().first().copied().unwrap_or(0.0);
        }
        -self.log_discount(date) / t
    }

    /// Forward rate of segment `index`.
    fn forward_rate(&self, index: usize) -> CurveResult<f64> {
        let forwards = self.segment_forwards();
        forwards
            .get(index)
            .copied()
            .ok_or(CurveError::SegmentOutOfRange {
                index,
                len: forwards.len(),
            })
    }
}

impl CurveQuery for DiscountCurve {
    fn as_of(&self) -> Date {
        DiscountCurve::as_of(self)
    }

    fn year_fraction(&self, date: Date) -> f64 {
        self.time(date)
    }

    fn log_discount(&self, date: Date) -> f64 {
        self.log_discount_factor(date)
    }

    fn segment_forwards(&self) -> &[f64] {
        self.forwards()
    }
}
