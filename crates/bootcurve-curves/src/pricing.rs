//! Instrument pricing errors.
//!
//! An [`InstrumentPricer`] is built once per bootstrap step. It fixes the
//! instrument's schedule and the year fractions of the knots it prices
//! against, so each evaluation inside the root search is plain arithmetic
//! with no allocation.
//!
//! Both instrument kinds are priced as a fixed-rate bond against par:
//!
//! - Deposit: `(1 + r * yf(as_of, T)) * DF(T) - 1`
//! - Swap: `Σ r * acc_j * DF(c_j) - (1 - DF(T))`

use bootcurve_core::{Date, DayCountConvention};
use serde::{Deserialize, Serialize};

use crate::discount::{log_discount, ForwardProfile};
use crate::error::{CurveError, CurveResult};
use crate::instruments::{Instrument, InstrumentKind, ValuationContext};
use crate::traits::CurveQuery;

/// A fixed-leg payment date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Payment date.
    pub date: Date,
    /// Year fraction from the valuation date.
    pub time: f64,
    /// Accrual from the previous payment date.
    pub accrual: f64,
}

/// Role of a cash flow in the validation breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashflowKind {
    /// Notional paid on the valuation date.
    Initial,
    /// Fixed coupon.
    Coupon,
    /// Notional returned at maturity.
    Redemption,
}

/// One row of an instrument's cash-flow breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashflowRow {
    /// Payment date.
    pub date: Date,
    /// Role of the cash flow.
    pub kind: CashflowKind,
    /// Accrual year fraction (zero for notional flows).
    pub accrual: f64,
    /// Discount factor at the payment date.
    pub discount_factor: f64,
    /// Undiscounted amount per unit notional.
    pub amount: f64,
    /// `amount * discount_factor`.
    pub present_value: f64,
}

/// Pricing error of one instrument as a function of its trial forward.
#[derive(Debug, Clone)]
pub struct InstrumentPricer {
    kind: InstrumentKind,
    rate: f64,
    as_of: Date,
    maturity: Date,
    maturity_time: f64,
    deposit_accrual: f64,
    coupons: Vec<Coupon>,
    knot_times: Vec<f64>,
}

impl InstrumentPricer {
    /// Prepares an instrument for pricing against `knots`.
    ///
    /// `knots` are the knots of the segments solved so far plus the
    /// instrument's own knot, in order.
    pub fn new(
        instrument: &Instrument,
        knots: &[Date],
        context: &ValuationContext,
    ) -> CurveResult<Self> {
        if knots.is_empty() {
            return Err(CurveError::EmptyNodes);
        }

        let dc = context.day_count;
        let as_of = context.as_of;
        let knot_times = knots.iter().map(|&k| context.time(k)).collect();
        let coupons = match instrument.kind {
            InstrumentKind::Deposit => Vec::new(),
            InstrumentKind::Swap => coupon_schedule(instrument, context),
        };

        Ok(Self {
            kind: instrument.kind,
            rate: instrument.rate,
            as_of,
            maturity: instrument.maturity,
            maturity_time: context.time(instrument.maturity),
            deposit_accrual: dc.year_fraction(as_of, instrument.maturity),
            coupons,
            knot_times,
        })
    }

    /// Instrument kind.
    #[must_use]
    pub fn kind(&self) -> InstrumentKind {
        self.kind
    }

    /// Maturity date.
    #[must_use]
    pub fn maturity(&self) -> Date {
        self.maturity
    }

    /// Fixed-leg schedule; empty for deposits.
    #[must_use]
    pub fn coupons(&self) -> &[Coupon] {
        &self.coupons
    }

    /// Number of segments the pricer expects.
    #[must_use]
    pub fn segments(&self) -> usize {
        self.knot_times.len()
    }

    /// Pricing error with `solved` fixed and `trial` as the newest segment.
    ///
    /// `solved.len() + 1` must equal [`segments`](Self::segments); any other
    /// length yields `NaN`, which every solver rejects as a non-finite
    /// evaluation.
    #[must_use]
    pub fn pricing_error(&self, trial: f64, solved: &[f64]) -> f64 {
        if solved.len() + 1 != self.knot_times.len() {
            return f64::NAN;
        }
        let profile = ForwardProfile::with_trial(solved, trial);
        self.error_with(|_, t| log_discount(t, &self.knot_times, profile).exp())
    }

    /// Pricing error against a solved curve.
    #[must_use]
    pub fn error_against(&self, curve: &impl CurveQuery) -> f64 {
        self.error_with(|date, _| curve.discount_factor(date))
    }

    /// Present value of the fixed leg (coupons only) against a curve.
    #[must_use]
    pub fn fixed_leg_pv(&self, curve: &impl CurveQuery) -> f64 {
        match self.kind {
            InstrumentKind::Deposit => {
                self.rate * self.deposit_accrual * curve.discount_factor(self.maturity)
            }
            InstrumentKind::Swap => self
                .coupons
                .iter()
                .map(|c| self.rate * c.accrual * curve.discount_factor(c.date))
                .sum(),
        }
    }

    /// Cash-flow breakdown against a solved curve.
    ///
    /// The present values sum to [`error_against`](Self::error_against).
    #[must_use]
    pub fn cashflows(&self, curve: &impl CurveQuery) -> Vec<CashflowRow> {
        let mut rows = Vec::with_capacity(self.coupons.len() + 2);
        rows.push(CashflowRow {
            date: self.as_of,
            kind: CashflowKind::Initial,
            accrual: 0.0,
            discount_factor: 1.0,
            amount: -1.0,
            present_value: -1.0,
        });

        let row = |date: Date, kind: CashflowKind, accrual: f64, amount: f64| {
            let df = curve.discount_factor(date);
            CashflowRow {
                date,
                kind,
                accrual,
                discount_factor: df,
                amount,
                present_value: amount * df,
            }
        };

        match self.kind {
            InstrumentKind::Deposit => {
                let amount = 1.0 + self.rate * self.deposit_accrual;
                rows.push(row(
                    self.maturity,
                    CashflowKind::Redemption,
                    self.deposit_accrual,
                    amount,
                ));
            }
            InstrumentKind::Swap => {
                for c in &self.coupons {
                    rows.push(row(c.date, CashflowKind::Coupon, c.accrual, self.rate * c.accrual));
                }
                rows.push(row(self.maturity, CashflowKind::Redemption, 0.0, 1.0));
            }
        }
        rows
    }

    fn error_with(&self, df: impl Fn(Date, f64) -> f64) -> f64 {
        let df_maturity = df(self.maturity, self.maturity_time);
        match self.kind {
            InstrumentKind::Deposit => (1.0 + self.rate * self.deposit_accrual) * df_maturity - 1.0,
            InstrumentKind::Swap => {
                let fixed: f64 = self
                    .coupons
                    .iter()
                    .map(|c| self.rate * c.accrual * df(c.date, c.time))
                    .sum();
                fixed - (1.0 - df_maturity)
            }
        }
    }
}

/// Pricing error of `instrument` at `trial` given the solved segments.
///
/// `knots` must hold one more date than `solved`: the solved knots followed
/// by the instrument's own knot.
///
/// # Errors
///
/// [`CurveError::LengthMismatch`] when the knot count does not match.
pub fn pricing_error(
    trial: f64,
    instrument: &Instrument,
    solved: &[f64],
    knots: &[Date],
    context: &ValuationContext,
) -> CurveResult<f64> {
    if knots.len() != solved.len() + 1 {
        return Err(CurveError::LengthMismatch {
            knots: knots.len(),
            forwards: solved.len() + 1,
        });
    }
    let pricer = InstrumentPricer::new(instrument, knots, context)?;
    Ok(pricer.pricing_error(trial, solved))
}

/// Fixed-leg payment dates of a swap.
///
/// `n = max(1, round(tenor_years * frequency))`. Coupon `j < n` falls
/// `floor(j * 365 / frequency)` days after the valuation date; the last
/// coupon is the exact maturity.
fn coupon_schedule(instrument: &Instrument, context: &ValuationContext) -> Vec<Coupon> {
    let freq = context.coupon_frequency.periods_per_year();
    let n = ((instrument.tenor_years * f64::from(freq)).round() as u32).max(1);
    let dc: DayCountConvention = context.day_count;

    let mut prev = context.as_of;
    (1..=n)
        .map(|j| {
            let date = if j == n {
                instrument.maturity
            } else {
                context
                    .as_of
                    .add_days(i64::from(j) * 365 / i64::from(freq))
            };
            let coupon = Coupon {
                date,
                time: context.time(date),
                accrual: dc.year_fraction(prev, date),
            };
            prev = date;
            coupon
        })
        .collect()
}
