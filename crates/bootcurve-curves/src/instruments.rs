//! Market quotes and the instruments resolved from them.
//!
//! A [`MarketQuote`] is what a feed supplies: a tenor token, a kind and a
//! quoted rate. Resolving it against a [`ValuationContext`] fixes its
//! maturity and produces an immutable [`Instrument`].

use std::fmt;
use std::str::FromStr;

use bootcurve_core::{Date, DayCountConvention, Frequency, Tenor};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Type of bootstrap instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum InstrumentKind {
    /// Cash deposit paying `1 + r * yf` at maturity.
    Deposit,
    /// Par fixed-for-floating interest rate swap.
    Swap,
}

impl InstrumentKind {
    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            InstrumentKind::Deposit => "Deposit",
            InstrumentKind::Swap => "Swap",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for InstrumentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "deposit" | "depo" | "cash" => Ok(InstrumentKind::Deposit),
            "swap" | "irs" => Ok(InstrumentKind::Swap),
            _ => Err(format!("unknown instrument kind '{s}' (expected Deposit or Swap)")),
        }
    }
}

impl TryFrom<String> for InstrumentKind {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InstrumentKind> for String {
    fn from(kind: InstrumentKind) -> Self {
        kind.name().to_string()
    }
}

/// One record of the instrument feed.
///
/// The tenor stays an unparsed token until the quote is resolved, so a bad
/// token fails only that instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketQuote {
    /// Tenor token such as `"3M"`.
    pub tenor: String,
    /// Instrument kind.
    #[serde(alias = "type")]
    pub kind: InstrumentKind,
    /// Quoted rate as a decimal (0.025 for 2.5%).
    #[serde(alias = "market_rate")]
    pub rate: f64,
}

impl MarketQuote {
    /// Creates a quote.
    #[must_use]
    pub fn new(tenor: impl Into<String>, kind: InstrumentKind, rate: f64) -> Self {
        Self {
            tenor: tenor.into(),
            kind,
            rate,
        }
    }
}

/// Conventions shared by every instrument of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValuationContext {
    /// Valuation date; all year fractions are measured from it.
    pub as_of: Date,
    /// Day count used for accruals and curve time.
    #[serde(default)]
    pub day_count: DayCountConvention,
    /// Fixed-leg frequency of the swaps.
    #[serde(default)]
    pub coupon_frequency: Frequency,
}

impl ValuationContext {
    /// Creates a valuation context.
    #[must_use]
    pub fn new(as_of: Date, day_count: DayCountConvention, coupon_frequency: Frequency) -> Self {
        Self {
            as_of,
            day_count,
            coupon_frequency,
        }
    }

    /// Returns a copy anchored at another valuation date.
    #[must_use]
    pub fn with_as_of(self, as_of: Date) -> Self {
        Self { as_of, ..self }
    }

    /// Year fraction from the valuation date to `date`.
    #[must_use]
    pub fn time(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.as_of, date)
    }
}

/// A quote resolved against a valuation date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    /// Position in the feed; defines solve order.
    pub index: usize,
    /// Instrument kind.
    pub kind: InstrumentKind,
    /// Parsed tenor.
    pub tenor: Tenor,
    /// Nominal tenor length in years.
    pub tenor_years: f64,
    /// Quoted rate.
    pub rate: f64,
    /// `as_of + tenor`.
    pub maturity: Date,
}

impl Instrument {
    /// Resolves one quote.
    ///
    /// Fails with [`CurveError::InvalidInstrument`] when the tenor does not
    /// parse, is zero-length, or the rate is not finite.
    pub fn from_quote(
        index: usize,
        quote: &MarketQuote,
        context: &ValuationContext,
    ) -> CurveResult<Self> {
        let tenor = quote
            .tenor
            .parse::<Tenor>()
            .map_err(|e| CurveError::invalid_instrument(index, e.to_string()))?;

        if tenor.is_zero() {
            return Err(CurveError::invalid_instrument(
                index,
                format!("zero-length tenor '{}'", quote.tenor),
            ));
        }
        if !quote.rate.is_finite() {
            return Err(CurveError::invalid_instrument(
                index,
                format!("quoted rate {} is not finite", quote.rate),
            ));
        }

        let maturity = tenor
            .maturity_date(context.as_of)
            .map_err(|e| CurveError::invalid_instrument(index, e.to_string()))?;

        Ok(Self {
            index,
            kind: quote.kind,
            tenor,
            tenor_years: tenor.year_fraction(),
            rate: quote.rate,
            maturity,
        })
    }

    /// Resolves a whole feed, in order.
    pub fn resolve_all(quotes: &[MarketQuote], context: &ValuationContext) -> CurveResult<Vec<Self>> {
        quotes
            .iter()
            .enumerate()
            .map(|(index, quote)| Self::from_quote(index, quote, context))
            .collect()
    }

    /// Short label such as `"Swap 2Y"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.kind, self.tenor)
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} @ {:.4}% -> {}",
            self.index,
            self.kind,
            self.tenor,
            self.rate * 100.0,
            self.maturity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn context() -> ValuationContext {
        ValuationContext::new(
            Date::from_ymd(2026, 1, 8).unwrap(),
            DayCountConvention::Act365,
            Frequency::Quarterly,
        )
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("deposit".parse::<InstrumentKind>().unwrap(), InstrumentKind::Deposit);
        assert_eq!("IRS".parse::<InstrumentKind>().unwrap(), InstrumentKind::Swap);
        assert_eq!(" Swap ".parse::<InstrumentKind>().unwrap(), InstrumentKind::Swap);
        assert!("future".parse::<InstrumentKind>().is_err());
    }

    #[test]
    fn test_out_of_range_maturity_is_invalid_instrument() {
        for tenor in ["999999999D", "2147483647M", "2147483647Y"] {
            let quote = MarketQuote::new(tenor, InstrumentKind::Swap, 0.03);
            let err = Instrument::from_quote(3, &quote, &context()).unwrap_err();
            assert!(
                matches!(err, CurveError::InvalidInstrument { index: 3, .. }),
                "{tenor}: {err}"
            );
        }
    }

    #[test]
    fn test_resolve_quote() {
        let quote = MarketQuote::new("18M", InstrumentKind::Swap, 0.028025);
        let inst = Instrument::from_quote(5, &quote, &context()).unwrap();

        assert_eq!(inst.index, 5);
        assert_eq!(inst.maturity, Date::from_ymd(2027, 7, 8).unwrap());
        assert_relative_eq!(inst.tenor_years, 1.5);
        assert_eq!(inst.label(), "Swap 18M");
    }

    #[test]
    fn test_bad_tenor_is_instrument_scoped() {
        let quotes = vec![
            MarketQuote::new("1D", InstrumentKind::Deposit, 0.025),
            MarketQuote::new("XY", InstrumentKind::Deposit, 0.026),
        ];

        let err = Instrument::resolve_all(&quotes, &context()).unwrap_err();
        match err {
            CurveError::InvalidInstrument { index, reason } => {
                assert_eq!(index, 1);
                assert!(reason.contains("XY"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_zero_tenor_rejected() {
        let quote = MarketQuote::new("0M", InstrumentKind::Deposit, 0.02);
        assert!(matches!(
            Instrument::from_quote(0, &quote, &context()),
            Err(CurveError::InvalidInstrument { index: 0, .. })
        ));
    }

    #[test]
    fn test_non_finite_rate_rejected() {
        let quote = MarketQuote::new("1Y", InstrumentKind::Swap, f64::NAN);
        assert!(Instrument::from_quote(0, &quote, &context()).is_err());
    }

    #[test]
    fn test_quote_deserialize_aliases() {
        let json = r#"{"tenor": "3M", "type": "IRS", "market_rate": 0.027}"#;
        let quote: MarketQuote = serde_json::from_str(json).unwrap();
        assert_eq!(quote, MarketQuote::new("3M", InstrumentKind::Swap, 0.027));
    }

    #[test]
    fn test_context_serde_defaults() {
        let json = r#"{"as_of": "2026-01-08"}"#;
        let ctx: ValuationContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx, context());
    }
}
