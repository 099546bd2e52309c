//! Day count conventions.
//!
//! Day count conventions convert a pair of dates into a year fraction.
//! Each convention is a unit struct implementing [`DayCount`], and
//! [`DayCountConvention`] selects one at runtime.
//!
//! # Supported Conventions
//!
//! - [`Act365Fixed`]: Actual/365 Fixed
//! - [`Act360`]: Actual/360
//! - [`ActAct`]: Actual/Actual, approximated with a 365.25-day year
//! - [`Thirty360`]: 30/360 with 31st clamped to 30th on both ends
//!
//! # Usage
//!
//! ```rust
//! use bootcurve_core::daycounts::{DayCount, Thirty360};
//! use bootcurve_core::types::Date;
//!
//! let dc = Thirty360;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! assert_eq!(dc.day_count(start, end), 180);
//! ```

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::Act365Fixed;
pub use actact::ActAct;
pub use thirty360::Thirty360;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Date;

/// Trait for day count conventions.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// Negative if `end < start`.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates according to the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;

    /// Year fraction as a float, for use in discounting arithmetic.
    fn year_fraction_f64(&self, start: Date, end: Date) -> f64 {
        self.year_fraction(start, end).to_f64().unwrap_or(f64::NAN)
    }
}

/// Enumeration of the supported day count conventions.
///
/// # Example
///
/// ```rust
/// use bootcurve_core::daycounts::DayCountConvention;
/// use bootcurve_core::types::Date;
///
/// let convention: DayCountConvention = "act/360".parse().unwrap();
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 1, 19).unwrap();
/// assert!((convention.year_fraction(start, end) - 0.05).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DayCountConvention {
    /// Actual/365 Fixed
    #[default]
    Act365,
    /// Actual/360
    Act360,
    /// Actual/Actual (365.25-day approximation)
    ActAct,
    /// 30/360 (simplified)
    Thirty360,
}

impl DayCountConvention {
    /// Returns the implementation for this convention.
    #[must_use]
    pub fn day_count(&self) -> &'static dyn DayCount {
        match self {
            DayCountConvention::Act365 => &Act365Fixed,
            DayCountConvention::Act360 => &Act360,
            DayCountConvention::ActAct => &ActAct,
            DayCountConvention::Thirty360 => &Thirty360,
        }
    }

    /// Year fraction between two dates under this convention.
    ///
    /// Never fails; returns a negative fraction when `end < start`.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count().year_fraction_f64(start, end)
    }

    /// Returns the market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.day_count().name()
    }

    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act365,
            DayCountConvention::Act360,
            DayCountConvention::ActAct,
            DayCountConvention::Thirty360,
        ]
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = CoreError;

    /// Parses a day count convention from a string.
    ///
    /// Accepts market names ("ACT/365", "30/360") and common aliases
    /// ("ACTUAL/360", "ACT365F", "BOND"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();

        match normalized.as_str() {
            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACT365" | "ACT365F" => {
                Ok(DayCountConvention::Act365)
            }
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/ACT" | "ACTUAL/ACTUAL" | "ACTACT" => Ok(DayCountConvention::ActAct),
            "30/360" | "30E/360" | "THIRTY360" | "BOND" => Ok(DayCountConvention::Thirty360),
            _ => Err(CoreError::UnknownDayCount {
                name: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for DayCountConvention {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DayCountConvention> for String {
    fn from(convention: DayCountConvention) -> Self {
        convention.name().to_string()
    }
}
