//! Market tenor tokens.
//!
//! A tenor is a count followed by an optional unit letter: `"1D"`, `"2W"`,
//! `"3M"`, `"10Y"`. A bare count (`"5"`) is read as years.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Calendar unit of a tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenorUnit {
    /// Calendar days
    Day,
    /// Weeks of seven calendar days
    Week,
    /// Calendar months
    Month,
    /// Calendar years
    Year,
}

impl TenorUnit {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'D' => Some(TenorUnit::Day),
            'W' => Some(TenorUnit::Week),
            'M' => Some(TenorUnit::Month),
            'Y' => Some(TenorUnit::Year),
            _ => None,
        }
    }

    fn letter(self) -> char {
        match self {
            TenorUnit::Day => 'D',
            TenorUnit::Week => 'W',
            TenorUnit::Month => 'M',
            TenorUnit::Year => 'Y',
        }
    }
}

/// A parsed tenor such as `3M`.
///
/// # Example
///
/// ```rust
/// use bootcurve_core::tenor::{Tenor, TenorUnit};
/// use bootcurve_core::types::Date;
///
/// let tenor: Tenor = "1y".parse().unwrap();
/// assert_eq!(tenor.unit(), TenorUnit::Year);
///
/// let as_of = Date::from_ymd(2028, 2, 29).unwrap();
/// assert_eq!(
///     tenor.maturity_date(as_of).unwrap(),
///     Date::from_ymd(2029, 2, 28).unwrap()
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tenor {
    count: u32,
    unit: TenorUnit,
}

impl Tenor {
    /// Creates a tenor from a count and unit.
    #[must_use]
    pub fn new(count: u32, unit: TenorUnit) -> Self {
        Self { count, unit }
    }

    /// Returns the number of units.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Returns the unit.
    #[must_use]
    pub fn unit(&self) -> TenorUnit {
        self.unit
    }

    /// True for `0D`, `0M` and the like.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.count == 0
    }

    /// Nominal length of the tenor in years.
    ///
    /// Days count as 1/365 and weeks as 7/365; months are 1/12.
    /// Used for coupon counts, not for discounting.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        let n = f64::from(self.count);
        match self.unit {
            TenorUnit::Day => n / 365.0,
            TenorUnit::Week => 7.0 * n / 365.0,
            TenorUnit::Month => n / 12.0,
            TenorUnit::Year => n,
        }
    }

    /// Maturity date of the tenor starting from `as_of`.
    ///
    /// Month and year offsets keep the day of month where possible and
    /// otherwise clamp to the last day of the target month.
    ///
    /// # Errors
    ///
    /// Returns an error if the maturity falls outside the supported date range.
    pub fn maturity_date(&self, as_of: Date) -> CoreResult<Date> {
        match self.unit {
            TenorUnit::Day => as_of.checked_add_days(i64::from(self.count)),
            TenorUnit::Week => as_of.checked_add_days(7 * i64::from(self.count)),
            TenorUnit::Month => as_of.add_months(self.signed_count()?),
            TenorUnit::Year => as_of.add_years(self.signed_count()?),
        }
    }

    fn signed_count(&self) -> CoreResult<i32> {
        i32::try_from(self.count)
            .map_err(|_| CoreError::parse_error(self.to_string(), "count out of range"))
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let digits_end = token
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(token.len());
        let (digits, rest) = token.split_at(digits_end);

        if digits.is_empty() {
            return Err(CoreError::parse_error(s, "expected leading digits"));
        }
        let count: u32 = digits
            .parse()
            .map_err(|_| CoreError::parse_error(s, "count out of range"))?;

        let mut chars = rest.chars();
        let unit = match chars.next() {
            None => TenorUnit::Year,
            Some(c) => TenorUnit::from_char(c)
                .ok_or_else(|| CoreError::parse_error(s, format!("unknown unit '{c}'")))?,
        };
        if chars.next().is_some() {
            return Err(CoreError::parse_error(s, "unexpected characters after unit"));
        }

        Ok(Self { count, unit })
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.letter())
    }
}

impl TryFrom<String> for Tenor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Tenor> for String {
    fn from(tenor: Tenor) -> Self {
        tenor.to_string()
    }
}
