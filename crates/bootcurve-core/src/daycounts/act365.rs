//! Actual/365 Fixed day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Actual/365 Fixed day count convention.
///
/// The day count is the actual number of days between dates.
/// The year basis is always 365 days (ignoring leap years).
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{365}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        let days = self.day_count(start, end);
        Decimal::from(days) / Decimal::from(365)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_act365_fixed_full_year() {
        let dc = Act365Fixed;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();

        assert_eq!(dc.day_count(start, end), 365);
        assert_eq!(dc.year_fraction(start, end), dec!(1));
    }

    #[test]
    fn test_act365_fixed_ignores_leap_day() {
        let dc = Act365Fixed;
        let start = Date::from_ymd(2028, 1, 1).unwrap();
        let end = Date::from_ymd(2029, 1, 1).unwrap();

        assert_eq!(dc.day_count(start, end), 366);
        assert_eq!(dc.year_fraction(start, end), dec!(366) / dec!(365));
    }

    #[test]
    fn test_one_day() {
        let dc = Act365Fixed;
        let start = Date::from_ymd(2026, 1, 8).unwrap();

        assert_eq!(dc.year_fraction(start, start + 1), dec!(1) / dec!(365));
        assert_eq!(dc.year_fraction(start, start), Decimal::ZERO);
    }
}
