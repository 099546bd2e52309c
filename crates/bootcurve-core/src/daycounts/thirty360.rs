//! 30/360 day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Simplified 30/360 day count convention.
///
/// # Rules
///
/// 1. If D1 is 31, change D1 to 30
/// 2. If D2 is 31, change D2 to 30
///
/// No February end-of-month adjustment is applied, and D2 is clamped
/// whatever D1 was.
///
/// # Formula
///
/// $$\text{Days} = 360 \times (Y_2 - Y_1) + 30 \times (M_2 - M_1) + (D_2 - D_1)$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360;

impl DayCount for Thirty360 {
    fn name(&self) -> &'static str {
        "30/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        let days = self.day_count(start, end);
        Decimal::from(days) / Decimal::from(360)
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let y1 = start.year() as i64;
        let y2 = end.year() as i64;
        let m1 = start.month() as i64;
        let m2 = end.month() as i64;
        let d1 = (start.day() as i64).min(30);
        let d2 = (end.day() as i64).min(30);

        360 * (y2 - y1) + 30 * (m2 - m1) + (d2 - d1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_thirty360_full_year() {
        let dc = Thirty360;
        let start = Date::from_ymd(2025, 1, 1).unwrap();
        let end = Date::from_ymd(2026, 1, 1).unwrap();

        assert_eq!(dc.day_count(start, end), 360);
        assert_eq!(dc.year_fraction(start, end), dec!(1));
    }

    #[test]
    fn test_thirty360_d1_31_d2_31() {
        let dc = Thirty360;
        let start = Date::from_ymd(2025, 1, 31).unwrap();
        let end = Date::from_ymd(2025, 3, 31).unwrap();

        // Days = 30 * 2 + (30 - 30) = 60
        assert_eq!(dc.day_count(start, end), 60);
    }

    #[test]
    fn test_thirty360_d2_clamped_unconditionally() {
        let dc = Thirty360;
        let start = Date::from_ymd(2025, 1, 15).unwrap();
        let end = Date::from_ymd(2025, 3, 31).unwrap();

        // Days = 30 * 2 + (30 - 15) = 75
        assert_eq!(dc.day_count(start, end), 75);
    }

    #[test]
    fn test_thirty360_february_not_adjusted() {
        let dc = Thirty360;
        let start = Date::from_ymd(2025, 2, 28).unwrap();
        let end = Date::from_ymd(2025, 3, 31).unwrap();

        // Days = 30 * 1 + (30 - 28) = 32
        assert_eq!(dc.day_count(start, end), 32);
    }
}
