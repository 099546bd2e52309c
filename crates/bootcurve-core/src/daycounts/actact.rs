//! Actual/Actual day count convention.

use rust_decimal::Decimal;

use super::DayCount;
use crate::types::Date;

/// Average year length used by the Actual/Actual approximation.
const AVERAGE_YEAR_DAYS: Decimal = Decimal::from_parts(36525, 0, 0, false, 2);

/// Actual/Actual, approximated with a 365.25-day year.
///
/// Not the ISDA year-split rule: actual days are divided by the average
/// Julian year length regardless of which years the period spans.
///
/// # Formula
///
/// $$\text{Year Fraction} = \frac{\text{Actual Days}}{365.25}$$
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActAct;

impl DayCount for ActAct {
    fn name(&self) -> &'static str {
        "ACT/ACT"
    }

    fn year_fraction(&self, start: Date, end: Date) -> Decimal {
        let days = self.day_count(start, end);
        Decimal::from(days) / AVERAGE_YEAR_DAYS
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
