//! Curve node ("jump date") index.
//!
//! Knots partition the timeline into segments, each carrying one constant
//! forward rate once solved. The index is fixed before bootstrapping and
//! never changes afterwards.

use bootcurve_core::Date;
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};
use crate::instruments::Instrument;

/// A single knot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveNode {
    /// Position in the index.
    pub ordinal: usize,
    /// Knot date.
    pub date: Date,
}

/// Ordered, deduplicated knot dates.
///
/// # Example
///
/// ```rust
/// use bootcurve_core::Date;
/// use bootcurve_curves::nodes::CurveNodeIndex;
///
/// let d = |m, day| Date::from_ymd(2026, m, day).unwrap();
/// let index = CurveNodeIndex::new(vec![d(1, 9), d(4, 8), d(7, 8)]).unwrap();
///
/// assert_eq!(index.node_at_or_after(d(2, 1)), d(4, 8));
/// assert_eq!(index.node_at_or_after(d(4, 8)), d(4, 8));
/// // Past the horizon the last knot is returned
/// assert_eq!(index.node_at_or_after(d(12, 31)), d(7, 8));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Date>", into = "Vec<Date>")]
pub struct CurveNodeIndex {
    dates: Vec<Date>,
}

impl CurveNodeIndex {
    /// Builds an index from strictly ascending dates.
    pub fn new(dates: Vec<Date>) -> CurveResult<Self> {
        if dates.is_empty() {
            return Err(CurveError::EmptyNodes);
        }
        if let Some(i) = dates.windows(2).position(|w| w[0] >= w[1]) {
            return Err(CurveError::NonMonotonicNodes {
                index: i + 1,
                previous: dates[i],
                current: dates[i + 1],
            });
        }
        Ok(Self { dates })
    }

    /// Builds an index from dates in any order, dropping duplicates.
    pub fn from_unsorted(dates: impl IntoIterator<Item = Date>) -> CurveResult<Self> {
        let mut dates: Vec<Date> = dates.into_iter().collect();
        dates.sort_unstable();
        dates.dedup();
        Self::new(dates)
    }

    /// Uses the instrument maturities themselves as knots.
    pub fn from_maturities(instruments: &[Instrument]) -> CurveResult<Self> {
        Self::from_unsorted(instruments.iter().map(|inst| inst.maturity))
    }

    /// Smallest knot at or after `date`, clamped to the last knot.
    #[must_use]
    pub fn node_at_or_after(&self, date: Date) -> Date {
        self.dates[self.ordinal_at_or_after(date)]
    }

    /// Ordinal of [`node_at_or_after`](Self::node_at_or_after).
    #[must_use]
    pub fn ordinal_at_or_after(&self, date: Date) -> usize {
        let idx = self.dates.partition_point(|d| *d < date);
        idx.min(self.dates.len() - 1)
    }

    /// True when `date` lies beyond the last knot.
    #[must_use]
    pub fn is_beyond_horizon(&self, date: Date) -> bool {
        date > self.last()
    }

    /// The knot dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Iterates the knots with their ordinals.
    pub fn nodes(&self) -> impl Iterator<Item = CurveNode> + '_ {
        self.dates
            .iter()
            .enumerate()
            .map(|(ordinal, &date)| CurveNode { ordinal, date })
    }

    /// Number of knots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false; an index holds at least one knot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// The first knot.
    #[must_use]
    pub fn first(&self) -> Date {
        self.dates[0]
    }

    /// The last knot (the curve horizon).
    #[must_use]
    pub fn last(&self) -> Date {
        self.dates[self.dates.len() - 1]
    }
}

impl TryFrom<Vec<Date>> for CurveNodeIndex {
    type Error = CurveError;

    fn try_from(dates: Vec<Date>) -> Result<Self, Self::Error> {
        Self::new(dates)
    }
}

impl From<CurveNodeIndex> for Vec<Date> {
    fn from(index: CurveNodeIndex) -> Self {
        index.dates
    }
}
