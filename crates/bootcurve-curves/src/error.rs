//! Error types for curve construction and bootstrapping.

use bootcurve_core::{CoreError, Date};
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// An instrument could not be built from its quote.
    #[error("Invalid instrument #{index}: {reason}")]
    InvalidInstrument {
        /// Position of the instrument in the feed.
        index: usize,
        /// Description of what's wrong with the instrument.
        reason: String,
    },

    /// Two instruments map to the same knot, or knots go backwards.
    #[error("Degenerate segment at instrument #{index}: knot {knot} does not follow {previous}")]
    DegenerateSegment {
        /// Position of the offending instrument.
        index: usize,
        /// Knot the instrument resolved to.
        knot: Date,
        /// The preceding knot (or the valuation date for the first segment).
        previous: Date,
    },

    /// Node dates are not strictly increasing.
    #[error("Non-monotonic node dates at index {index}: {previous} >= {current}")]
    NonMonotonicNodes {
        /// Index where monotonicity violation occurred.
        index: usize,
        /// Previous node date.
        previous: Date,
        /// Current node date.
        current: Date,
    },

    /// The node list is empty.
    #[error("Curve node list is empty")]
    EmptyNodes,

    /// No instruments were supplied.
    #[error("No instruments to bootstrap")]
    NoInstruments,

    /// Knot and forward-rate vectors differ in length.
    #[error("Length mismatch: {knots} knots but {forwards} forward rates")]
    LengthMismatch {
        /// Number of knots.
        knots: usize,
        /// Number of forward rates.
        forwards: usize,
    },

    /// Requested segment does not exist.
    #[error("Segment {index} out of range (curve has {len} segments)")]
    SegmentOutOfRange {
        /// Requested segment.
        index: usize,
        /// Number of segments.
        len: usize,
    },

    /// Invalid value (NaN, Inf, or domain error).
    #[error("Invalid value: {reason}")]
    InvalidValue {
        /// Description of why value is invalid.
        reason: String,
    },

    /// Bootstrap configuration is unusable.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },

    /// The bootstrap failed at an instrument.
    #[error("Bootstrap failed at instrument #{index} ({tenor}): {reason}")]
    BootstrapFailed {
        /// Position of the failing instrument.
        index: usize,
        /// Tenor token of the failing instrument.
        tenor: String,
        /// Description of failure.
        reason: String,
    },

    /// The bootstrap was cancelled before completing.
    #[error("Bootstrap cancelled after {completed} instruments")]
    Cancelled {
        /// Number of instruments solved before cancellation.
        completed: usize,
    },

    /// Date or convention error from the core crate.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl CurveError {
    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            index,
            reason: reason.into(),
        }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            reason: reason.into(),
        }
    }

    /// Creates an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CurveError::invalid_instrument(3, "zero-length tenor");
        assert_eq!(err.to_string(), "Invalid instrument #3: zero-length tenor");

        let err = CurveError::LengthMismatch {
            knots: 3,
            forwards: 2,
        };
        assert!(err.to_string().contains("3 knots"));
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: CurveError = CoreError::invalid_date("bad").into();
        assert_eq!(err.to_string(), "Invalid date: bad");
    }
}
