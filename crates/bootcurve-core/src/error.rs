//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building dates, tenors and conventions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor token could not be parsed.
    #[error("Cannot parse tenor '{token}': {reason}")]
    ParseError {
        /// The offending token as supplied.
        token: String,
        /// Why the token was rejected.
        reason: String,
    },

    /// Unknown day count convention name.
    #[error("Unknown day count convention: '{name}'")]
    UnknownDayCount {
        /// The name that failed to match.
        name: String,
    },

    /// Unsupported coupon frequency.
    #[error("Unsupported coupon frequency: {value} (expected 1, 2, 4 or 12)")]
    InvalidFrequency {
        /// The rejected periods-per-year value.
        value: u32,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates a tenor parse error.
    #[must_use]
    pub fn parse_error(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ParseError {
            token: token.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = CoreError::parse_error("XY", "no leading digits");
        let msg = err.to_string();
        assert!(msg.contains("'XY'"));
        assert!(msg.contains("no leading digits"));
    }
}
