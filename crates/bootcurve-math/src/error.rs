//! Error types for root finding.

use thiserror::Error;

/// A specialized Result type for mathematical operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur while searching for a root.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Root-finding algorithm failed to converge.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e} at {last_x})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Function value at the last iterate.
        residual: f64,
        /// The last iterate.
        last_x: f64,
    },

    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// Division by zero or near-zero value.
    #[error("Division by zero or near-zero value: {value:.2e}")]
    DivisionByZero {
        /// The near-zero value.
        value: f64,
    },

    /// The function returned NaN or infinity.
    #[error("Function is not finite at {x}: {value}")]
    NonFinite {
        /// The point at which the function was evaluated.
        x: f64,
        /// The value it returned.
        value: f64,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64, last_x: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
            last_x,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// The last `(x, f(x))` pair the solver saw, when there was one.
    #[must_use]
    pub fn last_evaluation(&self) -> Option<(f64, f64)> {
        match self {
            Self::ConvergenceFailed {
                residual, last_x, ..
            } => Some((*last_x, *residual)),
            Self::InvalidBracket { b, fb, .. } => Some((*b, *fb)),
            Self::NonFinite { x, value } => Some((*x, *value)),
            Self::DivisionByZero { .. } | Self::InvalidInput { .. } => None,
        }
    }

    /// Iterations spent before the failure, if known.
    #[must_use]
    pub fn iterations(&self) -> u32 {
        match self {
            Self::ConvergenceFailed { iterations, .. } => *iterations,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MathError::convergence_failed(100, 1e-6, 0.03);
        assert!(err.to_string().contains("100 iterations"));
    }

    #[test]
    fn test_last_evaluation() {
        let err = MathError::convergence_failed(7, -2.5e-4, 0.5);
        assert_eq!(err.last_evaluation(), Some((0.5, -2.5e-4)));
        assert_eq!(err.iterations(), 7);

        let err = MathError::InvalidBracket {
            a: 0.0,
            b: 1.0,
            fa: 0.2,
            fb: 0.1,
        };
        assert_eq!(err.last_evaluation(), Some((1.0, 0.1)));
        assert_eq!(MathError::invalid_input("x").last_evaluation(), None);
    }
}
