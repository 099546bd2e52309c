//! Bootstrap configuration.

use bootcurve_math::solvers::{SolverConfig, SolverMethod, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Initial guess used when an instrument is quoted at exactly zero.
pub const ZERO_RATE_SEED: f64 = 0.03;

/// Closed interval trial forward rates are clamped to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateBounds {
    /// Lowest admissible forward.
    pub min: f64,
    /// Highest admissible forward.
    pub max: f64,
}

impl RateBounds {
    /// Creates a bound.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// The `[0.01%, 50%]` band used by spreadsheet bootstrappers.
    #[must_use]
    pub fn conventional() -> Self {
        Self::new(0.0001, 0.5)
    }

    /// Returns the bound as a `(lo, hi)` tuple.
    #[must_use]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

/// Configuration for [`BootstrapEngine`](super::BootstrapEngine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Absolute tolerance on the pricing error.
    pub tolerance: f64,
    /// Iteration cap per instrument.
    pub max_iterations: u32,
    /// Optional clamp on trial forwards; unbounded when `None`.
    pub rate_bounds: Option<RateBounds>,
    /// Root finder used by [`BootstrapEngine::new`](super::BootstrapEngine::new).
    pub solver: SolverMethod,
    /// Record every pricing-error evaluation.
    pub record_trace: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            rate_bounds: None,
            solver: SolverMethod::default(),
            record_trace: false,
        }
    }
}

impl BootstrapConfig {
    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Clamps trial forwards to `bounds`.
    #[must_use]
    pub fn with_rate_bounds(mut self, bounds: RateBounds) -> Self {
        self.rate_bounds = Some(bounds);
        self
    }

    /// Selects the root finder.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverMethod) -> Self {
        self.solver = solver;
        self
    }

    /// Enables or disables the solve trace.
    #[must_use]
    pub fn with_trace(mut self, enabled: bool) -> Self {
        self.record_trace = enabled;
        self
    }

    /// The per-step solver configuration.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig::new(self.tolerance, self.max_iterations)
    }

    /// Checks the configuration is usable.
    pub fn validate(&self) -> CurveResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(CurveError::invalid_config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(CurveError::invalid_config("max_iterations must be at least 1"));
        }
        if let Some(bounds) = self.rate_bounds {
            if !(bounds.min.is_finite() && bounds.max.is_finite() && bounds.min < bounds.max) {
                return Err(CurveError::invalid_config(format!(
                    "rate bounds [{}, {}] are not an interval",
                    bounds.min, bounds.max
                )));
            }
        }
        Ok(())
    }

    /// Initial guess for an instrument quoted at `rate`.
    #[must_use]
    pub fn initial_guess(&self, rate: f64) -> f64 {
        let guess = if rate == 0.0 { ZERO_RATE_SEED } else { rate };
        match self.rate_bounds {
            Some(b) => guess.clamp(b.min, b.max),
            None => guess,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.tolerance, 1e-10);
        assert_eq!(config.max_iterations, 100);
        assert!(config.rate_bounds.is_none());
        assert_eq!(config.solver, SolverMethod::Newton);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(BootstrapConfig::default().with_tolerance(0.0).validate().is_err());
        assert!(BootstrapConfig::default().with_max_iterations(0).validate().is_err());
        assert!(BootstrapConfig::default()
            .with_rate_bounds(RateBounds::new(0.5, 0.1))
            .validate()
            .is_err());
    }

    #[test]
    fn test_initial_guess() {
        let config = BootstrapConfig::default();
        assert_eq!(config.initial_guess(0.025), 0.025);
        assert_eq!(config.initial_guess(0.0), ZERO_RATE_SEED);

        let bounded = config.with_rate_bounds(RateBounds::conventional());
        assert_eq!(bounded.initial_guess(0.9), 0.5);
        assert_eq!(bounded.initial_guess(-0.01), 0.0001);
    }

    #[test]
    fn test_partial_deserialize() {
        let config: BootstrapConfig =
            serde_json::from_str(r#"{"solver": "brent", "rate_bounds": {"min": 0.0, "max": 0.2}}"#)
                .unwrap();
        assert_eq!(config.solver, SolverMethod::Brent);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.rate_bounds, Some(RateBounds::new(0.0, 0.2)));
    }
}
