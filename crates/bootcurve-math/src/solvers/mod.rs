//! Root-finding algorithms.
//!
//! This module provides numerical solvers for scalar equations `f(x) = 0`:
//!
//! - [`newton_raphson`]: Quadratic convergence near the root; the bootstrap
//!   default, driven by a central-difference derivative
//! - [`secant`]: Derivative-free, superlinear
//! - [`brent`]: Bracketing, guaranteed once a sign change is found
//! - [`bisection`]: Bracketing, slow but simple
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Newton-Raphson | Fastest (quadratic) | May diverge | Initial guess |
//! | Secant | Fast (superlinear) | May diverge | Two guesses |
//! | Brent | Fast (superlinear) | Guaranteed | Bracket |
//! | Bisection | Slow (linear) | Guaranteed | Bracket |
//!
//! All of them implement [`RootFinder`]. Bracketing solvers use the
//! supplied bounds as their bracket, or `initial_guess ± 1` without them.
//!
//! # Example
//!
//! ```rust
//! use bootcurve_math::solvers::{RootFinder, SolverConfig, SolverMethod};
//!
//! // Continuously compounded rate that discounts 1 to 0.97 over 2 years
//! let f = |r: f64| (-r * 2.0).exp() - 0.97;
//!
//! for method in SolverMethod::all() {
//!     let result = method.find_root(f, 0.03, None, &SolverConfig::default()).unwrap();
//!     assert!((result.root - 0.0152296037).abs() < 1e-8);
//! }
//! ```

mod bisection;
mod brent;
mod newton;
mod secant;

pub use bisection::bisection;
pub use brent::brent;
pub use newton::{newton_raphson, newton_raphson_numerical, DERIVATIVE_FLOOR};
pub use secant::secant;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Default half-width of the bracket used when no bounds are supplied.
pub const DEFAULT_BRACKET_HALF_WIDTH: f64 = 1.0;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}

/// Trait for root-finding algorithms.
///
/// Given a scalar function and an initial guess, return a root within
/// `config.tolerance` or fail after `config.max_iterations`.
///
/// # Example
///
/// ```rust
/// use bootcurve_math::solvers::{NewtonSolver, RootFinder, SolverConfig};
///
/// let solver = NewtonSolver::default();
/// let f = |x: f64| x * x - 2.0;
///
/// let result = solver.find_root(f, 1.5, None, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub trait RootFinder: Send + Sync {
    /// Finds a root of the given function.
    ///
    /// # Arguments
    ///
    /// * `f` - The function for which to find a root
    /// * `initial_guess` - Starting point for the search
    /// * `bounds` - Optional interval `(lo, hi)` the search is confined to
    /// * `config` - Solver configuration
    fn find_root<F>(
        &self,
        f: F,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str;
}

/// Newton-Raphson solver with a central-difference derivative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonSolver {
    /// Finite-difference step for the derivative estimate.
    pub step: f64,
}

impl Default for NewtonSolver {
    fn default() -> Self {
        Self { step: 1e-5 }
    }
}

impl RootFinder for NewtonSolver {
    fn find_root<F>(
        &self,
        f: F,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        newton_raphson_numerical(f, initial_guess, self.step, bounds, config)
    }

    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }
}

/// Secant method solver implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SecantSolver;

impl RootFinder for SecantSolver {
    fn find_root<F>(
        &self,
        f: F,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        secant(f, initial_guess, initial_guess + 0.01, bounds, config)
    }

    fn name(&self) -> &'static str {
        "Secant"
    }
}

/// Brent's method solver implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BrentSolver;

impl RootFinder for BrentSolver {
    fn find_root<F>(
        &self,
        f: F,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        check_bounds(bounds)?;
        let (a, b) = bracket(initial_guess, bounds);
        brent(f, a, b, config)
    }

    fn name(&self) -> &'static str {
        "Brent"
    }
}

/// Bisection solver implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BisectionSolver;

impl RootFinder for BisectionSolver {
    fn find_root<F>(
        &self,
        f: F,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        check_bounds(bounds)?;
        let (a, b) = bracket(initial_guess, bounds);
        bisection(f, a, b, config)
    }

    fn name(&self) -> &'static str {
        "Bisection"
    }
}

/// Runtime choice of root finder.
///
/// Parses from and serializes to lowercase names (`"newton"`, `"secant"`,
/// `"brent"`, `"bisection"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverMethod {
    /// [`NewtonSolver`] with its default step.
    #[default]
    Newton,
    /// [`SecantSolver`].
    Secant,
    /// [`BrentSolver`].
    Brent,
    /// [`BisectionSolver`].
    Bisection,
}

impl SolverMethod {
    /// Returns all available methods.
    #[must_use]
    pub fn all() -> &'static [SolverMethod] {
        &[
            SolverMethod::Newton,
            SolverMethod::Secant,
            SolverMethod::Brent,
            SolverMethod::Bisection,
        ]
    }

    fn key(self) -> &'static str {
        match self {
            SolverMethod::Newton => "newton",
            SolverMethod::Secant => "secant",
            SolverMethod::Brent => "brent",
            SolverMethod::Bisection => "bisection",
        }
    }
}

impl RootFinder for SolverMethod {
    fn find_root<F>(
        &self,
        f: F,
        initial_guess: f64,
        bounds: Option<(f64, f64)>,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
    {
        match self {
            SolverMethod::Newton => NewtonSolver::default().find_root(f, initial_guess, bounds, config),
            SolverMethod::Secant => SecantSolver.find_root(f, initial_guess, bounds, config),
            SolverMethod::Brent => BrentSolver.find_root(f, initial_guess, bounds, config),
            SolverMethod::Bisection => BisectionSolver.find_root(f, initial_guess, bounds, config),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SolverMethod::Newton => NewtonSolver::default().name(),
            SolverMethod::Secant => SecantSolver.name(),
            SolverMethod::Brent => BrentSolver.name(),
            SolverMethod::Bisection => BisectionSolver.name(),
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for SolverMethod {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "newton" | "newton-raphson" => Ok(SolverMethod::Newton),
            "secant" => Ok(SolverMethod::Secant),
            "brent" => Ok(SolverMethod::Brent),
            "bisection" => Ok(SolverMethod::Bisection),
            _ => Err(MathError::invalid_input(format!(
                "unknown solver '{s}' (expected newton, secant, brent or bisection)"
            ))),
        }
    }
}

/// Bracket for the bracketing solvers.
fn bracket(initial_guess: f64, bounds: Option<(f64, f64)>) -> (f64, f64) {
    bounds.unwrap_or((
        initial_guess - DEFAULT_BRACKET_HALF_WIDTH,
        initial_guess + DEFAULT_BRACKET_HALF_WIDTH,
    ))
}

/// Confines `x` to `bounds` when given.
pub(crate) fn clamp_to(x: f64, bounds: Option<(f64, f64)>) -> f64 {
    match bounds {
        Some((lo, hi)) => x.max(lo).min(hi),
        None => x,
    }
}

/// Evaluates `f`, rejecting NaN and infinite values.
pub(crate) fn evaluate<F>(f: &F, x: f64) -> MathResult<f64>
where
    F: Fn(f64) -> f64,
{
    let value = f(x);
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MathError::NonFinite { x, value })
    }
}

/// Rejects bounds that are unordered or not finite.
pub(crate) fn check_bounds(bounds: Option<(f64, f64)>) -> MathResult<()> {
    match bounds {
        Some((lo, hi)) if !(lo.is_finite() && hi.is_finite() && lo < hi) => Err(
            MathError::invalid_input(format!("bounds [{lo}, {hi}] are not an increasing interval")),
        ),
        _ => Ok(()),
    }
}
