//! Newton-Raphson root-finding algorithm.

use log::trace;

use crate::error::{MathError, MathResult};
use crate::solvers::{check_bounds, clamp_to, evaluate, SolverConfig, SolverResult};

/// Smallest derivative magnitude used in a Newton step.
///
/// Flatter derivatives are replaced by this value, keeping their sign.
pub const DERIVATIVE_FLOOR: f64 = 1e-12;

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// Converges when `|f(x)| < tolerance`. A derivative smaller than
/// [`DERIVATIVE_FLOOR`] in magnitude is floored instead of failing, and
/// each new iterate is clamped into `bounds` when they are given.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `bounds` - Optional interval the iterates are clamped into
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use bootcurve_math::solvers::{newton_raphson, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_raphson(f, df, 1.5, None, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    check_bounds(bounds)?;

    let mut x = clamp_to(initial_guess, bounds);
    let mut fx = evaluate(&f, x)?;

    for iteration in 0..config.max_iterations {
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let raw = df(x);
        if raw.is_nan() {
            return Err(MathError::NonFinite { x, value: raw });
        }
        let dfx = if raw.abs() < DERIVATIVE_FLOOR {
            DERIVATIVE_FLOOR.copysign(raw)
        } else {
            raw
        };

        x = clamp_to(x - fx / dfx, bounds);
        fx = evaluate(&f, x)?;
        trace!("newton iteration {}: x = {x:.12}, f(x) = {fx:.3e}", iteration + 1);
    }

    if fx.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x,
            iterations: config.max_iterations,
            residual: fx,
        });
    }

    Err(MathError::convergence_failed(config.max_iterations, fx, x))
}

/// Newton-Raphson with numerical derivative estimation.
///
/// The derivative is the central difference
/// `(f(x + h) - f(x - h)) / 2h`.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `initial_guess` - Starting point for the iteration
/// * `h` - Finite-difference step
/// * `bounds` - Optional interval the iterates are clamped into
/// * `config` - Solver configuration
pub fn newton_raphson_numerical<F>(
    f: F,
    initial_guess: f64,
    h: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    if !(h.is_finite() && h > 0.0) {
        return Err(MathError::invalid_input(format!(
            "finite-difference step must be positive, got {h}"
        )));
    }

    let df = |x: f64| {
        let f1 = f(x + h);
        let f2 = f(x - h);
        (f1 - f2) / (2.0 * h)
    };

    newton_raphson(&f, df, initial_guess, bounds, config)
}
