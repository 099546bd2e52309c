//! Secant root-finding algorithm.

use log::trace;

use crate::error::{MathError, MathResult};
use crate::solvers::{check_bounds, clamp_to, evaluate, SolverConfig, SolverResult};

/// Secant root-finding algorithm.
///
/// Similar to Newton-Raphson but approximates the derivative from the
/// previous two iterates. Does not require an analytical derivative or a
/// bracketing interval. Iterates are clamped into `bounds` when given.
///
/// Convergence rate is superlinear (order ~1.618, the golden ratio).
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `x0` - First initial guess
/// * `x1` - Second initial guess (should be different from x0)
/// * `bounds` - Optional interval the iterates are clamped into
/// * `config` - Solver configuration
///
/// # Example
///
/// ```rust
/// use bootcurve_math::solvers::{secant, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
///
/// let result = secant(f, 1.0, 2.0, None, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn secant<F>(
    f: F,
    x0: f64,
    x1: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    check_bounds(bounds)?;

    let mut x_prev = clamp_to(x0, bounds);
    let mut x_curr = clamp_to(x1, bounds);
    let mut f_prev = evaluate(&f, x_prev)?;
    let mut f_curr = evaluate(&f, x_curr)?;

    for iteration in 0..config.max_iterations {
        if f_curr.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x_curr,
                iterations: iteration,
                residual: f_curr,
            });
        }

        // Parallel secant line
        let denom = f_curr - f_prev;
        if denom.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: denom });
        }

        let x_next = clamp_to(x_curr - f_curr * (x_curr - x_prev) / denom, bounds);
        let f_next = evaluate(&f, x_next)?;
        trace!("secant iteration {}: x = {x_next:.12}, f(x) = {f_next:.3e}", iteration + 1);

        x_prev = x_curr;
        f_prev = f_curr;
        x_curr = x_next;
        f_curr = f_next;
    }

    if f_curr.abs() < config.tolerance {
        return Ok(SolverResult {
            root: x_curr,
            iterations: config.max_iterations,
            residual: f_curr,
        });
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f_curr,
        x_curr,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = secant(f, 1.0, 2.0, None, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_cube_root() {
        let f = |x: f64| x * x * x - 27.0;

        let result = secant(f, 2.0, 4.0, None, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_convergence_speed() {
        let f = |x: f64| x * x - 2.0;

        let result = secant(f, 1.0, 2.0, None, &SolverConfig::default()).unwrap();

        assert!(result.iterations < 15);
    }

    #[test]
    fn test_close_initial_guesses() {
        let f = |x: f64| x * x - 2.0;

        let result = secant(f, 1.4, 1.42, None, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_flat_function() {
        let f = |_x: f64| 1.0;

        let result = secant(f, 0.0, 1.0, None, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::DivisionByZero { .. })));
    }
}
