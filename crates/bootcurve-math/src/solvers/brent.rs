//! Brent's root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{evaluate, SolverConfig, SolverResult};

/// Brent's root-finding algorithm.
///
/// Keeps a sign-changing bracket `[best, contra]` with `|f(best)| <= |f(contra)|`
/// and steps from `best` by inverse quadratic interpolation or the secant
/// rule, falling back to bisection whenever the interpolated step is not
/// shrinking fast enough.
///
/// Requires: `f(a) * f(b) < 0` (opposite signs at endpoints)
///
/// Converges only when `|f(best)| < tolerance`. A bracket that collapses to
/// float resolution without meeting that test is reported as
/// [`MathError::ConvergenceFailed`].
///
/// # Example
///
/// ```rust
/// use bootcurve_math::solvers::{brent, SolverConfig};
///
/// // Find root of x^3 - x - 2
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-10);
/// ```
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut prev = a;
    let mut best = b;
    let mut f_prev = evaluate(&f, prev)?;
    let mut f_best = evaluate(&f, best)?;

    if f_prev * f_best > 0.0 {
        return Err(MathError::InvalidBracket {
            a,
            b,
            fa: f_prev,
            fb: f_best,
        });
    }

    let mut contra = prev;
    let mut f_contra = f_prev;
    let mut step = best - prev;
    let mut last_step = step;

    for iteration in 0..config.max_iterations {
        if f_best * f_contra > 0.0 {
            contra = prev;
            f_contra = f_prev;
            step = best - prev;
            last_step = step;
        }
        if f_contra.abs() < f_best.abs() {
            prev = best;
            f_prev = f_best;
            best = contra;
            f_best = f_contra;
            contra = prev;
            f_contra = f_prev;
        }

        if f_best.abs() < config.tolerance {
            return Ok(SolverResult {
                root: best,
                iterations: iteration,
                residual: f_best,
            });
        }

        let half = 0.5 * (contra - best);
        let resolution = 2.0 * f64::EPSILON * best.abs() + f64::MIN_POSITIVE;
        if half.abs() <= resolution {
            return Err(MathError::convergence_failed(iteration, f_best, best));
        }

        let interpolated = if last_step.abs() >= resolution && f_prev.abs() > f_best.abs() {
            interpolation_step(best, prev, contra, f_best, f_prev, f_contra, half)
        } else {
            None
        };

        match interpolated {
            Some((p, q))
                if 2.0 * p < (3.0 * half * q - (resolution * q).abs()).min((last_step * q).abs()) =>
            {
                last_step = step;
                step = p / q;
            }
            _ => {
                step = half;
                last_step = step;
            }
        }

        prev = best;
        f_prev = f_best;
        best += if step.abs() > resolution {
            step
        } else {
            resolution.copysign(half)
        };
        f_best = evaluate(&f, best)?;
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f_best,
        best,
    ))
}

/// Numerator and denominator of the next step from `best`, normalised so
/// the numerator is non-negative. Uses the secant rule when only two
/// distinct points are known.
fn interpolation_step(
    best: f64,
    prev: f64,
    contra: f64,
    f_best: f64,
    f_prev: f64,
    f_contra: f64,
    half: f64,
) -> Option<(f64, f64)> {
    let s = f_best / f_prev;
    let (p, q) = if prev == contra {
        (2.0 * half * s, 1.0 - s)
    } else {
        let q = f_prev / f_contra;
        let r = f_best / f_contra;
        (
            s * (2.0 * half * q * (q - r) - (best - prev) * (r - 1.0)),
            (q - 1.0) * (r - 1.0) * (s - 1.0),
        )
    };
    if !p.is_finite() || !q.is_finite() {
        return None;
    }
    Some(if p > 0.0 { (p, -q) } else { (-p, q) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_cubic() {
        // x^3 - x - 2 has a root near 1.52
        let f = |x: f64| x * x * x - x - 2.0;

        let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();

        assert!(f(result.root).abs() < 1e-10);
        assert_relative_eq!(result.root, 1.521_379_706_804_568, epsilon = 1e-10);
    }

    #[test]
    fn test_forward_rate_for_discount_factor() {
        // Flat forward over half a year reproducing DF = 0.985
        let f = |r: f64| (-r * 0.5).exp() - 0.985;

        let result = brent(f, -1.0, 1.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, -(0.985_f64).ln() / 0.5, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;

        let result = brent(f, 2.0, 3.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_non_finite_endpoint() {
        let f = |x: f64| x.ln();

        let result = brent(f, -1.0, 2.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::NonFinite { .. })));
    }

    #[test]
    fn test_faster_than_bisection() {
        let f = |x: f64| x * x - 2.0;

        let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();

        // Bisection needs ~34 iterations for 1e-10 tolerance
        assert!(result.iterations < 20);
    }

    #[test]
    fn test_collapsed_bracket_without_small_residual_fails() {
        // Sign change with no zero: the bracket shrinks onto the jump
        let f = |x: f64| if x < 0.3 { -1.0 } else { 1.0 };

        let config = SolverConfig::new(1e-10, 500);
        let err = brent(f, 0.0, 1.0, &config).unwrap_err();

        assert!(matches!(err, MathError::ConvergenceFailed { .. }));
        let (x, fx) = err.last_evaluation().unwrap();
        assert_relative_eq!(x, 0.3, epsilon = 1e-12);
        assert_relative_eq!(fx.abs(), 1.0);
    }

    #[test]
    fn test_tight_bracket_still_requires_small_residual() {
        // Steep slope: bracket width below tolerance is not enough on its own
        let f = |x: f64| 1e4 * (x - 0.3);

        let result = brent(f, 0.0, 1.0, &SolverConfig::default()).unwrap();

        assert!(result.residual.abs() < 1e-10);
        assert_relative_eq!(result.root, 0.3, epsilon = 1e-13);
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 0.025;

        let result = brent(f, 0.0, 0.025, &SolverConfig::default()).unwrap();

        assert_eq!(result.iterations, 0);
        assert_relative_eq!(result.root, 0.025);
    }
}
