//! Root finding for scalar functions: bisection and Newton iteration.

use crate::error::SolveError;
use crate::result::{BisectionStep, MethodResult, NewtonStep, Termination, Trace};
use crate::settings::{
    validate_tolerance, DifferenceScheme, RootMethod, RootRequest, BISECTION_RESIDUAL_CUTOFF,
    DERIVATIVE_EPSILON, NEWTON_DERIVATIVE_STEP,
};
use crate::traits::ScalarFunction;
use tracing::{debug, info, warn};

/// Finds a root of `f` in `[a, b]` by repeated halving.
///
/// Requires `f(a) * f(b) <= 0`. Stops when `|f(c)| < 1e-12` or the half-width
/// `|b - a| / 2` drops below `tolerance`. The bracket stays closed: `[a, c]` is kept
/// when `f(a) * f(c) < 0`, otherwise `[c, b]`.
pub fn bisection<F: ScalarFunction + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    tolerance: f64,
    max_iterations: usize,
) -> MethodResult {
    let mut trace = Trace::default();
    let outcome = bisect(f, a, b, tolerance, max_iterations, &mut trace);
    finish("bisection", outcome, trace)
}

/// Newton iteration from `x0` with a central-difference derivative.
///
/// Converges when either the step `|x_next - x|` or the residual `|f(x_next)|` drops
/// below `tolerance`. The residual test alone can stop the iteration while the step is
/// still large when `f` is very flat.
pub fn newton<F: ScalarFunction + ?Sized>(
    f: &F,
    x0: f64,
    tolerance: f64,
    max_iterations: usize,
) -> MethodResult {
    let mut trace = Trace::default();
    let outcome = newton_iterate(f, x0, tolerance, max_iterations, &mut trace);
    finish("newton", outcome, trace)
}

/// Runs the method selected by `request`.
pub fn solve<F: ScalarFunction + ?Sized>(f: &F, request: &RootRequest) -> MethodResult {
    let settings = &request.settings;
    match request.method {
        RootMethod::Bisection { a, b } => {
            bisection(f, a, b, settings.tolerance, settings.max_iterations)
        }
        RootMethod::Newton { x0 } => newton(f, x0, settings.tolerance, settings.max_iterations),
    }
}

fn finish(
    method: &'static str,
    outcome: Result<Termination, SolveError>,
    trace: Trace,
) -> MethodResult {
    match &outcome {
        Ok(Termination::Converged(_)) => info!(method, iterations = trace.len(), "converged"),
        Ok(Termination::Exhausted(_)) => {
            warn!(method, iterations = trace.len(), "iteration budget exhausted")
        }
        Err(error) => warn!(method, %error, "root finding failed"),
    }
    MethodResult::from_iterative(outcome, trace)
}

fn bisect<F: ScalarFunction + ?Sized>(
    f: &F,
    mut a: f64,
    mut b: f64,
    tolerance: f64,
    max_iterations: usize,
    trace: &mut Trace,
) -> Result<Termination, SolveError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(SolveError::invalid_input(format!(
            "bracket endpoints must be finite, got [{a}, {b}]"
        )));
    }
    validate_tolerance(tolerance).map_err(SolveError::invalid_input)?;

    let mut fa = f.value_at(a)?;
    let fb = f.value_at(b)?;
    if fa * fb > 0.0 {
        return Err(SolveError::invalid_input(format!(
            "f(a) and f(b) must have opposite signs, got f({a}) = {fa} and f({b}) = {fb}"
        )));
    }

    let mut c = a;
    for iteration in 1..=max_iterations {
        c = 0.5 * (a + b);
        let fc = f.value_at(c)?;
        let width = (b - a).abs();

        trace.push(BisectionStep {
            iteration,
            a,
            b,
            c,
            fc,
            width,
        });
        debug!(iteration, c, fc, width, "bisection step");

        if fc.abs() < BISECTION_RESIDUAL_CUTOFF || width / 2.0 < tolerance {
            return Ok(Termination::Converged(c.into()));
        }

        if fa * fc < 0.0 {
            b = c;
        } else {
            a = c;
            fa = fc;
        }
    }

    Ok(Termination::Exhausted(c.into()))
}

fn newton_iterate<F: ScalarFunction + ?Sized>(
    f: &F,
    x0: f64,
    tolerance: f64,
    max_iterations: usize,
    trace: &mut Trace,
) -> Result<Termination, SolveError> {
    if !x0.is_finite() {
        return Err(SolveError::invalid_input(format!(
            "initial guess must be finite, got {x0}"
        )));
    }
    validate_tolerance(tolerance).map_err(SolveError::invalid_input)?;

    let mut x = x0;
    for iteration in 1..=max_iterations {
        let fx = f.value_at(x)?;
        let dfx = DifferenceScheme::Central.estimate(f, x, NEWTON_DERIVATIVE_STEP)?;

        trace.push(NewtonStep {
            iteration,
            x,
            fx,
            dfx,
        });
        debug!(iteration, x, fx, dfx, "newton step");

        if dfx.abs() < DERIVATIVE_EPSILON {
            return Err(SolveError::DerivativeNearZero { x, derivative: dfx });
        }

        let next = x - fx / dfx;
        if (next - x).abs() < tolerance || f.value_at(next)?.abs() < tolerance {
            return Ok(Termination::Converged(next.into()));
        }
        x = next;
    }

    Ok(Termination::Exhausted(x.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::result::IterationRecord;
    use crate::settings::IterationSettings;
    use approx::assert_abs_diff_eq;

    fn cubic(x: f64) -> Result<f64, EvalError> {
        Ok(x * x * x - 2.0 * x - 5.0)
    }

    fn assert_err_contains(result: &MethodResult, needle: &str) {
        let message = result.error().expect("expected an error").to_string();
        assert!(
            message.contains(needle),
            "expected error containing '{needle}', got '{message}'"
        );
    }

    #[test]
    fn bisection_finds_cubic_root() {
        let result = bisection(&cubic, 2.0, 3.0, 1e-4, 50);
        assert!(result.converged());
        assert_abs_diff_eq!(result.scalar().unwrap(), 2.094551, epsilon = 1e-4);
        assert!(result.error().is_none());
    }

    #[test]
    fn bisection_records_halving_bracket() {
        let result = bisection(&cubic, 2.0, 3.0, 1e-4, 50);
        let first = match &result.iterations()[0] {
            IterationRecord::Bisection(step) => *step,
            other => panic!("unexpected record {other:?}"),
        };
        assert_eq!(first.iteration, 1);
        assert_eq!((first.a, first.b, first.c), (2.0, 3.0, 2.5));
        assert_abs_diff_eq!(first.fc, 5.625);
        assert_eq!(first.width, 1.0);

        // f(2.5) > 0 and f(2) < 0, so the bracket becomes [2, 2.5].
        let second = match &result.iterations()[1] {
            IterationRecord::Bisection(step) => *step,
            other => panic!("unexpected record {other:?}"),
        };
        assert_eq!((second.a, second.b), (2.0, 2.5));
    }

    #[test]
    fn bisection_rejects_same_sign_endpoints_without_iterating() {
        let result = bisection(&cubic, 3.0, 4.0, 1e-4, 50);
        assert!(!result.converged());
        assert!(result.iterations().is_empty());
        assert!(result.result().is_none());
        assert_err_contains(&result, "opposite signs");
    }

    #[test]
    fn bisection_reports_exhausted_budget_with_last_midpoint() {
        let result = bisection(&cubic, 2.0, 3.0, 1e-12, 3);
        assert!(!result.converged());
        assert_eq!(result.iterations().len(), 3);
        // Midpoints: 2.5, 2.25, 2.125.
        assert_eq!(result.scalar(), Some(2.125));
        assert_eq!(
            result.error(),
            Some(&SolveError::NonConvergence { iterations: 3 })
        );
    }

    #[test]
    fn bisection_stops_on_exact_root() {
        let linear = |x: f64| -> Result<f64, EvalError> { Ok(x - 1.0) };
        let result = bisection(&linear, 0.0, 2.0, 1e-12, 50);
        assert!(result.converged());
        assert_eq!(result.iterations().len(), 1);
        assert_eq!(result.scalar(), Some(1.0));
    }

    #[test]
    fn newton_converges_faster_than_bisection() {
        let newton_result = newton(&cubic, 2.0, 1e-4, 50);
        let bisection_result = bisection(&cubic, 2.0, 3.0, 1e-4, 50);

        assert!(newton_result.converged());
        assert_abs_diff_eq!(newton_result.scalar().unwrap(), 2.094551, epsilon = 1e-5);
        assert!(newton_result.iterations().len() < bisection_result.iterations().len());
    }

    #[test]
    fn newton_fails_on_vanishing_derivative() {
        let parabola = |x: f64| -> Result<f64, EvalError> { Ok(x * x + 1.0) };
        let result = newton(&parabola, 0.0, 1e-6, 50);

        assert!(!result.converged());
        assert!(result.result().is_none());
        assert!(matches!(
            result.error(),
            Some(SolveError::DerivativeNearZero { .. })
        ));
        // The failing step is still recorded.
        assert_eq!(result.iterations().len(), 1);
    }

    #[test]
    fn newton_residual_test_can_stop_far_from_root() {
        // Known edge case: f is so flat that |f(x_next)| < tol while x_next is still
        // far from the root at 10.
        let flat = |x: f64| -> Result<f64, EvalError> { Ok(1e-6 * (x - 10.0).powi(3)) };
        let result = newton(&flat, 0.0, 1e-3, 50);
        assert!(result.converged());
        assert_eq!(result.iterations().len(), 1);
        assert_abs_diff_eq!(result.scalar().unwrap(), 10.0 / 3.0, epsilon = 1e-4);
    }

    #[test]
    fn newton_reports_exhausted_budget() {
        // Newton cycles between 0 and 1 on x^3 - 2x + 2 from x0 = 0.
        let cycling = |x: f64| -> Result<f64, EvalError> { Ok(x * x * x - 2.0 * x + 2.0) };
        let result = newton(&cycling, 0.0, 1e-10, 6);
        assert!(!result.converged());
        assert_eq!(result.iterations().len(), 6);
        assert!(result.scalar().is_some());
        assert_err_contains(&result, "maximum number of iterations");
    }

    #[test]
    fn domain_error_stops_iteration() {
        let log = |x: f64| {
            if x > 0.0 {
                Ok(x.ln())
            } else {
                Err(EvalError::OutOfDomain {
                    function: "log",
                    argument: x,
                })
            }
        };
        let result = bisection(&log, -1.0, 2.0, 1e-6, 50);
        assert!(matches!(result.error(), Some(SolveError::Domain(_))));
        assert!(result.result().is_none());
    }

    #[test]
    fn solve_dispatches_on_method() {
        let request = RootRequest {
            method: RootMethod::Newton { x0: 2.0 },
            settings: IterationSettings::default(),
        };
        let result = solve(&cubic, &request);
        assert!(result.converged());
        assert!(matches!(
            result.iterations()[0],
            IterationRecord::Newton(_)
        ));
    }

    #[test]
    fn repeated_calls_are_identical() {
        assert_eq!(
            bisection(&cubic, 2.0, 3.0, 1e-4, 50),
            bisection(&cubic, 2.0, 3.0, 1e-4, 50)
        );
        assert_eq!(newton(&cubic, 2.0, 1e-4, 50), newton(&cubic, 2.0, 1e-4, 50));
    }
}
