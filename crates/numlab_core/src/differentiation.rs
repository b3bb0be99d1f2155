//! Finite-difference derivative estimates.

use crate::error::{EvalError, SolveError};
use crate::result::MethodResult;
use crate::settings::{DifferenceRequest, DifferenceScheme};
use crate::traits::ScalarFunction;
use tracing::debug;

impl DifferenceScheme {
    /// Estimates `f'(x0)` with step `h`.
    ///
    /// Forward and backward differences are first order in `h`, central is second order.
    pub fn estimate<F: ScalarFunction + ?Sized>(
        self,
        f: &F,
        x0: f64,
        h: f64,
    ) -> Result<f64, EvalError> {
        match self {
            DifferenceScheme::Forward => Ok((f.value_at(x0 + h)? - f.value_at(x0)?) / h),
            DifferenceScheme::Backward => Ok((f.value_at(x0)? - f.value_at(x0 - h)?) / h),
            DifferenceScheme::Central => {
                Ok((f.value_at(x0 + h)? - f.value_at(x0 - h)?) / (2.0 * h))
            }
        }
    }
}

/// `(f(x0 + h) - f(x0)) / h`
pub fn forward_difference<F: ScalarFunction + ?Sized>(f: &F, x0: f64, h: f64) -> MethodResult {
    difference(f, DifferenceScheme::Forward, x0, h)
}

/// `(f(x0) - f(x0 - h)) / h`
pub fn backward_difference<F: ScalarFunction + ?Sized>(f: &F, x0: f64, h: f64) -> MethodResult {
    difference(f, DifferenceScheme::Backward, x0, h)
}

/// `(f(x0 + h) - f(x0 - h)) / 2h`
pub fn central_difference<F: ScalarFunction + ?Sized>(f: &F, x0: f64, h: f64) -> MethodResult {
    difference(f, DifferenceScheme::Central, x0, h)
}

/// Runs the scheme selected by `request`.
pub fn differentiate<F: ScalarFunction + ?Sized>(f: &F, request: &DifferenceRequest) -> MethodResult {
    difference(f, request.scheme, request.x0, request.step)
}

fn difference<F: ScalarFunction + ?Sized>(
    f: &F,
    scheme: DifferenceScheme,
    x0: f64,
    h: f64,
) -> MethodResult {
    MethodResult::from_direct(run_difference(f, scheme, x0, h).map(Into::into))
}

fn run_difference<F: ScalarFunction + ?Sized>(
    f: &F,
    scheme: DifferenceScheme,
    x0: f64,
    h: f64,
) -> Result<f64, SolveError> {
    validate_point(x0, h)?;
    let estimate = scheme.estimate(f, x0, h)?;
    debug!(?scheme, x0, h, estimate, "finite difference");
    Ok(estimate)
}

fn validate_point(x0: f64, h: f64) -> Result<(), SolveError> {
    if !x0.is_finite() {
        return Err(SolveError::invalid_input(format!("x0 must be finite, got {x0}")));
    }
    if !h.is_finite() || h == 0.0 {
        return Err(SolveError::invalid_input(format!(
            "step h must be finite and non-zero, got {h}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square(x: f64) -> Result<f64, EvalError> {
        Ok(x * x)
    }

    #[test]
    fn schemes_show_first_and_second_order_error() {
        let forward = forward_difference(&square, 1.0, 1e-3);
        let backward = backward_difference(&square, 1.0, 1e-3);
        let central = central_difference(&square, 1.0, 1e-3);

        assert_abs_diff_eq!(forward.scalar().unwrap(), 2.001, epsilon = 1e-9);
        assert_abs_diff_eq!(backward.scalar().unwrap(), 1.999, epsilon = 1e-9);
        assert_abs_diff_eq!(central.scalar().unwrap(), 2.0, epsilon = 1e-9);
        for result in [forward, backward, central] {
            assert!(result.converged());
            assert!(result.iterations().is_empty());
        }
    }

    #[test]
    fn differentiate_dispatches_on_scheme() {
        let request = DifferenceRequest {
            scheme: DifferenceScheme::Forward,
            x0: 1.0,
            step: 1e-3,
        };
        let result = differentiate(&square, &request);
        assert_abs_diff_eq!(result.scalar().unwrap(), 2.001, epsilon = 1e-9);
    }

    #[test]
    fn evaluation_failure_is_reported_as_domain_error() {
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
        // The backward sample lands on log(0).
        let result = backward_difference(&log, 0.5, 0.5);
        assert!(!result.converged());
        assert!(result.result().is_none());
        assert!(matches!(result.error(), Some(SolveError::Domain(_))));
    }

    #[test]
    fn rejects_zero_step() {
        let result = central_difference(&square, 1.0, 0.0);
        assert!(matches!(result.error(), Some(SolveError::InputValidity(_))));
    }
}
