//! Composite Newton-Cotes quadrature.

use crate::error::SolveError;
use crate::result::MethodResult;
use crate::settings::{QuadratureRequest, QuadratureRule};
use crate::traits::ScalarFunction;
use tracing::debug;

impl QuadratureRule {
    /// Approximates the integral of `f` over `[a, b]` with `n` subintervals.
    ///
    /// `n` must already be validated for the rule.
    fn apply<F: ScalarFunction + ?Sized>(
        self,
        f: &F,
        a: f64,
        b: f64,
        n: usize,
    ) -> Result<f64, SolveError> {
        let h = (b - a) / n as f64;
        match self {
            QuadratureRule::Trapezoidal => {
                let mut sum = 0.5 * (f.value_at(a)? + f.value_at(b)?);
                for i in 1..n {
                    sum += f.value_at(a + i as f64 * h)?;
                }
                Ok(sum * h)
            }
            QuadratureRule::Simpson => {
                let mut sum = f.value_at(a)? + f.value_at(b)?;
                for i in 1..n {
                    let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
                    sum += weight * f.value_at(a + i as f64 * h)?;
                }
                Ok(h / 3.0 * sum)
            }
        }
    }

    fn check_subintervals(self, n: usize) -> Result<(), SolveError> {
        if n == 0 {
            return Err(SolveError::invalid_input(
                "number of subintervals must be positive",
            ));
        }
        if self == QuadratureRule::Simpson && n % 2 != 0 {
            return Err(SolveError::invalid_input(format!(
                "Simpson's rule needs an even number of subintervals, got {n}"
            )));
        }
        Ok(())
    }
}

/// Composite trapezoidal rule. Requires `n >= 1`.
pub fn composite_trapezoidal<F: ScalarFunction + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> MethodResult {
    quadrature(f, QuadratureRule::Trapezoidal, a, b, n)
}

/// Composite Simpson rule. Requires `n >= 1` and even.
pub fn composite_simpson<F: ScalarFunction + ?Sized>(
    f: &F,
    a: f64,
    b: f64,
    n: usize,
) -> MethodResult {
    quadrature(f, QuadratureRule::Simpson, a, b, n)
}

/// Runs the rule selected by `request`.
pub fn integrate<F: ScalarFunction + ?Sized>(f: &F, request: &QuadratureRequest) -> MethodResult {
    match usize::try_from(request.subintervals) {
        Ok(n) => quadrature(f, request.rule, request.a, request.b, n),
        Err(_) => MethodResult::failure(SolveError::invalid_input(format!(
            "number of subintervals must be positive, got {}",
            request.subintervals
        ))),
    }
}

fn quadrature<F: ScalarFunction + ?Sized>(
    f: &F,
    rule: QuadratureRule,
    a: f64,
    b: f64,
    n: usize,
) -> MethodResult {
    MethodResult::from_direct(run_quadrature(f, rule, a, b, n).map(Into::into))
}

fn run_quadrature<F: ScalarFunction + ?Sized>(
    f: &F,
    rule: QuadratureRule,
    a: f64,
    b: f64,
    n: usize,
) -> Result<f64, SolveError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(SolveError::invalid_input(format!(
            "integration bounds must be finite, got [{a}, {b}]"
        )));
    }
    rule.check_subintervals(n)?;
    let value = rule.apply(f, a, b, n)?;
    debug!(?rule, a, b, n, value, "quadrature");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use approx::assert_abs_diff_eq;

    fn square(x: f64) -> Result<f64, EvalError> {
        Ok(x * x)
    }

    #[test]
    fn simpson_is_exact_for_cubics() {
        let cubic = |x: f64| -> Result<f64, EvalError> {
            Ok(4.0 * x * x * x - 3.0 * x * x + 2.0)
        };
        // Antiderivative x^4 - x^3 + 2x over [-1, 2]: (16 - 8 + 4) - (1 + 1 - 2) = 12.
        let result = composite_simpson(&cubic, -1.0, 2.0, 2);
        assert_abs_diff_eq!(result.scalar().unwrap(), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn trapezoidal_overestimates_convex_integrand() {
        let trapezoidal = composite_trapezoidal(&square, 0.0, 1.0, 10);
        let simpson = composite_simpson(&square, 0.0, 1.0, 10);

        assert_abs_diff_eq!(trapezoidal.scalar().unwrap(), 0.335, epsilon = 1e-12);
        assert_abs_diff_eq!(simpson.scalar().unwrap(), 1.0 / 3.0, epsilon = 1e-12);
        assert!(trapezoidal.converged() && simpson.converged());
    }

    #[test]
    fn reversed_bounds_flip_the_sign() {
        let result = composite_simpson(&square, 1.0, 0.0, 4);
        assert_abs_diff_eq!(result.scalar().unwrap(), -1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn rejects_invalid_subinterval_counts() {
        for result in [
            composite_trapezoidal(&square, 0.0, 1.0, 0),
            composite_simpson(&square, 0.0, 1.0, 0),
            composite_simpson(&square, 0.0, 1.0, 3),
        ] {
            assert!(!result.converged());
            assert!(result.result().is_none());
            assert!(matches!(result.error(), Some(SolveError::InputValidity(_))));
        }
        assert!(composite_trapezoidal(&square, 0.0, 1.0, 3).converged());
    }

    #[test]
    fn integrate_rejects_negative_counts() {
        let request = QuadratureRequest {
            subintervals: -4,
            ..QuadratureRequest::default()
        };
        let result = integrate(&square, &request);
        let message = result.error().expect("should fail").to_string();
        assert!(message.contains("-4"), "unexpected message: {message}");
    }

    #[test]
    fn evaluation_failure_inside_range_is_reported() {
        let reciprocal = |x: f64| {
            if x == 0.0 {
                Err(EvalError::DivisionByZero)
            } else {
                Ok(1.0 / x)
            }
        };
        let result = composite_trapezoidal(&reciprocal, -1.0, 1.0, 2);
        assert_eq!(
            result.error(),
            Some(&SolveError::Domain(EvalError::DivisionByZero))
        );
    }
}
