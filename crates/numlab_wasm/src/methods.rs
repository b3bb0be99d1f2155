//! Scalar-function methods: root finding, quadrature and finite differences.

use crate::marshal::{decode_request, decode_required, encode, to_js_error};
use numlab_core::equation_engine::{compile, CompiledExpression};
use numlab_core::settings::{DifferenceRequest, QuadratureRequest, RootRequest};
use numlab_core::{differentiation, integration, root_finding, MethodResult, SolveError};
use wasm_bindgen::prelude::*;

/// Runs bisection or Newton on `expression`.
///
/// `request` is `{ method: "bisection", a, b }` or `{ method: "newton", x0 }`, plus optional
/// `tolerance` and `maxIterations`.
#[wasm_bindgen]
pub fn find_root(expression: &str, request: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let request: RootRequest = decode_required(request).map_err(to_js_error)?;
    encode(&run_root(expression, &request)).map_err(to_js_error)
}

/// Integrates `expression` with the trapezoidal or Simpson rule.
#[wasm_bindgen]
pub fn integrate(expression: &str, request: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let request: QuadratureRequest = decode_request(request).map_err(to_js_error)?;
    encode(&run_quadrature(expression, &request)).map_err(to_js_error)
}

/// Estimates the derivative of `expression` with a finite difference.
#[wasm_bindgen]
pub fn differentiate(expression: &str, request: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let request: DifferenceRequest = decode_request(request).map_err(to_js_error)?;
    encode(&run_difference(expression, &request)).map_err(to_js_error)
}

pub(crate) fn run_root(expression: &str, request: &RootRequest) -> MethodResult {
    with_compiled(expression, |f| root_finding::solve(f, request))
}

pub(crate) fn run_quadrature(expression: &str, request: &QuadratureRequest) -> MethodResult {
    with_compiled(expression, |f| integration::integrate(f, request))
}

pub(crate) fn run_difference(expression: &str, request: &DifferenceRequest) -> MethodResult {
    with_compiled(expression, |f| differentiation::differentiate(f, request))
}

/// Compiles once, then hands the expression to `solve`. Parse errors become failed results.
fn with_compiled(
    expression: &str,
    solve: impl FnOnce(&CompiledExpression) -> MethodResult,
) -> MethodResult {
    match compile(expression) {
        Ok(f) => solve(&f),
        Err(error) => MethodResult::failure(SolveError::Domain(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use numlab_core::settings::{IterationSettings, QuadratureRule, RootMethod};

    #[test]
    fn root_request_runs_through_compiled_expression() {
        let request = RootRequest {
            method: RootMethod::Bisection { a: 2.0, b: 3.0 },
            settings: IterationSettings::default(),
        };
        let result = run_root("x^3 - 2*x - 5", &request);
        assert!(result.converged());
        let root = result.scalar().expect("scalar result");
        assert!((root - 2.094551).abs() < 1e-4);
    }

    #[test]
    fn parse_failure_is_reported_in_result() {
        let result = run_quadrature("x +* 2", &QuadratureRequest::default());
        assert!(!result.converged());
        assert!(result.result().is_none());
        assert!(matches!(result.error(), Some(SolveError::Domain(_))));
    }

    #[test]
    fn quadrature_and_difference_use_request_values() {
        let request = QuadratureRequest {
            rule: QuadratureRule::Simpson,
            ..QuadratureRequest::default()
        };
        let area = run_quadrature("x^2", &request).scalar().expect("scalar result");
        assert!((area - 1.0 / 3.0).abs() < 1e-12);

        let slope = run_difference("x^2", &DifferenceRequest::default())
            .scalar()
            .expect("scalar result");
        assert!((slope - 2.0).abs() < 1e-9);
    }
}
