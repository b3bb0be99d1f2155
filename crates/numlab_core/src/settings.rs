//! Solver settings and per-family requests.
//!
//! Requests deserialize from the front end's JSON (camelCase keys, missing keys take
//! the defaults below) and are dispatched by the `solve`-style entry points of each
//! solver module.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

/// Pivots and diagonal entries below this magnitude are treated as zero.
pub const PIVOT_EPSILON: f64 = 1e-14;

/// Newton gives up when `|f'(x)|` drops below this.
pub const DERIVATIVE_EPSILON: f64 = 1e-14;

/// Bisection stops as soon as `|f(c)|` drops below this, regardless of tolerance.
pub const BISECTION_RESIDUAL_CUTOFF: f64 = 1e-12;

/// Step of the central difference Newton uses for `f'(x)`.
pub const NEWTON_DERIVATIVE_STEP: f64 = 1e-6;

/// Stopping controls shared by every iterative method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IterationSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for IterationSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-4,
            max_iterations: 50,
        }
    }
}

impl IterationSettings {
    /// Validates that the tolerance is finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        validate_tolerance(self.tolerance)
    }
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        bail!("tolerance must be finite and non-negative, got {tolerance}");
    }
    Ok(())
}

/// Root-finding method and its starting data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum RootMethod {
    Bisection { a: f64, b: f64 },
    Newton { x0: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootRequest {
    #[serde(flatten)]
    pub method: RootMethod,
    #[serde(flatten)]
    pub settings: IterationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearMethod {
    #[default]
    Gauss,
    Jacobi,
    GaussSeidel,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearRequest {
    pub method: LinearMethod,
    #[serde(flatten)]
    pub settings: IterationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuadratureRule {
    #[default]
    Trapezoidal,
    Simpson,
}

/// Integration request. `subintervals` is signed so that non-positive counts from the
/// front end reach validation instead of failing to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuadratureRequest {
    pub rule: QuadratureRule,
    pub a: f64,
    pub b: f64,
    pub subintervals: i64,
}

impl Default for QuadratureRequest {
    fn default() -> Self {
        Self {
            rule: QuadratureRule::Trapezoidal,
            a: 0.0,
            b: 1.0,
            subintervals: 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifferenceScheme {
    Forward,
    Backward,
    #[default]
    Central,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DifferenceRequest {
    pub scheme: DifferenceScheme,
    pub x0: f64,
    pub step: f64,
}

impl Default for DifferenceRequest {
    fn default() -> Self {
        Self {
            scheme: DifferenceScheme::Central,
            x0: 1.0,
            step: 1e-3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_request_reads_flat_json_with_defaults() {
        let request: RootRequest =
            serde_json::from_str(r#"{"method": "bisection", "a": 2, "b": 3}"#)
                .expect("should deserialize");
        assert_eq!(request.method, RootMethod::Bisection { a: 2.0, b: 3.0 });
        assert_eq!(request.settings, IterationSettings::default());

        let request: RootRequest = serde_json::from_str(
            r#"{"method": "newton", "x0": 2.0, "tolerance": 1e-8, "maxIterations": 10}"#,
        )
        .expect("should deserialize");
        assert_eq!(request.method, RootMethod::Newton { x0: 2.0 });
        assert_eq!(request.settings.max_iterations, 10);
        assert_eq!(request.settings.tolerance, 1e-8);
    }

    #[test]
    fn linear_request_defaults_to_gauss() {
        let request: LinearRequest = serde_json::from_str("{}").expect("should deserialize");
        assert_eq!(request, LinearRequest::default());

        let request: LinearRequest =
            serde_json::from_str(r#"{"method": "gauss_seidel", "maxIterations": 5}"#)
                .expect("should deserialize");
        assert_eq!(request.method, LinearMethod::GaussSeidel);
        assert_eq!(request.settings.max_iterations, 5);
    }

    #[test]
    fn quadrature_and_difference_requests_take_front_end_defaults() {
        let quadrature: QuadratureRequest =
            serde_json::from_str(r#"{"rule": "simpson"}"#).expect("should deserialize");
        assert_eq!(quadrature.rule, QuadratureRule::Simpson);
        assert_eq!(quadrature.subintervals, 10);

        let difference: DifferenceRequest =
            serde_json::from_str(r#"{"scheme": "forward", "x0": 2}"#).expect("should deserialize");
        assert_eq!(difference.scheme, DifferenceScheme::Forward);
        assert_eq!(difference.step, 1e-3);
    }

    #[test]
    fn rejects_negative_or_non_finite_tolerance() {
        for tolerance in [-1.0, f64::NAN, f64::INFINITY] {
            let settings = IterationSettings {
                tolerance,
                ..IterationSettings::default()
            };
            let err = settings.validate().expect_err("should reject");
            assert!(err.to_string().contains("tolerance"));
        }
        assert!(IterationSettings::default().validate().is_ok());
    }
}
