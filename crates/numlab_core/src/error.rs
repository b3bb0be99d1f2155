//! Error types shared by the expression engine and the solvers.

use thiserror::Error;

/// Failure to evaluate an expression at a point.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// The expression text could not be tokenized, parsed or compiled.
    #[error("invalid expression: {0}")]
    Parse(String),

    #[error("division by zero")]
    DivisionByZero,

    /// A function was applied outside its domain, e.g. `log(-1)`.
    #[error("{function}({argument}) is undefined")]
    OutOfDomain {
        function: &'static str,
        argument: f64,
    },

    #[error("expression is not finite at x = {x}")]
    NotFinite { x: f64 },

    #[error("malformed bytecode: operand stack underflow")]
    MalformedBytecode,
}

/// Errors reported by the solvers.
///
/// Solvers never return these directly; they are carried inside
/// [`MethodResult`](crate::result::MethodResult) so the caller always gets a result object.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// Bad bracket, bad subinterval count, malformed dimensions or invalid settings.
    #[error("invalid input: {0}")]
    InputValidity(String),

    /// A pivot or diagonal entry fell below the numerical epsilon.
    #[error("matrix is singular or nearly singular: |a[{row}][{row}]| = {magnitude:.3e}")]
    SingularMatrix { row: usize, magnitude: f64 },

    /// Newton's denominator vanished; the iteration cannot continue.
    #[error("derivative is near zero at x = {x} (f'(x) = {derivative:.3e})")]
    DerivativeNearZero { x: f64, derivative: f64 },

    /// The function could not be evaluated at a sampled point.
    #[error("function evaluation failed: {0}")]
    Domain(#[from] EvalError),

    /// The iteration budget ran out before the tolerance was met.
    #[error("maximum number of iterations ({iterations}) reached without convergence")]
    NonConvergence { iterations: usize },
}

impl SolveError {
    pub(crate) fn invalid_input(reason: impl std::fmt::Display) -> Self {
        Self::InputValidity(reason.to_string())
    }
}
