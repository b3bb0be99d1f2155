pub mod differentiation;
pub mod equation_engine;
pub mod error;
pub mod integration;
pub mod linear_system;
pub mod result;
pub mod root_finding;
pub mod settings;
/// The `numlab_core` crate holds the numerical methods behind the numlab front end.
/// Every solver is a pure function: it takes its inputs by reference, works on its own
/// copies and returns a [`result::MethodResult`] carrying the value, the convergence flag,
/// the iteration trace and an optional error.
///
/// Key components:
/// - **Traits**: `Scalar` (numeric type abstraction), `ScalarFunction` (anything that can be
///   sampled at a point), `ExpressionEvaluator` (text in, value out).
/// - **Equation Engine**: tokenizer, parser, bytecode compiler and stack VM for `f(x)` expressions.
/// - **Root finding**: bisection and Newton iteration.
/// - **Linear systems**: Gauss elimination with partial pivoting, Jacobi and Gauss-Seidel.
/// - **Integration / Differentiation**: composite trapezoidal and Simpson rules, finite differences.
pub mod traits;

pub use error::{EvalError, SolveError};
pub use result::{IterationRecord, MethodResult, Solution};
pub use traits::{ExpressionEvaluator, ScalarFunction};
