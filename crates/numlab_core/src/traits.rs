use crate::error::EvalError;
use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types the expression VM can compute with.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A real function of one variable that the solvers can sample.
pub trait ScalarFunction {
    /// Evaluates the function at `x`.
    fn value_at(&self, x: f64) -> Result<f64, EvalError>;
}

/// Closures can be passed to any solver directly.
impl<F> ScalarFunction for F
where
    F: Fn(f64) -> Result<f64, EvalError>,
{
    fn value_at(&self, x: f64) -> Result<f64, EvalError> {
        self(x)
    }
}

/// Evaluates textual `f(x)` expressions.
///
/// `validate` is meant for callers that want to reject an expression up front;
/// the solvers themselves only ever call `evaluate`.
pub trait ExpressionEvaluator {
    /// Evaluates `expression` with the free variable `x` bound to `x`.
    fn evaluate(&self, expression: &str, x: f64) -> Result<f64, EvalError>;

    /// Returns true if `expression` is well formed.
    fn validate(&self, expression: &str) -> bool;

    /// Pairs the evaluator with an expression so it can be handed to a solver.
    fn bind<'a>(&'a self, expression: &'a str) -> BoundExpression<'a, Self>
    where
        Self: Sized,
    {
        BoundExpression {
            evaluator: self,
            expression,
        }
    }
}

/// An evaluator together with the expression it should evaluate.
#[derive(Debug, Clone, Copy)]
pub struct BoundExpression<'a, E> {
    evaluator: &'a E,
    expression: &'a str,
}

impl<E: ExpressionEvaluator> ScalarFunction for BoundExpression<'_, E> {
    fn value_at(&self, x: f64) -> Result<f64, EvalError> {
        self.evaluator.evaluate(self.expression, x)
    }
}
