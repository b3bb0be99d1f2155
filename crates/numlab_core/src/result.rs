//! The result protocol shared by every solver.
//!
//! A solve call produces exactly one [`MethodResult`]. Iterative methods append one
//! [`IterationRecord`] per step to its trace; direct methods leave the trace empty.

use crate::error::SolveError;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::borrow::Cow;
use std::mem::discriminant;

/// The value produced by a solver.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Solution {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Solution {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Solution::Scalar(value) => Some(*value),
            Solution::Vector(_) => None,
        }
    }

    pub fn as_vector(&self) -> Option<&[f64]> {
        match self {
            Solution::Scalar(_) => None,
            Solution::Vector(values) => Some(values),
        }
    }
}

impl From<f64> for Solution {
    fn from(value: f64) -> Self {
        Solution::Scalar(value)
    }
}

impl From<Vec<f64>> for Solution {
    fn from(values: Vec<f64>) -> Self {
        Solution::Vector(values)
    }
}

/// One bisection step: the bracket, its midpoint and the bracket width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BisectionStep {
    pub iteration: usize,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub fc: f64,
    /// `|b - a|` before the bracket is halved.
    pub width: f64,
}

/// One Newton step, recorded before the update is applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonStep {
    pub iteration: usize,
    pub x: f64,
    pub fx: f64,
    pub dfx: f64,
}

/// One Jacobi or Gauss-Seidel sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearIterStep {
    pub iteration: usize,
    /// The iterate after the sweep.
    pub x: Vec<f64>,
    /// Largest component change during the sweep.
    pub max_diff: f64,
}

/// A single entry of an iteration trace.
#[derive(Debug, Clone, PartialEq)]
pub enum IterationRecord {
    Bisection(BisectionStep),
    Newton(NewtonStep),
    Linear(LinearIterStep),
}

impl IterationRecord {
    /// 1-based position of the record in its trace.
    pub fn iteration(&self) -> usize {
        match self {
            IterationRecord::Bisection(step) => step.iteration,
            IterationRecord::Newton(step) => step.iteration,
            IterationRecord::Linear(step) => step.iteration,
        }
    }

    /// The record's named values in display order, without the iteration index.
    ///
    /// Linear steps get generated `x1..xn` labels followed by `maxDiff`.
    pub fn fields(&self) -> Vec<(Cow<'static, str>, f64)> {
        match self {
            IterationRecord::Bisection(step) => vec![
                (Cow::Borrowed("a"), step.a),
                (Cow::Borrowed("b"), step.b),
                (Cow::Borrowed("c"), step.c),
                (Cow::Borrowed("f(c)"), step.fc),
                (Cow::Borrowed("|b-a|"), step.width),
            ],
            IterationRecord::Newton(step) => vec![
                (Cow::Borrowed("x_i"), step.x),
                (Cow::Borrowed("f(x_i)"), step.fx),
                (Cow::Borrowed("f'(x_i)"), step.dfx),
            ],
            IterationRecord::Linear(step) => step
                .x
                .iter()
                .enumerate()
                .map(|(i, &value)| (Cow::Owned(component_label(i)), value))
                .chain(std::iter::once((Cow::Borrowed("maxDiff"), step.max_diff)))
                .collect(),
        }
    }

    /// Looks up a single field by its display label.
    pub fn value(&self, label: &str) -> Option<f64> {
        self.fields()
            .into_iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value)
    }
}

/// Label of the `index`-th (0-based) solution component: `x1`, `x2`, ...
pub fn component_label(index: usize) -> String {
    format!("x{}", index + 1)
}

impl From<BisectionStep> for IterationRecord {
    fn from(step: BisectionStep) -> Self {
        IterationRecord::Bisection(step)
    }
}

impl From<NewtonStep> for IterationRecord {
    fn from(step: NewtonStep) -> Self {
        IterationRecord::Newton(step)
    }
}

impl From<LinearIterStep> for IterationRecord {
    fn from(step: LinearIterStep) -> Self {
        IterationRecord::Linear(step)
    }
}

/// Serialises as a flat row: `{"iteration": 1, "a": .., "f(c)": ..}`.
impl Serialize for IterationRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields();
        let mut map = serializer.serialize_map(Some(fields.len() + 1))?;
        map.serialize_entry("iteration", &self.iteration())?;
        for (label, value) in fields {
            map.serialize_entry(&*label, &value)?;
        }
        map.end()
    }
}

/// Append-only trace of one solve call.
///
/// Indices are 1-based and contiguous, and all records share one variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Trace {
    records: Vec<IterationRecord>,
}

impl Trace {
    pub(crate) fn push(&mut self, record: impl Into<IterationRecord>) {
        let record = record.into();
        debug_assert_eq!(record.iteration(), self.records.len() + 1);
        debug_assert!(self
            .records
            .first()
            .map_or(true, |first| discriminant(first) == discriminant(&record)));
        self.records.push(record);
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

/// How an iterative method stopped when it did not fail outright.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Termination {
    Converged(Solution),
    Exhausted(Solution),
}

/// Outcome of one solver invocation.
///
/// `error` is only ever set together with `converged == false`. A non-convergence
/// error keeps the best-effort `result`; every other error leaves it empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodResult {
    result: Option<Solution>,
    converged: bool,
    iterations: Vec<IterationRecord>,
    #[serde(serialize_with = "serialize_error")]
    error: Option<SolveError>,
}

impl MethodResult {
    /// A result that failed before producing a value.
    pub fn failure(error: SolveError) -> Self {
        Self::failure_with_trace(error, Trace::default())
    }

    pub(crate) fn failure_with_trace(error: SolveError, trace: Trace) -> Self {
        Self {
            result: None,
            converged: false,
            iterations: trace.records,
            error: Some(error),
        }
    }

    /// Wraps the outcome of a direct (non-iterative) method.
    pub(crate) fn from_direct(outcome: Result<Solution, SolveError>) -> Self {
        match outcome {
            Ok(solution) => Self {
                result: Some(solution),
                converged: true,
                iterations: Vec::new(),
                error: None,
            },
            Err(error) => Self::failure(error),
        }
    }

    /// Wraps the outcome of an iterative method together with its trace.
    pub(crate) fn from_iterative(outcome: Result<Termination, SolveError>, trace: Trace) -> Self {
        match outcome {
            Ok(Termination::Converged(solution)) => Self {
                result: Some(solution),
                converged: true,
                iterations: trace.records,
                error: None,
            },
            Ok(Termination::Exhausted(solution)) => Self {
                error: Some(SolveError::NonConvergence {
                    iterations: trace.len(),
                }),
                result: Some(solution),
                converged: false,
                iterations: trace.records,
            },
            Err(error) => Self::failure_with_trace(error, trace),
        }
    }

    pub fn result(&self) -> Option<&Solution> {
        self.result.as_ref()
    }

    /// The result as a scalar, if it is one.
    pub fn scalar(&self) -> Option<f64> {
        self.result.as_ref().and_then(Solution::as_scalar)
    }

    /// The result as a vector, if it is one.
    pub fn vector(&self) -> Option<&[f64]> {
        self.result.as_ref().and_then(Solution::as_vector)
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn iterations(&self) -> &[IterationRecord] {
        &self.iterations
    }

    pub fn error(&self) -> Option<&SolveError> {
        self.error.as_ref()
    }

    /// `(iteration, value)` pairs of one field across the trace, e.g. `maxDiff`.
    ///
    /// Records without the field are skipped, so an unknown label yields an empty series.
    pub fn convergence_series(&self, label: &str) -> Vec<(usize, f64)> {
        self.iterations
            .iter()
            .filter_map(|record| record.value(label).map(|value| (record.iteration(), value)))
            .collect()
    }
}

fn serialize_error<S: Serializer>(
    error: &Option<SolveError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(error) => serializer.serialize_some(&error.to_string()),
        None => serializer.serialize_none(),
    }
}
