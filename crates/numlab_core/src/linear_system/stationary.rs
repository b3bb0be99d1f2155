use super::{is_diagonally_dominant, validate_system};
use crate::error::SolveError;
use crate::result::{LinearIterStep, MethodResult, Termination, Trace};
use crate::settings::{validate_tolerance, PIVOT_EPSILON};
use nalgebra::{DMatrix, DVector};
use tracing::{debug, info, warn};

/// How a sweep feeds new components back into the iterate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateScheme {
    /// Every component is computed from the previous iterate (Jacobi).
    Synchronous,
    /// Each component is overwritten as soon as it is computed (Gauss-Seidel).
    InPlace,
}

impl UpdateScheme {
    fn name(self) -> &'static str {
        match self {
            UpdateScheme::Synchronous => "jacobi",
            UpdateScheme::InPlace => "gauss_seidel",
        }
    }
}

/// Jacobi iteration from the zero vector.
///
/// Stops when the largest component change of a sweep drops below `tolerance`.
pub fn jacobi(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    tolerance: f64,
    max_iterations: usize,
) -> MethodResult {
    stationary(a, b, UpdateScheme::Synchronous, tolerance, max_iterations)
}

/// Gauss-Seidel iteration from the zero vector. Same stopping rule as [`jacobi`].
pub fn gauss_seidel(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    tolerance: f64,
    max_iterations: usize,
) -> MethodResult {
    stationary(a, b, UpdateScheme::InPlace, tolerance, max_iterations)
}

fn stationary(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    scheme: UpdateScheme,
    tolerance: f64,
    max_iterations: usize,
) -> MethodResult {
    let method = scheme.name();
    let mut trace = Trace::default();
    let outcome = iterate(a, b, scheme, tolerance, max_iterations, &mut trace);
    match &outcome {
        Ok(Termination::Converged(_)) => info!(method, iterations = trace.len(), "converged"),
        Ok(Termination::Exhausted(_)) => {
            warn!(method, iterations = trace.len(), "iteration budget exhausted")
        }
        Err(error) => warn!(method, %error, "linear iteration failed"),
    }
    MethodResult::from_iterative(outcome, trace)
}

fn iterate(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    scheme: UpdateScheme,
    tolerance: f64,
    max_iterations: usize,
    trace: &mut Trace,
) -> Result<Termination, SolveError> {
    validate_system(a, b)?;
    validate_tolerance(tolerance).map_err(SolveError::invalid_input)?;
    check_diagonal(a)?;
    if !is_diagonally_dominant(a) {
        warn!(
            method = scheme.name(),
            "matrix is not diagonally dominant; iteration may diverge"
        );
    }

    let mut x = WorkingVector::zeros(a.nrows());
    for iteration in 1..=max_iterations {
        let max_diff = x.sweep(a, b, scheme);
        trace.push(LinearIterStep {
            iteration,
            x: x.current.clone(),
            max_diff,
        });
        debug!(method = scheme.name(), iteration, max_diff, "sweep");

        if max_diff < tolerance {
            return Ok(Termination::Converged(x.current.into()));
        }
    }

    Ok(Termination::Exhausted(x.current.into()))
}

fn check_diagonal(a: &DMatrix<f64>) -> Result<(), SolveError> {
    match a
        .diagonal()
        .iter()
        .position(|value| value.abs() < PIVOT_EPSILON)
    {
        Some(row) => Err(SolveError::SingularMatrix {
            row,
            magnitude: a[(row, row)].abs(),
        }),
        None => Ok(()),
    }
}

/// Current iterate plus scratch space for synchronous sweeps.
struct WorkingVector {
    current: Vec<f64>,
    scratch: Vec<f64>,
}

impl WorkingVector {
    fn zeros(n: usize) -> Self {
        Self {
            current: vec![0.0; n],
            scratch: vec![0.0; n],
        }
    }

    /// Performs one sweep and returns the largest `|x_new_i - x_old_i|`.
    fn sweep(&mut self, a: &DMatrix<f64>, b: &DVector<f64>, scheme: UpdateScheme) -> f64 {
        let n = self.current.len();
        let mut max_diff = 0.0_f64;
        match scheme {
            UpdateScheme::Synchronous => {
                for i in 0..n {
                    let updated = row_update(a, b, &self.current, i);
                    max_diff = widen(max_diff, (updated - self.current[i]).abs());
                    self.scratch[i] = updated;
                }
                std::mem::swap(&mut self.current, &mut self.scratch);
            }
            UpdateScheme::InPlace => {
                for i in 0..n {
                    let updated = row_update(a, b, &self.current, i);
                    max_diff = widen(max_diff, (updated - self.current[i]).abs());
                    self.current[i] = updated;
                }
            }
        }
        max_diff
    }
}

/// Running maximum that keeps NaN once seen, so an overflowed iterate never passes the
/// tolerance test.
fn widen(max_diff: f64, diff: f64) -> f64 {
    if diff.is_nan() || diff > max_diff {
        diff
    } else {
        max_diff
    }
}

/// `(b_i - sum_{j != i} a_ij x_j) / a_ii`
fn row_update(a: &DMatrix<f64>, b: &DVector<f64>, x: &[f64], i: usize) -> f64 {
    let sum: f64 = (0..x.len())
        .filter(|&j| j != i)
        .map(|j| a[(i, j)] * x[j])
        .sum();
    (b[i] - sum) / a[(i, i)]
}
