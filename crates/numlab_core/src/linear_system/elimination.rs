use super::validate_system;
use crate::error::SolveError;
use crate::result::MethodResult;
use crate::settings::PIVOT_EPSILON;
use nalgebra::{DMatrix, DVector};
use tracing::{debug, warn};

/// Solves `A x = b` by Gauss elimination with partial pivoting.
///
/// Direct method: the result carries no iteration trace.
pub fn gauss_elimination(a: &DMatrix<f64>, b: &DVector<f64>) -> MethodResult {
    let outcome = eliminate(a, b).map(Into::into);
    if let Err(error) = &outcome {
        warn!(%error, "gauss elimination failed");
    }
    MethodResult::from_direct(outcome)
}

fn eliminate(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<Vec<f64>, SolveError> {
    validate_system(a, b)?;
    let n = a.nrows();

    // Working copy [A | b].
    let mut augmented = DMatrix::from_fn(n, n + 1, |i, j| if j < n { a[(i, j)] } else { b[i] });

    for k in 0..n {
        let pivot = pivot_row(&augmented, k);
        if pivot != k {
            augmented.swap_rows(k, pivot);
        }

        let pivot_value = augmented[(k, k)];
        if pivot_value.abs() < PIVOT_EPSILON {
            return Err(SolveError::SingularMatrix {
                row: k,
                magnitude: pivot_value.abs(),
            });
        }

        for i in (k + 1)..n {
            let factor = augmented[(i, k)] / pivot_value;
            for j in k..=n {
                let delta = factor * augmented[(k, j)];
                augmented[(i, j)] -= delta;
            }
        }
    }

    let x = back_substitute(&augmented)?;

    let residual = (a * DVector::from_column_slice(&x) - b).amax();
    debug!(n, residual, "gauss elimination solved");

    Ok(x)
}

/// Row in `k..n` with the largest `|a_ik|`; the first one wins on ties.
fn pivot_row(augmented: &DMatrix<f64>, k: usize) -> usize {
    let mut pivot = k;
    for i in (k + 1)..augmented.nrows() {
        if augmented[(i, k)].abs() > augmented[(pivot, k)].abs() {
            pivot = i;
        }
    }
    pivot
}

/// Solves the upper-triangular system held in the first `n` columns of `augmented`.
fn back_substitute(augmented: &DMatrix<f64>) -> Result<Vec<f64>, SolveError> {
    let n = augmented.nrows();
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| augmented[(i, j)] * x[j]).sum();
        let diagonal = augmented[(i, i)];
        if diagonal.abs() < PIVOT_EPSILON {
            return Err(SolveError::SingularMatrix {
                row: i,
                magnitude: diagonal.abs(),
            });
        }
        x[i] = (augmented[(i, n)] - sum) / diagonal;
    }
    Ok(x)
}
