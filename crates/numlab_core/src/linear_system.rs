//! Dense linear systems `A x = b`.
//!
//! All solvers take `A` and `b` by reference and never modify them; each call works on
//! its own copy.
//!
//! # Solvers
//!
//! - [`gauss_elimination`]: direct, partial pivoting, no trace
//! - [`jacobi`]: stationary iteration, synchronous update
//! - [`gauss_seidel`]: stationary iteration, in-place update

mod elimination;
mod stationary;

pub use elimination::gauss_elimination;
pub use stationary::{gauss_seidel, jacobi, UpdateScheme};

use crate::error::SolveError;
use crate::result::MethodResult;
use crate::settings::{LinearMethod, LinearRequest};
use nalgebra::{DMatrix, DVector};

/// Runs the method selected by `request`.
pub fn solve(a: &DMatrix<f64>, b: &DVector<f64>, request: &LinearRequest) -> MethodResult {
    let settings = &request.settings;
    match request.method {
        LinearMethod::Gauss => gauss_elimination(a, b),
        LinearMethod::Jacobi => jacobi(a, b, settings.tolerance, settings.max_iterations),
        LinearMethod::GaussSeidel => {
            gauss_seidel(a, b, settings.tolerance, settings.max_iterations)
        }
    }
}

/// Builds a square matrix from row-major data, checking that `data` holds `n * n` entries.
pub fn matrix_from_row_slice(n: usize, data: &[f64]) -> Result<DMatrix<f64>, SolveError> {
    if data.len() != n * n {
        return Err(SolveError::invalid_input(format!(
            "expected {} matrix entries for a {n}x{n} system, got {}",
            n * n,
            data.len()
        )));
    }
    Ok(DMatrix::from_row_slice(n, n, data))
}

/// Builds a matrix from nested rows, checking that every row has the same length as
/// the number of rows.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<DMatrix<f64>, SolveError> {
    let n = rows.len();
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
        return Err(SolveError::invalid_input(format!(
            "matrix must be square: row {i} has {} entries, expected {n}",
            row.len()
        )));
    }
    Ok(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
}

/// True if `|a_ii| >= sum_{j != i} |a_ij|` holds for every row.
///
/// Sufficient, not necessary, for Jacobi and Gauss-Seidel to converge.
pub fn is_diagonally_dominant(a: &DMatrix<f64>) -> bool {
    a.row_iter().enumerate().all(|(i, row)| {
        let off_diagonal: f64 = row
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, value)| value.abs())
            .sum();
        row[(0, i)].abs() >= off_diagonal
    })
}

/// Checks shape and finiteness of a system before any solver touches it.
fn validate_system(a: &DMatrix<f64>, b: &DVector<f64>) -> Result<(), SolveError> {
    if !a.is_square() {
        return Err(SolveError::invalid_input(format!(
            "matrix must be square, got {}x{}",
            a.nrows(),
            a.ncols()
        )));
    }
    let n = a.nrows();
    if n < 2 {
        return Err(SolveError::invalid_input(format!(
            "system must have at least 2 unknowns, got {n}"
        )));
    }
    if b.len() != n {
        return Err(SolveError::invalid_input(format!(
            "right-hand side has {} entries, expected {n}",
            b.len()
        )));
    }
    if a.iter().chain(b.iter()).any(|value| !value.is_finite()) {
        return Err(SolveError::invalid_input(
            "matrix and right-hand side must be finite",
        ));
    }
    Ok(())
}
