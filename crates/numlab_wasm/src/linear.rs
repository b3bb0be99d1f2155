//! Linear system binding.

use crate::marshal::{decode_request, encode, to_js_error};
use nalgebra::DVector;
use numlab_core::linear_system::{self, matrix_from_row_slice};
use numlab_core::settings::LinearRequest;
use numlab_core::MethodResult;
use wasm_bindgen::prelude::*;

/// Solves the `n x n` system given by row-major `matrix` and right-hand side `rhs`.
///
/// `request` selects `{ method: "gauss" | "jacobi" | "gauss_seidel" }` plus optional
/// `tolerance` and `maxIterations`; a missing request runs Gauss elimination.
#[wasm_bindgen]
pub fn solve_linear_system(
    n: u32,
    matrix: Vec<f64>,
    rhs: Vec<f64>,
    request: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let request: LinearRequest = decode_request(request).map_err(to_js_error)?;
    encode(&run_linear_system(n as usize, &matrix, rhs, &request)).map_err(to_js_error)
}

pub(crate) fn run_linear_system(
    n: usize,
    matrix: &[f64],
    rhs: Vec<f64>,
    request: &LinearRequest,
) -> MethodResult {
    match matrix_from_row_slice(n, matrix) {
        Ok(a) => linear_system::solve(&a, &DVector::from_vec(rhs), request),
        Err(error) => MethodResult::failure(error),
    }
}
