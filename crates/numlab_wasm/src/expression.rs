//! Expression helpers for the input form.

use numlab_core::equation_engine::ExpressionEngine;
use numlab_core::traits::ExpressionEvaluator;
use wasm_bindgen::prelude::*;

/// True if `expression` parses and compiles as a function of `x`.
#[wasm_bindgen]
pub fn validate_expression(expression: &str) -> bool {
    ExpressionEngine.validate(expression)
}

/// Evaluates `expression` at `x`, e.g. for plotting.
#[wasm_bindgen]
pub fn evaluate_expression(expression: &str, x: f64) -> Result<f64, JsValue> {
    ExpressionEngine
        .evaluate(expression, x)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
