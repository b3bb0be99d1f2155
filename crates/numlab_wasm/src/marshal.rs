//! JS <-> Rust conversions shared by the bindings.

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::JsValue;

/// Deserialises a request object. `undefined` and `null` fall back to the defaults.
pub(crate) fn decode_request<T: DeserializeOwned + Default>(request: JsValue) -> Result<T> {
    if request.is_undefined() || request.is_null() {
        return Ok(T::default());
    }
    decode_required(request)
}

/// Deserialises a request object that has no sensible default.
pub(crate) fn decode_required<T: DeserializeOwned>(request: JsValue) -> Result<T> {
    from_value(request).map_err(|e| anyhow!("invalid request: {e}"))
}

/// Serialises to plain JS objects, with `null` for missing values.
///
/// Iteration records serialise as maps, which would otherwise become JS `Map`s.
pub(crate) fn encode<T: Serialize>(value: &T) -> Result<JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(|e| anyhow!("Serialization error: {e}"))
}

pub(crate) fn to_js_error(error: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{error:#}"))
}
