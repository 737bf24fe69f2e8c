//! WebAssembly module for the crop advisory service
//!
//! Provides client-side computation for:
//! - Crop category lookup
//! - Suitability of a declared crop against a recommendation
//! - Revenue projection
//! - Offline request validation

use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::validation::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("crop advisory module loaded"));
}

/// Category of a crop name (`cereals`, `legumes`, `fruits`, `cash_crops` or `unclassified`)
#[wasm_bindgen]
pub fn crop_category(crop_name: &str) -> String {
    classify_crop(crop_name).to_string()
}

/// Suitability factor of the declared crop given the recommended one
#[wasm_bindgen]
pub fn suitability_factor(declared_crop: &str, recommended_crop: &str) -> f64 {
    evaluate_suitability(declared_crop, recommended_crop).value()
}

/// Projected revenue for one yield estimate
#[wasm_bindgen]
pub fn project_revenue(
    yield_prediction: f64,
    plot_size: f64,
    price: f64,
    declared_crop: &str,
    recommended_crop: &str,
) -> f64 {
    let factor = evaluate_suitability(declared_crop, recommended_crop);
    estimate_revenue(yield_prediction, plot_size, price, factor.value())
}

/// Check a prediction request before sending it.
///
/// Returns the name of the first missing field, or `undefined` when the
/// request is complete.
#[wasm_bindgen]
pub fn missing_request_field(request_json: &str) -> Result<Option<String>, JsValue> {
    let request: PredictionRequest = serde_json::from_str(request_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid request JSON: {}", e)))?;

    Ok(validate_observation(&request)
        .err()
        .map(|missing| missing.field.to_string()))
}
