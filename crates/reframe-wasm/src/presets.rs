//! Preset tables for the resize and crop panels.

use crate::types::serde_error;
use reframe_core::presets::{
    find_crop_ratio, find_dimension_preset, COMMON_RESOLUTIONS, CROP_RATIOS, SOCIAL_PRESETS,
};
use wasm_bindgen::prelude::*;

/// Social media sizes as `[{ name, width, height }]`.
#[wasm_bindgen]
pub fn social_presets() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&SOCIAL_PRESETS).map_err(serde_error)
}

/// Common screen resolutions as `[{ name, width, height }]`.
#[wasm_bindgen]
pub fn common_resolutions() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&COMMON_RESOLUTIONS).map_err(serde_error)
}

/// Crop ratios as `[{ name, ratio }]`; `ratio` is null for free-form.
#[wasm_bindgen]
pub fn crop_ratios() -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&CROP_RATIOS).map_err(serde_error)
}

/// Look up a dimension preset by name, or `undefined`.
#[wasm_bindgen]
pub fn find_preset(name: &str) -> Result<JsValue, JsValue> {
    match find_dimension_preset(name) {
        Some(preset) => serde_wasm_bindgen::to_value(preset).map_err(serde_error),
        None => Ok(JsValue::UNDEFINED),
    }
}

/// Ratio for a named crop preset. `undefined` for free-form or unknown names.
#[wasm_bindgen]
pub fn crop_ratio_value(name: &str) -> Option<f64> {
    find_crop_ratio(name).and_then(|preset| preset.ratio)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_social_presets_array() {
        let value = social_presets().unwrap();
        let array: js_sys::Array = value.into();
        assert_eq!(array.length(), 6);
    }

    #[wasm_bindgen_test]
    fn test_find_preset_unknown_is_undefined() {
        assert!(find_preset("Myspace Banner").unwrap().is_undefined());
    }
}
