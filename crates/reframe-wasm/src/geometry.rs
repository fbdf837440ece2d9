//! Geometry bindings used while the user edits resize and crop parameters.
//!
//! These run on every keystroke or drag so the UI can show the resolved
//! values before anything is applied.

use crate::types::{geometry_error, serde_error};
use reframe_core::geometry::{self, AspectRatio, Rect};
use wasm_bindgen::prelude::*;

/// The other side of an aspect-locked pair.
///
/// # Arguments
/// * `known_value` - The side the user typed
/// * `known_is_width` - Whether `known_value` is the width
/// * `aspect_ratio` - width / height
#[wasm_bindgen]
pub fn locked_dimension(
    known_value: i32,
    known_is_width: bool,
    aspect_ratio: f64,
) -> Result<u32, JsValue> {
    let aspect = AspectRatio::new(aspect_ratio).map_err(geometry_error)?;
    geometry::locked_dimension(i64::from(known_value), known_is_width, aspect)
        .map_err(geometry_error)
}

/// Parse a dimension text field into a positive pixel count.
#[wasm_bindgen]
pub fn parse_dimension(text: &str) -> Result<u32, JsValue> {
    geometry::parse_dimension(text).map_err(geometry_error)
}

/// Scale both sides by `percent` (10 to 500).
///
/// Returns `{ width, height }`.
#[wasm_bindgen]
pub fn resolve_percent_scale(width: u32, height: u32, percent: u32) -> Result<JsValue, JsValue> {
    let dimensions =
        geometry::resolve_percent_scale(width, height, percent).map_err(geometry_error)?;
    serde_wasm_bindgen::to_value(&dimensions).map_err(serde_error)
}

/// Largest centered rectangle of `ratio` inside the source, or the full
/// source when `ratio` is undefined.
///
/// Returns `{ originX, originY, width, height }`.
#[wasm_bindgen]
pub fn fit_crop_to_ratio(
    source_width: u32,
    source_height: u32,
    ratio: Option<f64>,
) -> Result<JsValue, JsValue> {
    let rect = geometry::fit_crop_to_ratio(source_width, source_height, ratio)
        .map_err(geometry_error)?;
    serde_wasm_bindgen::to_value(&rect).map_err(serde_error)
}

/// Clip a dragged rectangle to the source bounds.
///
/// Returns `{ originX, originY, width, height }`.
#[wasm_bindgen]
pub fn clamp_crop_rect(
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    source_width: u32,
    source_height: u32,
) -> Result<JsValue, JsValue> {
    let rect = Rect {
        x: i64::from(x),
        y: i64::from(y),
        width: i64::from(width),
        height: i64::from(height),
    };
    let clamped =
        geometry::clamp_crop_rect(rect, source_width, source_height).map_err(geometry_error)?;
    serde_wasm_bindgen::to_value(&clamped).map_err(serde_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Only the success paths are safe off wasm32: building a JS error panics.

    #[test]
    fn test_locked_dimension() {
        assert_eq!(locked_dimension(540, true, 1080.0 / 1920.0).ok(), Some(960));
        assert_eq!(
            locked_dimension(960, false, 1080.0 / 1920.0).ok(),
            Some(540)
        );
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("1080").ok(), Some(1080));
        assert_eq!(parse_dimension("720px").ok(), Some(720));
    }
}
