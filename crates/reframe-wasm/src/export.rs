//! Export screen helpers.

use reframe_core::export;
use wasm_bindgen::prelude::*;

/// Human readable size for a byte count, e.g. `"1.5 KB"`.
///
/// Zero, negative or non-finite input reads as `"Unknown size"`.
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    let bytes = if bytes.is_finite() && bytes > 0.0 {
        bytes as u64
    } else {
        0
    };
    export::format_file_size(bytes)
}

/// Rough encoded size in kilobytes for a `width` x `height` image.
#[wasm_bindgen]
pub fn estimated_size_kb(width: u32, height: u32) -> f64 {
    export::estimated_size_kb(width, height) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(1536.0), "1.5 KB");
        assert_eq!(format_file_size(0.0), "Unknown size");
        assert_eq!(format_file_size(-5.0), "Unknown size");
        assert_eq!(format_file_size(f64::NAN), "Unknown size");
    }

    #[test]
    fn test_estimated_size_kb() {
        assert_eq!(estimated_size_kb(1920, 1080), 2074.0);
    }
}
