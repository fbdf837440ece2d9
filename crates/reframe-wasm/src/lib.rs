//! Reframe WASM - WebAssembly bindings for Reframe
//!
//! This crate exposes reframe-core to the JavaScript/TypeScript editor UI.
//!
//! # Module Structure
//!
//! - `session` - `JsEditSession`, the live history and operation dispatch
//! - `geometry` - Resize and crop helpers for live previews
//! - `presets` - Preset size and crop ratio tables
//! - `recent` - Recent-files list policy
//! - `export` - Export screen helpers
//! - `types` - Wrapper types and error conversion
//! - `logger` - Browser console backend for `log`
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsEditSession, JsImageDescriptor } from '@reframe/wasm';
//!
//! await init();
//!
//! const image = new JsImageDescriptor(uri, width, height, 'jpeg');
//! const session = new JsEditSession(image);
//! ```
//!
//! Errors are thrown as `Error` objects whose `name` is the error kind, e.g.
//! `"InvalidDimension"`, `"OutOfRange"`, `"MissingMatteColor"`.

use wasm_bindgen::prelude::*;

mod export;
mod geometry;
mod logger;
mod presets;
mod recent;
mod session;
mod types;

// Re-export public types
pub use export::{estimated_size_kb, format_file_size};
pub use geometry::{
    clamp_crop_rect, fit_crop_to_ratio, locked_dimension, parse_dimension, resolve_percent_scale,
};
pub use logger::set_log_level;
pub use presets::{common_resolutions, crop_ratio_value, crop_ratios, find_preset, social_presets};
pub use recent::JsRecentFiles;
pub use session::{JsEditSession, JsPendingOperation};
pub use types::{parse_color, JsImageDescriptor};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install();
    log::info!("reframe-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
