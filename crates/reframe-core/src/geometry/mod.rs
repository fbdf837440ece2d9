//! Geometry engine: derived dimensions and crop rectangles.
//!
//! Every function in this module is pure. Nothing here touches pixels; the
//! results are parameters that the pipeline hands to the pixel backend.
//!
//! # Coordinate System
//!
//! - Dimensions and rectangles are in source pixels
//! - Origin is the top-left corner
//! - Aspect ratios are `width / height`
//!
//! # Rounding
//!
//! All derived values use round-half-away-from-zero, so a value that lands
//! exactly on `.5` always moves up for positive inputs.

mod crop;
mod resize;

pub use crop::{clamp_crop_rect, fit_crop_to_ratio, CropRect, Rect};
pub use resize::{
    locked_dimension, parse_dimension, resolve_percent_scale, resolve_preset, PERCENT_MAX,
    PERCENT_MIN,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by geometry computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A size was missing, non-numeric, non-positive, or rounded to zero.
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),

    /// A bounded value fell outside its allowed range.
    #[error("{name} {value} is out of range ({min} to {max})")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A crop rectangle has no area left after clamping to the source.
    #[error("Crop region is empty after clamping to {source_width}x{source_height}")]
    EmptyRegion {
        source_width: u32,
        source_height: u32,
    },
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns true when both sides are non-zero.
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Aspect ratio (`width / height`) captured once when a session starts.
///
/// The locked-resize path always divides by this captured value instead of
/// recomputing it from the current image, so repeated locked edits cannot
/// accumulate rounding drift.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio(pub(crate) f64);

impl AspectRatio {
    /// Create an aspect ratio from a raw value.
    ///
    /// Returns `InvalidDimension` for zero, negative or non-finite values.
    pub fn new(ratio: f64) -> Result<Self, GeometryError> {
        if !ratio.is_finite() || ratio <= 0.0 {
            return Err(GeometryError::InvalidDimension(format!(
                "aspect ratio must be a positive number, got {ratio}"
            )));
        }
        Ok(Self(ratio))
    }

    /// Capture the ratio of the given dimensions.
    pub fn of(dimensions: Dimensions) -> Result<Self, GeometryError> {
        if !dimensions.is_valid() {
            return Err(GeometryError::InvalidDimension(format!(
                "cannot take the aspect ratio of {}x{}",
                dimensions.width, dimensions.height
            )));
        }
        Self::new(f64::from(dimensions.width) / f64::from(dimensions.height))
    }

    /// Returns the raw ratio.
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Round a positive floating point size to whole pixels.
///
/// Values that round to zero or overflow `u32` are rejected.
pub(crate) fn round_to_pixels(value: f64, what: &str) -> Result<u32, GeometryError> {
    if !value.is_finite() {
        return Err(GeometryError::InvalidDimension(format!(
            "{what} is not a finite number"
        )));
    }
    let rounded = value.round();
    if rounded < 1.0 {
        return Err(GeometryError::InvalidDimension(format!(
            "{what} rounds to {rounded}"
        )));
    }
    if rounded > f64::from(u32::MAX) {
        return Err(GeometryError::InvalidDimension(format!(
            "{what} exceeds {}",
            u32::MAX
        )));
    }
    // Range checked above.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(rounded as u32)
}
