//! Crop geometry.
//!
//! Two steps feed a crop operation:
//!
//! - [`fit_crop_to_ratio`] derives a centered rectangle for a ratio preset
//! - [`clamp_crop_rect`] clips whatever the user ended up with to the source
//!
//! User-facing rectangles ([`Rect`]) are signed because a dragged overlay can
//! leave the image. Clamped rectangles ([`CropRect`]) are always inside the
//! source and non-empty.

use super::{round_to_pixels, AspectRatio, GeometryError};
use serde::{Deserialize, Serialize};

/// A rectangle as entered by the user, possibly outside the source.
///
/// Serialized as `{ originX, originY, width, height }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(rename = "originX")]
    pub x: i64,
    #[serde(rename = "originY")]
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// A rectangle guaranteed to lie within its source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CropRect {
    #[serde(rename = "originX")]
    pub x: u32,
    #[serde(rename = "originY")]
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// The full-source rectangle.
    pub fn full(source_width: u32, source_height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width: source_width,
            height: source_height,
        }
    }

    /// Returns true if this rectangle covers the whole source.
    pub fn is_full(&self, source_width: u32, source_height: u32) -> bool {
        *self == Self::full(source_width, source_height)
    }
}

impl From<CropRect> for Rect {
    fn from(rect: CropRect) -> Self {
        Self {
            x: i64::from(rect.x),
            y: i64::from(rect.y),
            width: i64::from(rect.width),
            height: i64::from(rect.height),
        }
    }
}

/// Derive the largest centered rectangle of the given ratio.
///
/// # Arguments
///
/// * `source_width`, `source_height` - Source dimensions
/// * `ratio` - Target `width / height`, or `None` for a free-form crop
///
/// # Behavior
///
/// - `None` returns the full source rectangle
/// - A source wider than `ratio` keeps its height; otherwise it keeps its width
/// - The result is always re-centered on the full source. Any previous pan is
///   discarded when the ratio changes.
///
/// # Errors
///
/// * `InvalidDimension` for an empty source or a non-positive ratio
/// * `EmptyRegion` if the derived side rounds to zero
pub fn fit_crop_to_ratio(
    source_width: u32,
    source_height: u32,
    ratio: Option<f64>,
) -> Result<CropRect, GeometryError> {
    if source_width == 0 || source_height == 0 {
        return Err(GeometryError::InvalidDimension(format!(
            "source {source_width}x{source_height} has no area"
        )));
    }

    let Some(ratio) = ratio else {
        return Ok(CropRect::full(source_width, source_height));
    };
    let ratio = AspectRatio::new(ratio)?.value();

    let src_w = f64::from(source_width);
    let src_h = f64::from(source_height);

    let sized = if src_w / src_h > ratio {
        round_to_pixels(src_h * ratio, "crop width").map(|width| (width, source_height))
    } else {
        round_to_pixels(src_w / ratio, "crop height").map(|height| (source_width, height))
    };
    let (width, height) = sized.map_err(|_| GeometryError::EmptyRegion {
        source_width,
        source_height,
    })?;

    // Both offsets are in [0, source) because width/height never exceed it.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let x = ((src_w - f64::from(width)) / 2.0).round() as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let y = ((src_h - f64::from(height)) / 2.0).round() as u32;

    log::debug!(
        "Fitted {:.4} crop in {}x{}: {}x{} at ({}, {})",
        ratio,
        source_width,
        source_height,
        width,
        height,
        x,
        y
    );

    Ok(CropRect {
        x,
        y,
        width,
        height,
    })
}

/// Clip a rectangle so it lies entirely within the source.
///
/// The origin is clamped to `[0, source]` and the far edge to the source
/// size; the extent is whatever remains between them.
///
/// # Errors
///
/// `EmptyRegion` if the clipped width or height is zero or negative.
pub fn clamp_crop_rect(
    rect: Rect,
    source_width: u32,
    source_height: u32,
) -> Result<CropRect, GeometryError> {
    let empty = GeometryError::EmptyRegion {
        source_width,
        source_height,
    };

    let (x, width) = clamp_axis(rect.x, rect.width, source_width).ok_or_else(|| empty.clone())?;
    let (y, height) = clamp_axis(rect.y, rect.height, source_height).ok_or(empty)?;

    Ok(CropRect {
        x,
        y,
        width,
        height,
    })
}

/// Clamp one axis. Returns `None` when nothing is left.
fn clamp_axis(origin: i64, extent: i64, limit: u32) -> Option<(u32, u32)> {
    let limit = i64::from(limit);
    let start = origin.clamp(0, limit);
    let end = origin.saturating_add(extent).clamp(0, limit);
    let length = end - start;

    if length <= 0 {
        return None;
    }

    // Both values are within [0, limit] where limit came from a u32.
    Some((u32::try_from(start).ok()?, u32::try_from(length).ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i64, y: i64, width: i64, height: i64) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_free_ratio_returns_full_source() {
        let fitted = fit_crop_to_ratio(1080, 1920, None).unwrap();
        assert_eq!(fitted, CropRect::full(1080, 1920));
    }

    #[test]
    fn test_square_on_portrait() {
        let fitted = fit_crop_to_ratio(1080, 1920, Some(1.0)).unwrap();
        assert_eq!(
            fitted,
            CropRect {
                x: 0,
                y: 420,
                width: 1080,
                height: 1080
            }
        );
    }

    #[test]
    fn test_sixteen_nine_on_square() {
        let fitted = fit_crop_to_ratio(1000, 1000, Some(16.0 / 9.0)).unwrap();
        // 1000 / 1.777.. = 562.5 -> 563, (1000 - 563) / 2 = 218.5 -> 219
        assert_eq!(
            fitted,
            CropRect {
                x: 0,
                y: 219,
                width: 1000,
                height: 563
            }
        );
    }

    #[test]
    fn test_wide_source_keeps_height() {
        let fitted = fit_crop_to_ratio(4000, 1000, Some(4.0 / 3.0)).unwrap();
        assert_eq!(fitted.height, 1000);
        assert_eq!(fitted.width, 1333);
        assert_eq!(fitted.x, 1334);
        assert_eq!(fitted.y, 0);
    }

    #[test]
    fn test_ratio_matching_source_is_full() {
        let fitted = fit_crop_to_ratio(1920, 1080, Some(16.0 / 9.0)).unwrap();
        assert!(fitted.is_full(1920, 1080));
    }

    #[test]
    fn test_fit_rejects_bad_ratio() {
        assert!(matches!(
            fit_crop_to_ratio(100, 100, Some(0.0)),
            Err(GeometryError::InvalidDimension(_))
        ));
        assert!(fit_crop_to_ratio(100, 100, Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_fit_rejects_empty_source() {
        assert!(fit_crop_to_ratio(0, 100, Some(1.0)).is_err());
        assert!(fit_crop_to_ratio(100, 0, None).is_err());
    }

    #[test]
    fn test_fit_extreme_ratio_is_empty_region() {
        // 1 * 0.001 rounds to zero width
        assert!(matches!(
            fit_crop_to_ratio(1, 1, Some(0.001)),
            Err(GeometryError::EmptyRegion { .. })
        ));
    }

    #[test]
    fn test_clamp_inside_is_unchanged() {
        let clamped = clamp_crop_rect(rect(10, 20, 30, 40), 100, 100).unwrap();
        assert_eq!(
            clamped,
            CropRect {
                x: 10,
                y: 20,
                width: 30,
                height: 40
            }
        );
    }

    #[test]
    fn test_clamp_negative_origin() {
        let clamped = clamp_crop_rect(rect(-10, -5, 50, 50), 100, 100).unwrap();
        assert_eq!(
            clamped,
            CropRect {
                x: 0,
                y: 0,
                width: 40,
                height: 45
            }
        );
    }

    #[test]
    fn test_clamp_overflowing_extent() {
        let clamped = clamp_crop_rect(rect(80, 90, 50, 50), 100, 100).unwrap();
        assert_eq!(
            clamped,
            CropRect {
                x: 80,
                y: 90,
                width: 20,
                height: 10
            }
        );
    }

    #[test]
    fn test_clamp_outside_is_empty() {
        assert!(matches!(
            clamp_crop_rect(rect(100, 0, 10, 10), 100, 100),
            Err(GeometryError::EmptyRegion {
                source_width: 100,
                source_height: 100
            })
        ));
        assert!(clamp_crop_rect(rect(-20, 0, 10, 10), 100, 100).is_err());
    }

    #[test]
    fn test_clamp_zero_or_negative_extent_is_empty() {
        assert!(clamp_crop_rect(rect(0, 0, 0, 10), 100, 100).is_err());
        assert!(clamp_crop_rect(rect(0, 0, 10, -1), 100, 100).is_err());
    }

    #[test]
    fn test_clamp_huge_values_do_not_overflow() {
        let clamped = clamp_crop_rect(rect(i64::MAX - 1, 0, i64::MAX, 10), 100, 100);
        assert!(clamped.is_err());

        let clamped = clamp_crop_rect(rect(0, 0, i64::MAX, i64::MAX), 100, 50).unwrap();
        assert!(clamped.is_full(100, 50));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
