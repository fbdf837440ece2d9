//! Resize geometry: aspect lock, presets and percentage scaling.

use super::{round_to_pixels, AspectRatio, Dimensions, GeometryError};

/// Smallest accepted scale percentage.
pub const PERCENT_MIN: u32 = 10;
/// Largest accepted scale percentage.
pub const PERCENT_MAX: u32 = 500;

/// Derive the other side of an aspect-locked resize.
///
/// # Arguments
///
/// * `known_value` - The side the user typed, in pixels
/// * `known_is_width` - Whether `known_value` is the width
/// * `aspect` - Ratio captured at session start
///
/// # Returns
///
/// `round(known / ratio)` when the width is known, `round(known * ratio)`
/// when the height is known.
///
/// # Errors
///
/// `InvalidDimension` if `known_value` is not positive or the derived side
/// rounds to zero.
///
/// # Example
///
/// ```ignore
/// let ratio = AspectRatio::of(Dimensions::new(1080, 1920))?;
/// assert_eq!(locked_dimension(540, true, ratio)?, 960);
/// ```
pub fn locked_dimension(
    known_value: i64,
    known_is_width: bool,
    aspect: AspectRatio,
) -> Result<u32, GeometryError> {
    if known_value <= 0 {
        return Err(GeometryError::InvalidDimension(format!(
            "{} must be positive, got {known_value}",
            if known_is_width { "width" } else { "height" }
        )));
    }

    // i64 -> f64 is exact for every realistic pixel count
    #[allow(clippy::cast_precision_loss)]
    let known = known_value as f64;

    if known_is_width {
        round_to_pixels(known / aspect.value(), "locked height")
    } else {
        round_to_pixels(known * aspect.value(), "locked width")
    }
}

/// Resolve a named or freeform preset into target dimensions.
///
/// This is an identity passthrough so that presets and typed values share a
/// single call path.
pub fn resolve_preset(preset: Dimensions) -> Dimensions {
    preset
}

/// Scale source dimensions by a percentage.
///
/// Each axis is `round(source * percent / 100)`.
///
/// # Errors
///
/// * `OutOfRange` if `percent` is outside [`PERCENT_MIN`, `PERCENT_MAX`]
/// * `InvalidDimension` if the source is empty or an axis rounds to zero
pub fn resolve_percent_scale(
    source_width: u32,
    source_height: u32,
    percent: u32,
) -> Result<Dimensions, GeometryError> {
    if !(PERCENT_MIN..=PERCENT_MAX).contains(&percent) {
        return Err(GeometryError::OutOfRange {
            name: "percent",
            value: i64::from(percent),
            min: i64::from(PERCENT_MIN),
            max: i64::from(PERCENT_MAX),
        });
    }
    if source_width == 0 || source_height == 0 {
        return Err(GeometryError::InvalidDimension(format!(
            "source {source_width}x{source_height} has no area"
        )));
    }

    let factor = f64::from(percent) / 100.0;
    Ok(Dimensions {
        width: round_to_pixels(f64::from(source_width) * factor, "scaled width")?,
        height: round_to_pixels(f64::from(source_height) * factor, "scaled height")?,
    })
}

/// Parse a dimension typed into a text field.
///
/// Mirrors what a form field accepts: surrounding whitespace is ignored and
/// the leading run of digits is used, so `"1080px"` is `1080`.
///
/// # Errors
///
/// `InvalidDimension` for empty, non-numeric, zero or negative input.
pub fn parse_dimension(text: &str) -> Result<u32, GeometryError> {
    let trimmed = text.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);

    if unsigned.starts_with('-') {
        return Err(GeometryError::InvalidDimension(format!(
            "{trimmed:?} is negative"
        )));
    }

    let digits: &str = {
        let end = unsigned
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map_or(unsigned.len(), |(i, _)| i);
        &unsigned[..end]
    };

    if digits.is_empty() {
        return Err(GeometryError::InvalidDimension(format!(
            "{trimmed:?} is not a number"
        )));
    }

    match digits.parse::<u32>() {
        Ok(0) => Err(GeometryError::InvalidDimension(
            "dimension must be greater than zero".to_string(),
        )),
        Ok(value) => Ok(value),
        Err(_) => Err(GeometryError::InvalidDimension(format!(
            "{digits} is too large"
        ))),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: solving for height and back for width returns the
        /// original width within rounding tolerance.
        #[test]
        fn prop_locked_dimension_inverse(
            width in 1i64..=10_000,
            raw_ratio in 0.25f64..=4.0,
        ) {
            let aspect = AspectRatio::new(raw_ratio).unwrap();
            let height = locked_dimension(width, true, aspect);
            prop_assume!(height.is_ok());
            let height = height.unwrap();

            let back = locked_dimension(i64::from(height), false, aspect).unwrap();
            let tolerance = 0.5 * raw_ratio + 1.0;

            prop_assert!(
                (f64::from(back) - width as f64).abs() <= tolerance,
                "width {} -> height {} -> width {} (ratio {})",
                width, height, back, raw_ratio
            );
        }

        /// Property: percentage scaling never produces an empty axis.
        #[test]
        fn prop_percent_scale_positive(
            (width, height) in (10u32..=5000, 10u32..=5000),
            percent in PERCENT_MIN..=PERCENT_MAX,
        ) {
            let scaled = resolve_percent_scale(width, height, percent).unwrap();
            prop_assert!(scaled.is_valid());
        }
    }
}
