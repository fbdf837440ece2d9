//! Operation requests as gathered by the UI.

use super::EditError;
use crate::geometry::Rect;
use crate::presets::DimensionPreset;
use crate::session::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a resize target is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResizeMode {
    #[default]
    Pixels,
    Percent,
}

/// A resize request.
///
/// In `Pixels` mode, an unset side is either derived from the session's
/// captured aspect ratio (when `aspect_locked`) or kept from the current
/// image. In `Percent` mode only `percent` is read.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeRequest {
    pub mode: ResizeMode,
    pub target_width: Option<i64>,
    pub target_height: Option<i64>,
    pub percent: Option<u32>,
    pub aspect_locked: bool,
}

impl ResizeRequest {
    /// Exact pixel target.
    pub fn pixels(width: i64, height: i64) -> Self {
        Self {
            target_width: Some(width),
            target_height: Some(height),
            ..Self::default()
        }
    }

    /// Width only; the height follows the aspect lock.
    pub fn width(width: i64) -> Self {
        Self {
            target_width: Some(width),
            aspect_locked: true,
            ..Self::default()
        }
    }

    /// Height only; the width follows the aspect lock.
    pub fn height(height: i64) -> Self {
        Self {
            target_height: Some(height),
            aspect_locked: true,
            ..Self::default()
        }
    }

    pub fn percent(percent: u32) -> Self {
        Self {
            mode: ResizeMode::Percent,
            percent: Some(percent),
            ..Self::default()
        }
    }

    pub fn from_preset(preset: &DimensionPreset) -> Self {
        Self::pixels(i64::from(preset.width), i64::from(preset.height))
    }

    pub fn locked(mut self, aspect_locked: bool) -> Self {
        self.aspect_locked = aspect_locked;
        self
    }
}

/// Shape cut out by a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeMask {
    #[default]
    Rectangle,
    Ellipse,
}

/// A crop request in current-image pixels.
///
/// The rectangle is flattened into the request:
/// `{ originX, originY, width, height, ratioConstraint, shapeMask }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRequest {
    #[serde(flatten)]
    pub rect: Rect,
    /// Ratio the rectangle was fitted to, if any.
    pub ratio_constraint: Option<f64>,
    #[serde(default)]
    pub shape_mask: ShapeMask,
}

impl CropRequest {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            rect: Rect {
                x,
                y,
                width,
                height,
            },
            ratio_constraint: None,
            shape_mask: ShapeMask::Rectangle,
        }
    }

    pub fn with_ratio(mut self, ratio: Option<f64>) -> Self {
        self.ratio_constraint = ratio;
        self
    }

    pub fn with_shape(mut self, shape_mask: ShapeMask) -> Self {
        self.shape_mask = shape_mask;
        self
    }
}

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`.
    ///
    /// # Errors
    ///
    /// `InvalidColor` for any other input.
    pub fn from_hex(text: &str) -> Result<Self, EditError> {
        let invalid = || EditError::InvalidColor(text.to_string());
        let hex = text.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| invalid());

        match hex.len() {
            6 => Ok(Self::new(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                // #abc == #aabbcc
                let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// A format conversion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertRequest {
    pub target_format: ImageFormat,
    /// Encoder quality, 1 to 100.
    pub lossy_quality: u8,
    /// Background for transparent pixels when the target has no alpha.
    pub matte_color: Option<Rgb>,
}

impl ConvertRequest {
    pub fn new(target_format: ImageFormat, lossy_quality: u8) -> Self {
        Self {
            target_format,
            lossy_quality,
            matte_color: None,
        }
    }

    pub fn with_matte(mut self, matte_color: Rgb) -> Self {
        self.matte_color = Some(matte_color);
        self
    }
}
