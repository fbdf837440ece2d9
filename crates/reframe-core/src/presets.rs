//! Preset catalog: named target sizes and named crop ratios.
//!
//! These tables are process-wide constants. Lookups by name ignore case so
//! that labels coming back from the UI do not need normalising.

use crate::geometry::Dimensions;
use serde::Serialize;

/// A named target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DimensionPreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
}

impl DimensionPreset {
    pub const fn new(name: &'static str, width: u32, height: u32) -> Self {
        Self {
            name,
            width,
            height,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// A named crop ratio. `None` means free-form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropRatioPreset {
    pub name: &'static str,
    pub ratio: Option<f64>,
}

impl CropRatioPreset {
    pub const fn new(name: &'static str, ratio: Option<f64>) -> Self {
        Self { name, ratio }
    }

    pub fn is_free(&self) -> bool {
        self.ratio.is_none()
    }
}

/// Social media target sizes.
pub const SOCIAL_PRESETS: [DimensionPreset; 6] = [
    DimensionPreset::new("Instagram Square", 1080, 1080),
    DimensionPreset::new("Instagram Story", 1080, 1920),
    DimensionPreset::new("Facebook Cover", 1200, 630),
    DimensionPreset::new("YouTube Thumbnail", 1280, 720),
    DimensionPreset::new("LinkedIn Post", 1200, 627),
    DimensionPreset::new("Twitter Header", 1500, 500),
];

/// Common display resolutions.
pub const COMMON_RESOLUTIONS: [DimensionPreset; 4] = [
    DimensionPreset::new("HD", 1920, 1080),
    DimensionPreset::new("4K", 3840, 2160),
    DimensionPreset::new("Square HD", 1080, 1080),
    DimensionPreset::new("Portrait HD", 1080, 1920),
];

/// Crop ratio choices, free-form first.
pub const CROP_RATIOS: [CropRatioPreset; 6] = [
    CropRatioPreset::new("Free", None),
    CropRatioPreset::new("1:1", Some(1.0)),
    CropRatioPreset::new("4:3", Some(4.0 / 3.0)),
    CropRatioPreset::new("16:9", Some(16.0 / 9.0)),
    CropRatioPreset::new("3:2", Some(3.0 / 2.0)),
    CropRatioPreset::new("9:16", Some(9.0 / 16.0)),
];

/// Find a size preset in either table.
pub fn find_dimension_preset(name: &str) -> Option<&'static DimensionPreset> {
    SOCIAL_PRESETS
        .iter()
        .chain(COMMON_RESOLUTIONS.iter())
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

/// Find a crop ratio by its label.
pub fn find_crop_ratio(name: &str) -> Option<&'static CropRatioPreset> {
    CROP_RATIOS
        .iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}
