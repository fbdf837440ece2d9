//! Core types for the edit session.

use crate::geometry::{AspectRatio, Dimensions, GeometryError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output encoding of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageFormat {
    /// Lossy raster without alpha (JPEG).
    RasterLossy,
    /// Lossless raster with alpha (PNG).
    RasterLossless,
}

impl ImageFormat {
    /// Whether the format can store transparent pixels.
    pub fn supports_transparency(self) -> bool {
        matches!(self, ImageFormat::RasterLossless)
    }

    /// Converting from `self` to `target` drops the alpha channel, so a
    /// matte colour is required.
    pub fn needs_matte_for(self, target: ImageFormat) -> bool {
        self.supports_transparency() && !target.supports_transparency()
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::RasterLossy => "jpeg",
            ImageFormat::RasterLossless => "png",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ImageFormat::RasterLossy => "image/jpeg",
            ImageFormat::RasterLossless => "image/png",
        }
    }
}

/// Opaque handle to pixel data owned by the backend.
///
/// The session stores and compares handles but never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image at one point in the session. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageDescriptor {
    reference: ImageRef,
    width: u32,
    height: u32,
    format: ImageFormat,
}

impl ImageDescriptor {
    /// Create a descriptor.
    ///
    /// # Errors
    ///
    /// `InvalidDimension` if either side is zero.
    pub fn new(
        reference: ImageRef,
        width: u32,
        height: u32,
        format: ImageFormat,
    ) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidDimension(format!(
                "image {reference} reported as {width}x{height}"
            )));
        }
        Ok(Self {
            reference,
            width,
            height,
            format,
        })
    }

    pub fn reference(&self) -> &ImageRef {
        &self.reference
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        // Both sides are non-zero by construction.
        AspectRatio(f64::from(self.width) / f64::from(self.height))
    }
}

/// What produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Original,
    Resize,
    Crop,
    Convert,
}

impl OperationKind {
    /// Past-tense label used for file names and the recent-files list.
    pub fn label(self) -> &'static str {
        match self {
            OperationKind::Original => "original",
            OperationKind::Resize => "resized",
            OperationKind::Crop => "cropped",
            OperationKind::Convert => "converted",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of a history entry, unique within its session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub(crate) u64);

impl EntryId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// One committed operation result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    pub kind: OperationKind,
    pub image: ImageDescriptor,
    pub committed_at: DateTime<Utc>,
}
