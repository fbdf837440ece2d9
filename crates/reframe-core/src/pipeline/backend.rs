//! Port to the pixel-processing backend.
//!
//! The backend owns pixel data. The pipeline hands it a [`BackendCall`] with
//! fully validated parameters and gets back a descriptor whose dimensions and
//! format are taken as ground truth.

use super::request::{Rgb, ShapeMask};
use crate::geometry::{CropRect, Dimensions};
use crate::session::{ImageDescriptor, ImageFormat, ImageRef, OperationKind};
use serde::Serialize;
use std::future::Future;
use thiserror::Error;

/// Failure reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Parameters for one backend invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "operation", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendCall {
    #[serde(rename_all = "camelCase")]
    Resize {
        source: ImageRef,
        target_width: u32,
        target_height: u32,
        output_format: ImageFormat,
        quality: u8,
    },
    #[serde(rename_all = "camelCase")]
    Crop {
        source: ImageRef,
        #[serde(flatten)]
        rect: CropRect,
        shape_mask: ShapeMask,
        output_format: ImageFormat,
        quality: u8,
    },
    #[serde(rename_all = "camelCase")]
    Convert {
        source: ImageRef,
        target_format: ImageFormat,
        quality: u8,
        matte_color: Option<Rgb>,
    },
}

impl BackendCall {
    /// History entry kind committed when this call succeeds.
    pub fn kind(&self) -> OperationKind {
        match self {
            BackendCall::Resize { .. } => OperationKind::Resize,
            BackendCall::Crop { .. } => OperationKind::Crop,
            BackendCall::Convert { .. } => OperationKind::Convert,
        }
    }

    pub fn source(&self) -> &ImageRef {
        match self {
            BackendCall::Resize { source, .. }
            | BackendCall::Crop { source, .. }
            | BackendCall::Convert { source, .. } => source,
        }
    }

    /// Dimensions the result should have, given the image being edited.
    pub fn predicted_dimensions(&self, current: &ImageDescriptor) -> Dimensions {
        match self {
            BackendCall::Resize {
                target_width,
                target_height,
                ..
            } => Dimensions::new(*target_width, *target_height),
            BackendCall::Crop { rect, .. } => Dimensions::new(rect.width, rect.height),
            BackendCall::Convert { .. } => current.dimensions(),
        }
    }

    /// Format the result should have.
    pub fn predicted_format(&self) -> ImageFormat {
        match self {
            BackendCall::Resize { output_format, .. } | BackendCall::Crop { output_format, .. } => {
                *output_format
            }
            BackendCall::Convert { target_format, .. } => *target_format,
        }
    }
}

/// The pixel-processing collaborator.
///
/// Implementations may suspend. A call either resolves to the new image or
/// fails; there is no cancellation.
pub trait PixelBackend {
    fn execute(
        &self,
        call: &BackendCall,
    ) -> impl Future<Output = Result<ImageDescriptor, BackendError>>;
}

impl<B: PixelBackend> PixelBackend for &B {
    fn execute(
        &self,
        call: &BackendCall,
    ) -> impl Future<Output = Result<ImageDescriptor, BackendError>> {
        (**self).execute(call)
    }
}
