//! Operation pipeline: validate, dispatch to the backend, commit.
//!
//! This is the only path through which operations reach an
//! [`EditSessionState`]. Each `apply_*` call:
//!
//! 1. validates and normalises the request (see [`plan`]); known-invalid
//!    parameters never reach the backend
//! 2. awaits the [`PixelBackend`]
//! 3. on success commits the backend's descriptor as a new history entry
//!
//! A backend failure leaves the caller's state exactly as it was. There is no
//! retry; calling again with the same request is the retry.
//!
//! Replaying a request against the same image gives an equivalent image but
//! still appends a new, distinct history entry.
//!
//! # Concurrency
//!
//! Only one operation may be outstanding per session. `apply_*` borrow the
//! state they were given and return a successor; hosts that need the guard
//! and stale-result detection use [`Dispatcher`].

mod backend;
mod dispatch;
mod plan;
mod request;

pub use backend::{BackendCall, BackendError, PixelBackend};
pub use dispatch::{Dispatcher, Ticket};
pub use plan::{plan_convert, plan_crop, plan_resize};
pub use request::{ConvertRequest, CropRequest, ResizeMode, ResizeRequest, Rgb, ShapeMask};

use crate::config::PipelineConfig;
use crate::geometry::GeometryError;
use crate::session::{EditSessionState, ImageDescriptor, ImageFormat, OperationKind};
use thiserror::Error;

/// Lowest accepted encoder quality.
pub const QUALITY_MIN: u8 = 1;
/// Highest accepted encoder quality.
pub const QUALITY_MAX: u8 = 100;

/// Errors from planning or applying an operation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// A non-geometric bound, such as encoder quality.
    #[error("{name} {value} is out of range ({min} to {max})")]
    OutOfRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Flattening transparency needs an explicit background.
    #[error("Converting {from:?} to {to:?} requires a matte color")]
    MissingMatteColor { from: ImageFormat, to: ImageFormat },

    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Backend failed: {0}")]
    BackendFailure(#[from] BackendError),

    /// Another operation has not resolved yet.
    #[error("A {0} operation is already in progress")]
    OperationInFlight(OperationKind),

    /// The result arrived for a state that is no longer current.
    #[error("Result discarded: the session changed while the operation was running")]
    StaleResult,
}

impl EditError {
    /// Stable name of the error kind, for hosts that branch on it.
    pub fn kind_name(&self) -> &'static str {
        match self {
            EditError::Geometry(GeometryError::InvalidDimension(_)) => "InvalidDimension",
            EditError::Geometry(GeometryError::OutOfRange { .. })
            | EditError::OutOfRange { .. } => "OutOfRange",
            EditError::Geometry(GeometryError::EmptyRegion { .. }) => "EmptyRegion",
            EditError::MissingMatteColor { .. } => "MissingMatteColor",
            EditError::InvalidColor(_) => "InvalidColor",
            EditError::InvalidConfig(_) => "InvalidConfig",
            EditError::BackendFailure(_) => "BackendFailure",
            EditError::OperationInFlight(_) => "OperationInFlight",
            EditError::StaleResult => "StaleResult",
        }
    }
}

/// Validates requests and forwards them to a [`PixelBackend`].
pub struct OperationPipeline<B> {
    backend: B,
    config: PipelineConfig,
}

impl<B: PixelBackend> OperationPipeline<B> {
    /// Create a pipeline with the default configuration.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: PipelineConfig::default(),
        }
    }

    /// Create a pipeline with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns the validation error if `config` is invalid.
    pub fn with_config(backend: B, config: PipelineConfig) -> Result<Self, EditError> {
        config.validate()?;
        Ok(Self { backend, config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resize the current image.
    pub async fn apply_resize(
        &self,
        state: &EditSessionState,
        request: &ResizeRequest,
    ) -> Result<(EditSessionState, ImageDescriptor), EditError> {
        let call = plan_resize(state, request, &self.config)?;
        self.dispatch(state, call).await
    }

    /// Crop the current image.
    pub async fn apply_crop(
        &self,
        state: &EditSessionState,
        request: &CropRequest,
    ) -> Result<(EditSessionState, ImageDescriptor), EditError> {
        let call = plan_crop(state, request, &self.config)?;
        self.dispatch(state, call).await
    }

    /// Re-encode the current image in another format.
    pub async fn apply_convert(
        &self,
        state: &EditSessionState,
        request: &ConvertRequest,
    ) -> Result<(EditSessionState, ImageDescriptor), EditError> {
        let call = plan_convert(state, request)?;
        self.dispatch(state, call).await
    }

    async fn dispatch(
        &self,
        state: &EditSessionState,
        call: BackendCall,
    ) -> Result<(EditSessionState, ImageDescriptor), EditError> {
        let kind = call.kind();
        let predicted = call.predicted_dimensions(state.current());
        let predicted_format = call.predicted_format();

        let image = self.backend.execute(&call).await.map_err(|e| {
            log::warn!("{} of {} failed: {}", kind, call.source(), e);
            EditError::BackendFailure(e)
        })?;

        // The backend is authoritative; only note the disagreement.
        if image.dimensions() != predicted || image.format() != predicted_format {
            log::warn!(
                "{} result is {}x{} {:?}, expected {}x{} {:?}",
                kind,
                image.width(),
                image.height(),
                image.format(),
                predicted.width,
                predicted.height,
                predicted_format
            );
        }

        let next = state.commit(kind, image.clone());
        Ok((next, image))
    }
}
