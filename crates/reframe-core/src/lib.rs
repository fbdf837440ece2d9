//! Reframe Core - edit session library
//!
//! This crate holds everything about an image edit session that is not pixel
//! work: the geometry that keeps resize and crop parameters consistent, the
//! undo/redo history, validation of operations before they reach the pixel
//! backend, and the preset tables shown in the editor.
//!
//! Pixel processing, storage and export delivery are host concerns, reached
//! through the [`PixelBackend`], [`RecentFilesStore`] and [`ExportSink`]
//! traits.

pub mod config;
pub mod export;
pub mod geometry;
pub mod pipeline;
pub mod presets;
pub mod recent;
pub mod session;

pub use config::PipelineConfig;
pub use export::{estimated_size_kb, export_file_name, ExportError, ExportSink};
pub use geometry::{
    clamp_crop_rect, fit_crop_to_ratio, locked_dimension, resolve_percent_scale, resolve_preset,
    AspectRatio, CropRect, Dimensions, GeometryError, Rect,
};
pub use pipeline::{
    BackendCall, BackendError, ConvertRequest, CropRequest, Dispatcher, EditError,
    OperationPipeline, PixelBackend, ResizeMode, ResizeRequest, Rgb, ShapeMask, Ticket,
};
pub use presets::{CropRatioPreset, DimensionPreset};
pub use recent::{RecentFile, RecentFiles, RecentFilesStore};
pub use session::{
    EditSessionState, HistoryEntry, ImageDescriptor, ImageFormat, ImageRef, OperationKind,
    Transition,
};
