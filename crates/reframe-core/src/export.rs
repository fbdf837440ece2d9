//! Handing a finished image to the host for saving or sharing.

use crate::session::{EditSessionState, ImageFormat, ImageRef, OperationKind};
use chrono::{DateTime, Utc};
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
    #[error("Permission to save images was denied")]
    PermissionDenied,
    #[error("Export failed: {0}")]
    Failed(String),
}

/// Destination for exported images, provided by the host (media library,
/// share sheet, download).
pub trait ExportSink {
    fn persist(
        &self,
        image: &ImageRef,
        desired_name: &str,
    ) -> impl Future<Output = Result<(), ExportError>>;
}

/// File name for an export: `image_<label>_<millis>.<ext>`.
pub fn export_file_name(
    kind: OperationKind,
    timestamp: DateTime<Utc>,
    format: ImageFormat,
) -> String {
    format!(
        "image_{}_{}.{}",
        kind.label(),
        timestamp.timestamp_millis(),
        format.extension()
    )
}

/// Rough encoded size in kilobytes, as shown next to the preview.
pub fn estimated_size_kb(width: u32, height: u32) -> u64 {
    (u64::from(width) * u64::from(height) + 500) / 1000
}

/// Human readable byte count, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "Unknown size".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", text, UNITS[unit])
}

/// Send the session's current image to `sink`.
///
/// Returns the name the image was saved under.
pub async fn export_current<S: ExportSink>(
    sink: &S,
    state: &EditSessionState,
    timestamp: DateTime<Utc>,
) -> Result<String, ExportError> {
    let entry = state.current_entry();
    let name = export_file_name(entry.kind, timestamp, entry.image.format());

    let image = entry.image.reference();
    sink.persist(image, &name)
        .await
        .inspect_err(|e| log::warn!("Export of {} failed: {}", image, e))?;

    log::info!("Exported {}", name);
    Ok(name)
}
