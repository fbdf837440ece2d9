//! Validation and normalisation of requests into backend calls.
//!
//! Every check happens here, before anything is sent to the backend. A
//! request that passes produces exactly the [`BackendCall`] that will be
//! dispatched.

use super::backend::BackendCall;
use super::request::{ConvertRequest, CropRequest, ResizeMode, ResizeRequest};
use super::{EditError, QUALITY_MAX, QUALITY_MIN};
use crate::config::PipelineConfig;
use crate::geometry::{
    clamp_crop_rect, locked_dimension, resolve_percent_scale, AspectRatio, Dimensions,
    GeometryError,
};
use crate::session::EditSessionState;

/// Resolve a resize request against the current image.
///
/// # Errors
///
/// * `InvalidDimension` if no target is set, a target is not positive, or a
///   locked side rounds to zero
/// * `OutOfRange` for a percentage outside 10–500 or a target above
///   `config.max_dimension`
pub fn plan_resize(
    state: &EditSessionState,
    request: &ResizeRequest,
    config: &PipelineConfig,
) -> Result<BackendCall, EditError> {
    let current = state.current();

    let target = match request.mode {
        ResizeMode::Percent => {
            let percent = request.percent.ok_or_else(|| {
                GeometryError::InvalidDimension("no scale percentage given".to_string())
            })?;
            resolve_percent_scale(current.width(), current.height(), percent)?
        }
        ResizeMode::Pixels => resolve_pixel_target(
            request,
            current.dimensions(),
            state.aspect_ratio(),
            config.max_dimension,
        )?,
    };

    check_max_dimension(target.width, config.max_dimension)?;
    check_max_dimension(target.height, config.max_dimension)?;

    log::debug!(
        "Resize {}x{} -> {}x{} ({:?}, locked: {})",
        current.width(),
        current.height(),
        target.width,
        target.height,
        request.mode,
        request.aspect_locked
    );

    Ok(BackendCall::Resize {
        source: current.reference().clone(),
        target_width: target.width,
        target_height: target.height,
        output_format: current.format(),
        quality: config.output_quality,
    })
}

fn resolve_pixel_target(
    request: &ResizeRequest,
    current: Dimensions,
    aspect: AspectRatio,
    max_dimension: u32,
) -> Result<Dimensions, EditError> {
    let width = request
        .target_width
        .map(|w| positive_dimension(w, "width", max_dimension))
        .transpose()?;
    let height = request
        .target_height
        .map(|h| positive_dimension(h, "height", max_dimension))
        .transpose()?;

    let (width, height) = match (width, height) {
        (None, None) => {
            return Err(GeometryError::InvalidDimension(
                "neither target width nor target height is set".to_string(),
            )
            .into())
        }
        (Some(width), Some(height)) => (width, height),
        (Some(width), None) if request.aspect_locked => {
            (width, locked_dimension(i64::from(width), true, aspect)?)
        }
        (None, Some(height)) if request.aspect_locked => {
            (locked_dimension(i64::from(height), false, aspect)?, height)
        }
        (Some(width), None) => (width, current.height),
        (None, Some(height)) => (current.width, height),
    };

    Ok(Dimensions::new(width, height))
}

fn positive_dimension(value: i64, name: &str, max_dimension: u32) -> Result<u32, EditError> {
    if value <= 0 {
        return Err(GeometryError::InvalidDimension(format!(
            "target {name} must be positive, got {value}"
        ))
        .into());
    }
    match u32::try_from(value) {
        Ok(value) => Ok(value),
        Err(_) => Err(EditError::OutOfRange {
            name: "target dimension",
            value,
            min: 1,
            max: i64::from(max_dimension),
        }),
    }
}

fn check_max_dimension(value: u32, max_dimension: u32) -> Result<(), EditError> {
    if value > max_dimension {
        return Err(EditError::OutOfRange {
            name: "target dimension",
            value: i64::from(value),
            min: 1,
            max: i64::from(max_dimension),
        });
    }
    Ok(())
}

/// Clamp a crop request to the current image.
///
/// The ratio constraint is informational: the rectangle has already been
/// fitted by the caller and is not reshaped here, but a constraint that is
/// not a positive number is rejected.
///
/// # Errors
///
/// * `EmptyRegion` if nothing of the rectangle lies within the image
/// * `InvalidDimension` for a non-positive ratio constraint
pub fn plan_crop(
    state: &EditSessionState,
    request: &CropRequest,
    config: &PipelineConfig,
) -> Result<BackendCall, EditError> {
    let current = state.current();

    if let Some(ratio) = request.ratio_constraint {
        AspectRatio::new(ratio)?;
    }

    let rect = clamp_crop_rect(request.rect, current.width(), current.height())?;

    if i64::from(rect.width) != request.rect.width
        || i64::from(rect.height) != request.rect.height
    {
        log::debug!(
            "Crop {:?} clamped to {:?} within {}x{}",
            request.rect,
            rect,
            current.width(),
            current.height()
        );
    }

    Ok(BackendCall::Crop {
        source: current.reference().clone(),
        rect,
        shape_mask: request.shape_mask,
        output_format: current.format(),
        quality: config.output_quality,
    })
}

/// Validate a format conversion.
///
/// The matte colour is forwarded only when the conversion drops the alpha
/// channel.
///
/// # Errors
///
/// * `OutOfRange` for a quality outside 1–100
/// * `MissingMatteColor` when converting a transparency-capable image into a
///   format without alpha and no matte colour is given
pub fn plan_convert(
    state: &EditSessionState,
    request: &ConvertRequest,
) -> Result<BackendCall, EditError> {
    let current = state.current();

    if !(QUALITY_MIN..=QUALITY_MAX).contains(&request.lossy_quality) {
        return Err(EditError::OutOfRange {
            name: "quality",
            value: i64::from(request.lossy_quality),
            min: i64::from(QUALITY_MIN),
            max: i64::from(QUALITY_MAX),
        });
    }

    let needs_matte = current.format().needs_matte_for(request.target_format);
    let matte_color = if needs_matte {
        Some(request.matte_color.ok_or(EditError::MissingMatteColor {
            from: current.format(),
            to: request.target_format,
        })?)
    } else {
        None
    };

    log::debug!(
        "Convert {:?} -> {:?} at quality {} (matte: {:?})",
        current.format(),
        request.target_format,
        request.lossy_quality,
        matte_color
    );

    Ok(BackendCall::Convert {
        source: current.reference().clone(),
        target_format: request.target_format,
        quality: request.lossy_quality,
        matte_color,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CropRect;
    use crate::pipeline::request::{Rgb, ShapeMask};
    use crate::session::tests::image;
    use crate::session::{ImageFormat, OperationKind};

    fn portrait() -> EditSessionState {
        EditSessionState::start(image("portrait", 1080, 1920, ImageFormat::RasterLossy))
    }

    fn png() -> EditSessionState {
        EditSessionState::start(image("logo", 400, 300, ImageFormat::RasterLossless))
    }

    fn resize_target(call: &BackendCall) -> (u32, u32) {
        match call {
            BackendCall::Resize {
                target_width,
                target_height,
                ..
            } => (*target_width, *target_height),
            other => panic!("expected resize, got {other:?}"),
        }
    }

    #[test]
    fn test_locked_width_resolves_height() {
        let call = plan_resize(
            &portrait(),
            &ResizeRequest::width(540),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(resize_target(&call), (540, 960));
    }

    #[test]
    fn test_locked_height_resolves_width() {
        let call = plan_resize(
            &portrait(),
            &ResizeRequest::height(960),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(resize_target(&call), (540, 960));
    }

    #[test]
    fn test_unlocked_missing_side_keeps_current() {
        let request = ResizeRequest::width(540).locked(false);
        let call = plan_resize(&portrait(), &request, &PipelineConfig::default()).unwrap();
        assert_eq!(resize_target(&call), (540, 1920));
    }

    #[test]
    fn test_both_sides_used_as_given() {
        let request = ResizeRequest::pixels(1200, 630).locked(true);
        let call = plan_resize(&portrait(), &request, &PipelineConfig::default()).unwrap();
        assert_eq!(resize_target(&call), (1200, 630));
    }

    #[test]
    fn test_locked_uses_captured_ratio_not_current() {
        // After a square crop the lock still follows the original 9:16
        let state = portrait().commit(
            OperationKind::Crop,
            image("square", 1080, 1080, ImageFormat::RasterLossy),
        );
        let call = plan_resize(
            &state,
            &ResizeRequest::width(540),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(resize_target(&call), (540, 960));
    }

    #[test]
    fn test_percent_uses_current_image() {
        let call = plan_resize(
            &portrait(),
            &ResizeRequest::percent(50),
            &PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(resize_target(&call), (540, 960));
    }

    #[test]
    fn test_resize_carries_format_and_quality() {
        let mut config = PipelineConfig::default();
        config.output_quality = 70;
        let call = plan_resize(&png(), &ResizeRequest::percent(200), &config).unwrap();
        assert_eq!(
            call,
            BackendCall::Resize {
                source: png().current().reference().clone(),
                target_width: 800,
                target_height: 600,
                output_format: ImageFormat::RasterLossless,
                quality: 70,
            }
        );
    }

    #[test]
    fn test_resize_rejects_missing_targets() {
        let request = ResizeRequest::default();
        assert!(matches!(
            plan_resize(&portrait(), &request, &PipelineConfig::default()),
            Err(EditError::Geometry(GeometryError::InvalidDimension(_)))
        ));

        let request = ResizeRequest {
            mode: ResizeMode::Percent,
            ..ResizeRequest::default()
        };
        assert!(
            plan_resize(&portrait(), &request, &PipelineConfig::default()).is_err()
        );
    }

    #[test]
    fn test_resize_rejects_non_positive() {
        for request in [
            ResizeRequest::pixels(0, 100),
            ResizeRequest::pixels(100, -1),
            ResizeRequest::width(-540),
        ] {
            assert!(matches!(
                plan_resize(&portrait(), &request, &PipelineConfig::default()),
                Err(EditError::Geometry(GeometryError::InvalidDimension(_)))
            ));
        }
    }

    #[test]
    fn test_resize_rejects_percent_out_of_range() {
        assert!(matches!(
            plan_resize(&portrait(), &ResizeRequest::percent(5), &PipelineConfig::default()),
            Err(EditError::Geometry(GeometryError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_resize_rejects_above_max_dimension() {
        let mut config = PipelineConfig::default();
        config.max_dimension = 2000;
        assert!(matches!(
            plan_resize(&portrait(), &ResizeRequest::pixels(2001, 100), &config),
            Err(EditError::OutOfRange { value: 2001, .. })
        ));
        assert!(matches!(
            plan_resize(&portrait(), &ResizeRequest::pixels(i64::MAX, 100), &config),
            Err(EditError::OutOfRange { .. })
        ));
        // Derived side is checked too: 1920 * 2 = 3840
        assert!(
            plan_resize(&portrait(), &ResizeRequest::percent(200), &config).is_err()
        );
    }

    #[test]
    fn test_full_crop() {
        let call = plan_crop(
            &portrait(),
            &CropRequest::new(0, 0, 1080, 1920),
            &PipelineConfig::default(),
        )
        .unwrap();
        match call {
            BackendCall::Crop { rect, .. } => assert!(rect.is_full(1080, 1920)),
            other => panic!("expected crop, got {other:?}"),
        }
    }

    #[test]
    fn test_crop_is_clamped() {
        let request = CropRequest::new(-10, 1800, 500, 500).with_shape(ShapeMask::Ellipse);
        let call = plan_crop(&portrait(), &request, &PipelineConfig::default()).unwrap();
        assert_eq!(
            call,
            BackendCall::Crop {
                source: portrait().current().reference().clone(),
                rect: CropRect {
                    x: 0,
                    y: 1800,
                    width: 490,
                    height: 120
                },
                shape_mask: ShapeMask::Ellipse,
                output_format: ImageFormat::RasterLossy,
                quality: 90,
            }
        );
    }

    #[test]
    fn test_crop_outside_is_empty_region() {
        let request = CropRequest::new(2000, 0, 100, 100);
        assert!(matches!(
            plan_crop(&portrait(), &request, &PipelineConfig::default()),
            Err(EditError::Geometry(GeometryError::EmptyRegion { .. }))
        ));
    }

    #[test]
    fn test_crop_rejects_bad_ratio() {
        let request = CropRequest::new(0, 0, 10, 10).with_ratio(Some(-1.0));
        assert!(
            plan_crop(&portrait(), &request, &PipelineConfig::default()).is_err()
        );
    }

    #[test]
    fn test_convert_lossless_to_lossy_requires_matte() {
        let request = ConvertRequest::new(ImageFormat::RasterLossy, 90);
        assert!(matches!(
            plan_convert(&png(), &request),
            Err(EditError::MissingMatteColor {
                from: ImageFormat::RasterLossless,
                to: ImageFormat::RasterLossy
            })
        ));

        let call = plan_convert(&png(), &request.with_matte(Rgb::WHITE)).unwrap();
        match call {
            BackendCall::Convert { matte_color, .. } => assert_eq!(matte_color, Some(Rgb::WHITE)),
            other => panic!("expected convert, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_drops_unneeded_matte() {
        let request = ConvertRequest::new(ImageFormat::RasterLossless, 100).with_matte(Rgb::BLACK);
        match plan_convert(&portrait(), &request).unwrap() {
            BackendCall::Convert {
                matte_color,
                target_format,
                ..
            } => {
                assert_eq!(matte_color, None);
                assert_eq!(target_format, ImageFormat::RasterLossless);
            }
            other => panic!("expected convert, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_lossy_to_lossy_needs_no_matte() {
        let request = ConvertRequest::new(ImageFormat::RasterLossy, 60);
        assert!(plan_convert(&portrait(), &request).is_ok());
    }

    #[test]
    fn test_convert_quality_bounds() {
        for quality in [0u8, 101, 255] {
            let request = ConvertRequest::new(ImageFormat::RasterLossy, quality);
            assert!(matches!(
                plan_convert(&portrait(), &request),
                Err(EditError::OutOfRange { name: "quality", .. })
            ));
        }
        assert!(
            plan_convert(&portrait(), &ConvertRequest::new(ImageFormat::RasterLossy, 1)).is_ok()
        );
        assert!(
            plan_convert(&portrait(), &ConvertRequest::new(ImageFormat::RasterLossy, 100)).is_ok()
        );
    }
}
