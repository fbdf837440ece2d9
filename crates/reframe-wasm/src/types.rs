//! JavaScript-facing wrapper types and error conversion.

use reframe_core::{
    estimated_size_kb, EditError, GeometryError, ImageDescriptor, ImageFormat, ImageRef, Rgb,
};
use wasm_bindgen::prelude::*;

/// Build a JS `Error` whose `name` is `kind`, so callers can branch on it.
pub(crate) fn js_error(kind: &str, message: &str) -> JsValue {
    let error = js_sys::Error::new(message);
    error.set_name(kind);
    error.into()
}

pub(crate) fn edit_error(error: EditError) -> JsValue {
    js_error(error.kind_name(), &error.to_string())
}

pub(crate) fn geometry_error(error: GeometryError) -> JsValue {
    edit_error(EditError::from(error))
}

pub(crate) fn serde_error(error: serde_wasm_bindgen::Error) -> JsValue {
    js_error("InvalidArgument", &error.to_string())
}

/// Parse a matte color typed by the user (`#RRGGBB`, `RRGGBB` or `#RGB`).
///
/// Returns `{ r, g, b }`, ready to use as a conversion's `matteColor`.
#[wasm_bindgen]
pub fn parse_color(text: &str) -> Result<JsValue, JsValue> {
    let color = Rgb::from_hex(text).map_err(edit_error)?;
    serde_wasm_bindgen::to_value(&color).map_err(serde_error)
}

/// Parse a format name as used by the UI.
///
/// Accepts the serialized names and the common file extensions.
pub(crate) fn parse_format(name: &str) -> Result<ImageFormat, String> {
    match name.trim().to_ascii_uppercase().as_str() {
        "RASTER_LOSSY" | "JPEG" | "JPG" => Ok(ImageFormat::RasterLossy),
        "RASTER_LOSSLESS" | "PNG" => Ok(ImageFormat::RasterLossless),
        _ => Err(format!("Unknown image format: {name:?}")),
    }
}

pub(crate) fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::RasterLossy => "RASTER_LOSSY",
        ImageFormat::RasterLossless => "RASTER_LOSSLESS",
    }
}

/// An image known to the session.
///
/// Only the reference and metadata live here; pixels stay with the host.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsImageDescriptor {
    inner: ImageDescriptor,
}

#[wasm_bindgen]
impl JsImageDescriptor {
    /// Describe an image the host has loaded or produced.
    ///
    /// # Arguments
    /// * `reference` - Opaque handle the backend can resolve (usually a URI)
    /// * `width` - Width in pixels, at least 1
    /// * `height` - Height in pixels, at least 1
    /// * `format` - "RASTER_LOSSY"/"jpeg" or "RASTER_LOSSLESS"/"png"
    #[wasm_bindgen(constructor)]
    pub fn new(
        reference: String,
        width: u32,
        height: u32,
        format: &str,
    ) -> Result<JsImageDescriptor, JsValue> {
        let format = parse_format(format).map_err(|e| js_error("InvalidArgument", &e))?;
        let inner = ImageDescriptor::new(ImageRef::new(reference), width, height, format)
            .map_err(geometry_error)?;
        Ok(Self { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn reference(&self) -> String {
        self.inner.reference().as_str().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        format_name(self.inner.format()).to_string()
    }

    /// File extension for the format, without the dot.
    #[wasm_bindgen(getter)]
    pub fn extension(&self) -> String {
        self.inner.format().extension().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.format().mime_type().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn supports_transparency(&self) -> bool {
        self.inner.format().supports_transparency()
    }

    /// Rough encoded size for the size readout.
    #[wasm_bindgen(getter)]
    pub fn estimated_size_kb(&self) -> f64 {
        estimated_size_kb(self.inner.width(), self.inner.height()) as f64
    }
}

impl JsImageDescriptor {
    pub(crate) fn from_core(inner: ImageDescriptor) -> Self {
        Self { inner }
    }

    pub(crate) fn as_core(&self) -> &ImageDescriptor {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(width: u32, height: u32, format: ImageFormat) -> JsImageDescriptor {
        JsImageDescriptor::from_core(
            ImageDescriptor::new(ImageRef::new("file://a"), width, height, format).unwrap(),
        )
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(parse_format("RASTER_LOSSY"), Ok(ImageFormat::RasterLossy));
        assert_eq!(parse_format("jpeg"), Ok(ImageFormat::RasterLossy));
        assert_eq!(parse_format(" Png "), Ok(ImageFormat::RasterLossless));
        assert!(parse_format("gif").is_err());
    }

    #[test]
    fn test_format_name_round_trips() {
        for format in [ImageFormat::RasterLossy, ImageFormat::RasterLossless] {
            assert_eq!(parse_format(format_name(format)), Ok(format));
        }
    }

    #[test]
    fn test_descriptor_getters() {
        let image = descriptor(1920, 1080, ImageFormat::RasterLossless);
        assert_eq!(image.width(), 1920);
        assert_eq!(image.height(), 1080);
        assert_eq!(image.reference(), "file://a");
        assert_eq!(image.format(), "RASTER_LOSSLESS");
        assert_eq!(image.extension(), "png");
        assert_eq!(image.mime_type(), "image/png");
        assert!(image.supports_transparency());
        assert_eq!(image.estimated_size_kb(), 2074.0);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_descriptor_rejects_zero_width() {
        let error = JsImageDescriptor::new("a".into(), 0, 10, "png").unwrap_err();
        let error: js_sys::Error = error.dyn_into().unwrap();
        assert_eq!(String::from(error.name()), "InvalidDimension");
    }

    #[wasm_bindgen_test]
    fn test_parse_color() {
        let value = parse_color("#f0a").unwrap();
        let red = js_sys::Reflect::get(&value, &"r".into()).unwrap();
        assert_eq!(red.as_f64(), Some(255.0));

        let error: js_sys::Error = parse_color("white").unwrap_err().dyn_into().unwrap();
        assert_eq!(String::from(error.name()), "InvalidColor");
    }

    #[wasm_bindgen_test]
    fn test_descriptor_rejects_unknown_format() {
        let error = JsImageDescriptor::new("a".into(), 10, 10, "tiff").unwrap_err();
        let error: js_sys::Error = error.dyn_into().unwrap();
        assert_eq!(String::from(error.name()), "InvalidArgument");
    }
}
