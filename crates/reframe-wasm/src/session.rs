//! The live edit session exposed to JavaScript.
//!
//! The UI owns the pixel backend (the platform image manipulator), so an
//! operation is split in two:
//!
//! ```typescript
//! const pending = session.prepare_resize({ targetWidth: 540, aspectLocked: true });
//! try {
//!   const output = await manipulate(pending.call());
//!   const image = new JsImageDescriptor(output.uri, output.width, output.height, 'png');
//!   session.complete(pending, image);
//! } catch (e) {
//!   session.fail(pending, String(e));
//! }
//! ```
//!
//! `prepare_*` validates and returns exactly what to send to the backend;
//! `complete` commits the result unless the session moved on in between.

use crate::types::{edit_error, js_error, serde_error, JsImageDescriptor};
use chrono::{DateTime, Utc};
use reframe_core::pipeline::{plan_convert, plan_crop, plan_resize};
use reframe_core::{
    export_file_name, BackendCall, ConvertRequest, CropRequest, Dispatcher, EditError,
    EditSessionState, ImageDescriptor, PipelineConfig, RecentFile, ResizeRequest, Ticket,
    Transition,
};
use wasm_bindgen::prelude::*;

/// An operation that has been validated and is waiting on the backend.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct JsPendingOperation {
    ticket: Ticket,
    call: BackendCall,
}

#[wasm_bindgen]
impl JsPendingOperation {
    /// Operation kind: "RESIZE", "CROP" or "CONVERT".
    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        format!("{:?}", self.ticket.kind()).to_ascii_uppercase()
    }

    #[wasm_bindgen(getter)]
    pub fn serial(&self) -> f64 {
        self.ticket.serial() as f64
    }

    /// Backend parameters, tagged by `operation`.
    pub fn call(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.call).map_err(serde_error)
    }
}

/// One image's edit session.
#[wasm_bindgen]
pub struct JsEditSession {
    state: EditSessionState,
    dispatcher: Dispatcher,
    config: PipelineConfig,
}

#[wasm_bindgen]
impl JsEditSession {
    /// Start a session on a freshly loaded image with default settings.
    #[wasm_bindgen(constructor)]
    pub fn new(initial: &JsImageDescriptor) -> JsEditSession {
        Self::start(initial.as_core().clone(), PipelineConfig::default())
    }

    /// Start a session with settings given as `{ outputQuality, maxDimension }`.
    /// Missing fields take their defaults.
    pub fn with_config(
        initial: &JsImageDescriptor,
        config: JsValue,
    ) -> Result<JsEditSession, JsValue> {
        let config: PipelineConfig = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(serde_error)?
        };
        config.validate().map_err(edit_error)?;
        Ok(Self::start(initial.as_core().clone(), config))
    }

    /// Throw away the history and start over on another image.
    ///
    /// A result still in flight for the old image will be rejected.
    pub fn replace(&mut self, initial: &JsImageDescriptor) {
        self.state = EditSessionState::start(initial.as_core().clone());
        self.dispatcher.reset();
    }

    pub fn current(&self) -> JsImageDescriptor {
        JsImageDescriptor::from_core(self.state.current().clone())
    }

    pub fn original(&self) -> JsImageDescriptor {
        JsImageDescriptor::from_core(self.state.original().clone())
    }

    /// Step back one entry. Returns false if already at the original.
    pub fn undo(&mut self) -> bool {
        self.step(EditSessionState::undo)
    }

    /// Step forward one entry. Returns false if already at the newest.
    pub fn redo(&mut self) -> bool {
        self.step(EditSessionState::redo)
    }

    #[wasm_bindgen(getter)]
    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    #[wasm_bindgen(getter)]
    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    #[wasm_bindgen(getter)]
    pub fn has_changes(&self) -> bool {
        self.state.has_changes()
    }

    #[wasm_bindgen(getter)]
    pub fn cursor(&self) -> usize {
        self.state.cursor()
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.state.len()
    }

    /// Aspect ratio captured when the session started.
    #[wasm_bindgen(getter)]
    pub fn aspect_ratio(&self) -> f64 {
        self.state.aspect_ratio().value()
    }

    /// Whether an operation is waiting on the backend.
    #[wasm_bindgen(getter)]
    pub fn is_busy(&self) -> bool {
        self.dispatcher.is_busy()
    }

    /// History entries, oldest first.
    pub fn history(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.state.entries()).map_err(serde_error)
    }

    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.config).map_err(serde_error)
    }

    /// Validate a resize request and reserve the backend slot.
    pub fn prepare_resize(&mut self, request: JsValue) -> Result<JsPendingOperation, JsValue> {
        let request: ResizeRequest = serde_wasm_bindgen::from_value(request).map_err(serde_error)?;
        self.begin_resize(&request).map_err(edit_error)
    }

    /// Validate a crop request and reserve the backend slot.
    pub fn prepare_crop(&mut self, request: JsValue) -> Result<JsPendingOperation, JsValue> {
        let request: CropRequest = serde_wasm_bindgen::from_value(request).map_err(serde_error)?;
        self.begin_crop(&request).map_err(edit_error)
    }

    /// Validate a conversion request and reserve the backend slot.
    pub fn prepare_convert(&mut self, request: JsValue) -> Result<JsPendingOperation, JsValue> {
        let request: ConvertRequest =
            serde_wasm_bindgen::from_value(request).map_err(serde_error)?;
        self.begin_convert(&request).map_err(edit_error)
    }

    /// Commit the backend's output for `pending`.
    ///
    /// Throws `StaleResult` if the session was undone, redone or replaced
    /// while the backend was working; the output is not recorded.
    pub fn complete(
        &mut self,
        pending: &JsPendingOperation,
        output: &JsImageDescriptor,
    ) -> Result<JsImageDescriptor, JsValue> {
        self.finish(pending, output.as_core().clone())
            .map(JsImageDescriptor::from_core)
            .map_err(edit_error)
    }

    /// Release the backend slot after the backend failed.
    ///
    /// The session is left exactly as it was before `prepare_*`.
    pub fn fail(&mut self, pending: &JsPendingOperation, message: &str) -> bool {
        log::warn!(
            "{} #{} failed: {}",
            pending.ticket.kind(),
            pending.ticket.serial(),
            message
        );
        self.dispatcher.abandon(pending.ticket)
    }

    /// Recent-files record for the current image.
    pub fn recent_file(&self, label: &str) -> Result<JsValue, JsValue> {
        let record = RecentFile::from_entry(self.state.current_entry(), label);
        serde_wasm_bindgen::to_value(&record).map_err(serde_error)
    }

    /// Suggested file name for exporting the current image.
    ///
    /// `timestamp_ms` is milliseconds since the Unix epoch, as from `Date.now()`.
    pub fn export_file_name(&self, timestamp_ms: f64) -> Result<String, JsValue> {
        let timestamp = timestamp_from_millis(timestamp_ms).ok_or_else(|| {
            let message = format!("invalid timestamp: {timestamp_ms}");
            js_error("InvalidArgument", &message)
        })?;
        let entry = self.state.current_entry();
        let format = entry.image.format();
        Ok(export_file_name(entry.kind, timestamp, format))
    }
}

/// Convert a JS `Date.now()` value. `None` for NaN, infinities and values
/// outside chrono's range.
fn timestamp_from_millis(millis: f64) -> Option<DateTime<Utc>> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64)
}

impl JsEditSession {
    fn start(initial: ImageDescriptor, config: PipelineConfig) -> Self {
        Self {
            state: EditSessionState::start(initial),
            dispatcher: Dispatcher::new(),
            config,
        }
    }

    fn step(&mut self, transition: fn(&EditSessionState) -> Transition) -> bool {
        let transition = transition(&self.state);
        let moved = !transition.is_no_op();
        self.state = transition.into_state();
        moved
    }

    fn begin(&mut self, call: BackendCall) -> Result<JsPendingOperation, EditError> {
        let ticket = self.dispatcher.begin(&self.state, &call)?;
        log::debug!("Prepared {} #{}", ticket.kind(), ticket.serial());
        Ok(JsPendingOperation { ticket, call })
    }

    fn begin_resize(&mut self, request: &ResizeRequest) -> Result<JsPendingOperation, EditError> {
        let call = plan_resize(&self.state, request, &self.config)?;
        self.begin(call)
    }

    fn begin_crop(&mut self, request: &CropRequest) -> Result<JsPendingOperation, EditError> {
        let call = plan_crop(&self.state, request, &self.config)?;
        self.begin(call)
    }

    fn begin_convert(&mut self, request: &ConvertRequest) -> Result<JsPendingOperation, EditError> {
        let call = plan_convert(&self.state, request)?;
        self.begin(call)
    }

    fn finish(
        &mut self,
        pending: &JsPendingOperation,
        output: ImageDescriptor,
    ) -> Result<ImageDescriptor, EditError> {
        let predicted = pending.call.predicted_dimensions(self.state.current());
        if output.dimensions() != predicted {
            log::warn!(
                "{} output is {}x{}, expected {}x{}",
                pending.ticket.kind(),
                output.width(),
                output.height(),
                predicted.width,
                predicted.height
            );
        }

        self.state = self.dispatcher.finish(pending.ticket, &self.state, output)?;
        Ok(self.state.current().clone())
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn initial() -> JsImageDescriptor {
        JsImageDescriptor::new("file://orig.png".into(), 1080, 1920, "png").unwrap()
    }

    fn request(json: &[(&str, JsValue)]) -> JsValue {
        let object = js_sys::Object::new();
        for (key, value) in json {
            js_sys::Reflect::set(&object, &(*key).into(), value).unwrap();
        }
        object.into()
    }

    fn error_name(value: JsValue) -> String {
        let error: js_sys::Error = value.dyn_into().unwrap();
        String::from(error.name())
    }

    #[wasm_bindgen_test]
    fn test_prepare_resize_from_js_object() {
        let mut session = JsEditSession::new(&initial());
        let pending = session
            .prepare_resize(request(&[
                ("mode", "PIXELS".into()),
                ("targetWidth", 540.into()),
                ("aspectLocked", true.into()),
            ]))
            .unwrap();

        let call = pending.call().unwrap();
        let height = js_sys::Reflect::get(&call, &"targetHeight".into()).unwrap();
        assert_eq!(height.as_f64(), Some(960.0));

        let output = JsImageDescriptor::new("file://out.png".into(), 540, 960, "png").unwrap();
        let current = session.complete(&pending, &output).unwrap();
        assert_eq!(current.width(), 540);
    }

    #[wasm_bindgen_test]
    fn test_prepare_convert_missing_matte() {
        let mut session = JsEditSession::new(&initial());
        let error = session
            .prepare_convert(request(&[
                ("targetFormat", "RASTER_LOSSY".into()),
                ("lossyQuality", 80.into()),
            ]))
            .unwrap_err();
        assert_eq!(error_name(error), "MissingMatteColor");
    }

    #[wasm_bindgen_test]
    fn test_export_file_name_rejects_nan() {
        let session = JsEditSession::new(&initial());
        let error = session.export_file_name(f64::NAN).unwrap_err();
        assert_eq!(error_name(error), "InvalidArgument");
    }

    #[wasm_bindgen_test]
    fn test_with_config_rejects_zero_quality() {
        let config = request(&[("outputQuality", 0.into())]);
        let error = JsEditSession::with_config(&initial(), config).err().unwrap();
        assert_eq!(error_name(error), "OutOfRange");
    }
}
