//! Recent-files list for the home screen.
//!
//! The host keeps the serialized list in its own storage; this wrapper
//! applies the list policy so every screen agrees on order and length.

use crate::types::serde_error;
use reframe_core::recent::{RecentFile, RecentFiles, RECENT_FILES_LIMIT};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
#[derive(Debug, Clone, Default)]
pub struct JsRecentFiles {
    inner: RecentFiles,
}

#[wasm_bindgen]
impl JsRecentFiles {
    /// Create an empty list.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a stored list. Duplicates and overflow are dropped.
    ///
    /// `undefined` or `null` give an empty list.
    pub fn from_json(value: JsValue) -> Result<JsRecentFiles, JsValue> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::new());
        }
        let records: Vec<RecentFile> = serde_wasm_bindgen::from_value(value).map_err(serde_error)?;
        Ok(Self::from_records(records))
    }

    /// Put a record (as returned by `JsEditSession.recent_file`) first.
    pub fn push(&mut self, record: JsValue) -> Result<(), JsValue> {
        let record: RecentFile = serde_wasm_bindgen::from_value(record).map_err(serde_error)?;
        self.inner.push(record);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn length(&self) -> usize {
        self.inner.len()
    }

    /// Maximum number of records kept.
    pub fn limit() -> usize {
        RECENT_FILES_LIMIT
    }

    /// Serialize for storage, newest first.
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(serde_error)
    }
}

impl JsRecentFiles {
    fn from_records(records: Vec<RecentFile>) -> Self {
        Self {
            inner: RecentFiles::from_records(records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use reframe_core::{ImageRef, OperationKind};

    fn record(id: &str) -> RecentFile {
        RecentFile {
            id: id.to_string(),
            image_ref: ImageRef::new(format!("file://{id}.png")),
            label: format!("{id}.png"),
            timestamp: Utc.timestamp_millis_opt(1_700_000_000_000).unwrap(),
            operation: OperationKind::Crop,
        }
    }

    #[test]
    fn test_from_records_applies_policy() {
        let records = ["a", "a", "b", "c", "d", "e", "f"].map(record).to_vec();
        let list = JsRecentFiles::from_records(records);

        assert_eq!(list.length(), JsRecentFiles::limit());
        let ids: Vec<&str> = list.inner.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_clear() {
        let mut list = JsRecentFiles::from_records(vec![record("a")]);
        list.clear();
        assert_eq!(list.length(), 0);
    }
}
