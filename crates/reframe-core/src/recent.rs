//! Recently edited images.
//!
//! The list itself lives in a host-provided [`RecentFilesStore`]. This module
//! only decides what the list looks like: newest first, one record per id, at
//! most [`RECENT_FILES_LIMIT`] records.

use crate::session::{HistoryEntry, ImageRef, OperationKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// Maximum number of records kept.
pub const RECENT_FILES_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecentFilesError {
    #[error("Failed to load recent files: {0}")]
    Load(String),
    #[error("Failed to save recent file: {0}")]
    Save(String),
}

/// One entry in the recent-files list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFile {
    pub id: String,
    pub image_ref: ImageRef,
    /// Display name chosen by the host, usually the source file name.
    pub label: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub operation: OperationKind,
}

impl RecentFile {
    /// Record for the image produced by a history entry.
    pub fn from_entry(entry: &HistoryEntry, label: impl Into<String>) -> Self {
        Self {
            id: format!(
                "{}-{}",
                entry.committed_at.timestamp_millis(),
                entry.id.value()
            ),
            image_ref: entry.image.reference().clone(),
            label: label.into(),
            timestamp: entry.committed_at,
            operation: entry.kind,
        }
    }
}

/// Persistent storage for recent files, provided by the host.
pub trait RecentFilesStore {
    /// Stored records in display order.
    fn load(&self) -> impl Future<Output = Result<Vec<RecentFile>, RecentFilesError>>;

    /// Replace the stored list.
    fn save(&self, files: &[RecentFile]) -> impl Future<Output = Result<(), RecentFilesError>>;
}

/// In-memory recent-files list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecentFiles {
    files: Vec<RecentFile>,
}

impl RecentFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from stored records, dropping duplicates and overflow.
    ///
    /// The first occurrence of an id wins, since stored lists are newest first.
    pub fn from_records(records: Vec<RecentFile>) -> Self {
        let mut files: Vec<RecentFile> = Vec::with_capacity(RECENT_FILES_LIMIT);
        for record in records {
            if files.len() == RECENT_FILES_LIMIT {
                break;
            }
            if !files.iter().any(|f| f.id == record.id) {
                files.push(record);
            }
        }
        Self { files }
    }

    /// Put `file` at the front, replacing any record with the same id.
    pub fn push(&mut self, file: RecentFile) {
        self.files.retain(|f| f.id != file.id);
        self.files.insert(0, file);
        self.files.truncate(RECENT_FILES_LIMIT);
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn as_slice(&self) -> &[RecentFile] {
        &self.files
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecentFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Read the list from `store`.
    pub async fn load<S: RecentFilesStore>(store: &S) -> Result<Self, RecentFilesError> {
        let records = store.load().await?;
        Ok(Self::from_records(records))
    }

    /// Add `file` and write the updated list back to `store`.
    ///
    /// The in-memory list is only updated once the store accepts it.
    pub async fn record<S: RecentFilesStore>(
        &mut self,
        store: &S,
        file: RecentFile,
    ) -> Result<(), RecentFilesError> {
        let mut updated = self.clone();
        updated.push(file);
        store.save(updated.as_slice()).await?;
        log::debug!("Recorded recent file, {} total", updated.len());
        *self = updated;
        Ok(())
    }
}
