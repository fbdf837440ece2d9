//! Edit session: the current image, its history, and the undo/redo cursor.
//!
//! An [`EditSessionState`] is a value. Every transition takes `&self` and
//! returns a new state, so a renderer holding the previous state never sees a
//! half-applied change.
//!
//! # State Machine
//!
//! States are positions in the history. Transitions are:
//!
//! - [`commit`](EditSessionState::commit): drop everything after the cursor,
//!   append, move the cursor to the new entry
//! - [`undo`](EditSessionState::undo) / [`redo`](EditSessionState::redo):
//!   move the cursor by one, or report [`Transition::NoOp`] at a boundary
//!
//! There is no close transition; a session lives until its owner drops it.
//!
//! # Invariants
//!
//! - `history` is never empty and its first entry is `Original`
//! - `cursor < history.len()`
//! - the current image is `history[cursor].image`

mod types;

pub use types::{
    EntryId, HistoryEntry, ImageDescriptor, ImageFormat, ImageRef, OperationKind,
};

use crate::geometry::AspectRatio;
use chrono::Utc;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_SESSION: AtomicU64 = AtomicU64::new(1);
static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Stamp for a new state. Unique across all sessions and branches.
fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// Identifies one editing activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Snapshot of an editing session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditSessionState {
    session: SessionId,
    history: Vec<HistoryEntry>,
    cursor: usize,
    aspect_ratio: AspectRatio,
    generation: u64,
    next_entry: u64,
}

/// Result of a cursor move.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Transition {
    /// The cursor moved; holds the new state.
    Moved(EditSessionState),
    /// The cursor was already at the boundary; holds the unchanged state.
    NoOp(EditSessionState),
}

impl Transition {
    pub fn is_no_op(&self) -> bool {
        matches!(self, Transition::NoOp(_))
    }

    pub fn state(&self) -> &EditSessionState {
        match self {
            Transition::Moved(state) | Transition::NoOp(state) => state,
        }
    }

    pub fn into_state(self) -> EditSessionState {
        match self {
            Transition::Moved(state) | Transition::NoOp(state) => state,
        }
    }
}

impl EditSessionState {
    /// Start a session with a single `Original` entry.
    ///
    /// The aspect ratio used by locked resizes is captured here and never
    /// recomputed for the life of the session.
    pub fn start(initial: ImageDescriptor) -> Self {
        let session = SessionId::next();
        log::info!(
            "Session {} started with {} ({}x{})",
            session.0,
            initial.reference(),
            initial.width(),
            initial.height()
        );

        Self {
            session,
            aspect_ratio: initial.aspect_ratio(),
            history: vec![HistoryEntry {
                id: EntryId(0),
                kind: OperationKind::Original,
                image: initial,
                committed_at: Utc::now(),
            }],
            cursor: 0,
            generation: next_generation(),
            next_entry: 1,
        }
    }

    /// Append a committed operation.
    ///
    /// Entries after the cursor (the redo branch) are discarded first. This
    /// cannot fail.
    pub fn commit(&self, kind: OperationKind, image: ImageDescriptor) -> Self {
        let mut history = Vec::with_capacity(self.cursor + 2);
        history.extend_from_slice(&self.history[..=self.cursor]);

        let dropped = self.history.len() - history.len();
        if dropped > 0 {
            log::debug!(
                "Session {}: discarding {} redo entr{}",
                self.session.0,
                dropped,
                if dropped == 1 { "y" } else { "ies" }
            );
        }

        let id = EntryId(self.next_entry);
        log::debug!(
            "Session {}: commit {} #{} -> {}x{}",
            self.session.0,
            kind,
            id.0,
            image.width(),
            image.height()
        );

        history.push(HistoryEntry {
            id,
            kind,
            image,
            committed_at: Utc::now(),
        });

        Self {
            session: self.session,
            cursor: history.len() - 1,
            history,
            aspect_ratio: self.aspect_ratio,
            generation: next_generation(),
            next_entry: self.next_entry + 1,
        }
    }

    /// Step back one entry.
    pub fn undo(&self) -> Transition {
        if self.can_undo() {
            Transition::Moved(self.with_cursor(self.cursor - 1))
        } else {
            log::debug!("Session {}: undo at first entry", self.session.0);
            Transition::NoOp(self.clone())
        }
    }

    /// Step forward one entry.
    pub fn redo(&self) -> Transition {
        if self.can_redo() {
            Transition::Moved(self.with_cursor(self.cursor + 1))
        } else {
            log::debug!("Session {}: redo at last entry", self.session.0);
            Transition::NoOp(self.clone())
        }
    }

    /// The image the user is looking at.
    pub fn current(&self) -> &ImageDescriptor {
        &self.current_entry().image
    }

    pub fn current_entry(&self) -> &HistoryEntry {
        &self.history[self.cursor]
    }

    /// The image the session started from.
    pub fn original(&self) -> &ImageDescriptor {
        &self.history[0].image
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Always false; a session holds at least its original entry.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    /// Whether the current image differs from the original entry.
    pub fn has_changes(&self) -> bool {
        self.cursor > 0
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn session_id(&self) -> SessionId {
        self.session
    }

    /// Stamp of this state. Every transition that moves or appends gets a
    /// fresh one, so two branches from the same snapshot never share it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn with_cursor(&self, cursor: usize) -> Self {
        log::debug!(
            "Session {}: cursor {} -> {}",
            self.session.0,
            self.cursor,
            cursor
        );
        Self {
            cursor,
            generation: next_generation(),
            ..self.clone()
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
