//! Single in-flight operation per session.
//!
//! A host that runs the backend call itself (for example from JavaScript)
//! brackets it with [`Dispatcher::begin`] and [`Dispatcher::finish`]. The
//! returned [`Ticket`] records which session and which generation of its
//! state the call was planned against. A result that comes back after the
//! state has moved on, or after the session was replaced, is discarded
//! instead of being committed.

use super::backend::BackendCall;
use super::EditError;
use crate::session::{EditSessionState, ImageDescriptor, OperationKind, SessionId};

/// Proof that a backend call was started against a particular state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    serial: u64,
    session: SessionId,
    generation: u64,
    kind: OperationKind,
}

impl Ticket {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }

    /// Whether `state` is still the state this ticket was issued for.
    pub fn matches(&self, state: &EditSessionState) -> bool {
        self.session == state.session_id() && self.generation == state.generation()
    }
}

#[derive(Debug, Default)]
pub struct Dispatcher {
    in_flight: Option<Ticket>,
    issued: u64,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Register a call about to be sent to the backend.
    ///
    /// # Errors
    ///
    /// `OperationInFlight` if an earlier call has not finished or been
    /// abandoned.
    pub fn begin(
        &mut self,
        state: &EditSessionState,
        call: &BackendCall,
    ) -> Result<Ticket, EditError> {
        if let Some(pending) = self.in_flight {
            return Err(EditError::OperationInFlight(pending.kind));
        }

        self.issued += 1;
        let ticket = Ticket {
            serial: self.issued,
            session: state.session_id(),
            generation: state.generation(),
            kind: call.kind(),
        };
        self.in_flight = Some(ticket);
        Ok(ticket)
    }

    /// Commit the backend result for `ticket` onto `state`.
    ///
    /// The in-flight slot is released whether or not the commit happens.
    ///
    /// # Errors
    ///
    /// `StaleResult` if `ticket` is not the outstanding call or `state` has
    /// moved since the call was planned.
    pub fn finish(
        &mut self,
        ticket: Ticket,
        state: &EditSessionState,
        result: ImageDescriptor,
    ) -> Result<EditSessionState, EditError> {
        if self.in_flight != Some(ticket) {
            log::warn!("Discarding result for unknown ticket #{}", ticket.serial);
            return Err(EditError::StaleResult);
        }
        self.in_flight = None;

        if !ticket.matches(state) {
            log::warn!(
                "Discarding stale {} result #{} (session {} gen {}, now session {} gen {})",
                ticket.kind,
                ticket.serial,
                ticket.session.value(),
                ticket.generation,
                state.session_id().value(),
                state.generation()
            );
            return Err(EditError::StaleResult);
        }

        Ok(state.commit(ticket.kind, result))
    }

    /// Release the in-flight slot after a backend failure.
    ///
    /// Returns false if `ticket` was not the outstanding call.
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
            true
        } else {
            false
        }
    }

    /// Forget any outstanding call, e.g. when the session is replaced.
    pub fn reset(&mut self) {
        self.in_flight = None;
    }
}
