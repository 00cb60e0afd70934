#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for async communication in VaultIQ
//!
//! Library crates never print or choose log sinks themselves. They emit
//! domain events through an optional channel and the binary decides how to
//! render or log them.

pub mod meta;
pub use meta::{EventLevel, EventMeta, EventSource};

pub mod events;
pub use events::{AppEvent, FailureContext, GeneralEvent, VerificationEvent};

use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;
use vaultiq_errors::{Collaborator, UserFacingError};
use vaultiq_types::VerificationStatus;

/// Type alias for event sender
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// An event paired with the metadata a consumer needs to log or forward it
#[derive(Debug, Clone, Serialize)]
pub struct EventMessage {
    pub meta: EventMeta,
    pub event: AppEvent,
}

impl EventMessage {
    /// Wrap an event, deriving level, source and correlation id from it
    #[must_use]
    pub fn new(event: AppEvent) -> Self {
        let mut meta = EventMeta::new(event.log_level(), event.event_source());
        if let Some(correlation_id) = event.correlation_id() {
            meta = meta.with_correlation_id(correlation_id);
        }
        Self { meta, event }
    }
}

impl From<AppEvent> for EventMessage {
    fn from(event: AppEvent) -> Self {
        Self::new(event)
    }
}

/// The unified trait for emitting events throughout VaultIQ
///
/// This trait provides a single, consistent API for emitting events regardless of
/// whether you have a raw `EventSender` or a struct that contains one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    /// Emit an operation started event
    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    /// Emit an operation completed event
    fn emit_operation_completed(&self, operation: impl Into<String>, success: bool) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
            success,
        }));
    }

    /// Emit a verification started event
    fn emit_verification_started(&self, verification_id: Uuid, document: impl Into<String>) {
        self.emit(AppEvent::Verification(VerificationEvent::Started {
            verification_id,
            document: document.into(),
        }));
    }

    /// Emit a collaborator started event
    fn emit_collaborator_started(&self, verification_id: Uuid, collaborator: Collaborator) {
        self.emit(AppEvent::Verification(
            VerificationEvent::CollaboratorStarted {
                verification_id,
                collaborator,
            },
        ));
    }

    /// Emit a collaborator completed event
    fn emit_collaborator_completed(
        &self,
        verification_id: Uuid,
        collaborator: Collaborator,
        score: Option<f64>,
        duration: Duration,
    ) {
        self.emit(AppEvent::Verification(
            VerificationEvent::CollaboratorCompleted {
                verification_id,
                collaborator,
                score,
                duration_ms: duration_millis(duration),
            },
        ));
    }

    /// Emit a verification completed event
    fn emit_verification_completed(
        &self,
        verification_id: Uuid,
        score: f64,
        status: VerificationStatus,
        duration: Duration,
    ) {
        self.emit(AppEvent::Verification(VerificationEvent::Completed {
            verification_id,
            score,
            status,
            duration_ms: duration_millis(duration),
        }));
    }

    /// Emit a verification failed event built from the error
    fn emit_verification_failed<E>(
        &self,
        verification_id: Uuid,
        collaborator: Option<Collaborator>,
        error: &E,
    ) where
        E: UserFacingError + ?Sized,
    {
        self.emit(AppEvent::Verification(VerificationEvent::Failed {
            verification_id,
            collaborator,
            failure: FailureContext::from_error(error),
        }));
    }
}

/// Implementation of `EventEmitter` for the raw `EventSender`
/// This allows `EventSender` to be used directly where `EventEmitter` is expected
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
