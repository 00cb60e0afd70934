//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields so the
//! JSON subscriber produces machine-readable verification logs.

use vaultiq_events::{AppEvent, EventMessage, GeneralEvent, VerificationEvent};
use tracing::{debug, error, info, warn};

/// Log an event at its own level with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    let source = meta.source.as_str();

    match &message.event {
        AppEvent::Verification(event) => match event {
            VerificationEvent::Started {
                verification_id,
                document,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    %verification_id,
                    document = %document,
                    "Verification started"
                );
            }
            VerificationEvent::MetadataParsed {
                verification_id,
                fields,
            } => {
                debug!(
                    source,
                    event_id = %meta.event_id,
                    %verification_id,
                    fields,
                    "Metadata parsed"
                );
            }
            VerificationEvent::CollaboratorStarted {
                verification_id,
                collaborator,
            } => {
                debug!(
                    source,
                    event_id = %meta.event_id,
                    %verification_id,
                    collaborator = collaborator.as_str(),
                    "Collaborator called"
                );
            }
            VerificationEvent::CollaboratorCompleted {
                verification_id,
                collaborator,
                score,
                duration_ms,
            } => {
                debug!(
                    source,
                    event_id = %meta.event_id,
                    %verification_id,
                    collaborator = collaborator.as_str(),
                    score = ?score,
                    duration_ms,
                    "Collaborator returned"
                );
            }
            VerificationEvent::Completed {
                verification_id,
                score,
                status,
                duration_ms,
            } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    %verification_id,
                    score,
                    status = status.as_str(),
                    duration_ms,
                    "Verification completed"
                );
            }
            VerificationEvent::Failed {
                verification_id,
                collaborator,
                failure,
            } => {
                error!(
                    source,
                    event_id = %meta.event_id,
                    %verification_id,
                    collaborator = collaborator.map(|c| c.as_str()),
                    code = failure.code.as_deref(),
                    retryable = failure.retryable,
                    "Verification failed: {}",
                    failure.message
                );
            }
            VerificationEvent::Cancelled { verification_id } => {
                warn!(
                    source,
                    event_id = %meta.event_id,
                    %verification_id,
                    "Verification cancelled"
                );
            }
        },

        AppEvent::General(event) => match event {
            GeneralEvent::OperationStarted { operation } => {
                info!(source, event_id = %meta.event_id, operation = %operation, "Operation started");
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(
                    source,
                    event_id = %meta.event_id,
                    operation = %operation,
                    success,
                    "Operation completed"
                );
            }
        },
    }
}
