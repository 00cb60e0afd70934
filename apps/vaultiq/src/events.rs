//! Event handling and progress display

use console::{Style, Term};
use vaultiq_events::{AppEvent, EventMessage, VerificationEvent};

use crate::logging::log_event_with_tracing;

/// Routes events to tracing and prints progress lines on stderr
pub struct EventHandler {
    /// Whether progress lines are printed at all
    show_progress: bool,
    /// Whether to style progress lines
    colors_enabled: bool,
    term: Term,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(show_progress: bool, colors_enabled: bool) -> Self {
        Self {
            show_progress,
            colors_enabled,
            term: Term::stderr(),
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: AppEvent) {
        let message = EventMessage::new(event);
        log_event_with_tracing(&message);

        if !self.show_progress {
            return;
        }
        if let Some(line) = progress_line(&message.event) {
            self.show_status(&line);
        }
    }

    fn show_status(&self, message: &str) {
        let line = if self.colors_enabled {
            Style::new().dim().apply_to(message).to_string()
        } else {
            message.to_string()
        };
        self.term.write_line(&line).unwrap_or(());
    }
}

fn progress_line(event: &AppEvent) -> Option<String> {
    let AppEvent::Verification(event) = event else {
        return None;
    };
    match event {
        VerificationEvent::Started { document, .. } => Some(format!("Verifying {document}")),
        VerificationEvent::CollaboratorStarted { collaborator, .. } => {
            Some(format!("  running {collaborator} check"))
        }
        VerificationEvent::CollaboratorCompleted {
            collaborator,
            score: Some(score),
            duration_ms,
            ..
        } => Some(format!(
            "  {collaborator} score {score:.4} ({duration_ms} ms)"
        )),
        VerificationEvent::CollaboratorCompleted {
            collaborator,
            duration_ms,
            ..
        } => Some(format!("  {collaborator} done ({duration_ms} ms)")),
        VerificationEvent::Cancelled { .. } => Some("Verification cancelled".to_string()),
        VerificationEvent::MetadataParsed { .. }
        | VerificationEvent::Completed { .. }
        | VerificationEvent::Failed { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_progress_lines() {
        let id = Uuid::nil();
        let started = AppEvent::Verification(VerificationEvent::CollaboratorStarted {
            verification_id: id,
            collaborator: vaultiq_types::Collaborator::Forgery,
        });
        assert_eq!(
            progress_line(&started).as_deref(),
            Some("  running forgery check")
        );

        let completed = AppEvent::Verification(VerificationEvent::CollaboratorCompleted {
            verification_id: id,
            collaborator: vaultiq_types::Collaborator::Market,
            score: Some(0.61),
            duration_ms: 12,
        });
        assert_eq!(
            progress_line(&completed).as_deref(),
            Some("  market score 0.6100 (12 ms)")
        );

        let parsed = AppEvent::Verification(VerificationEvent::MetadataParsed {
            verification_id: id,
            fields: 3,
        });
        assert!(progress_line(&parsed).is_none());
    }

    #[test]
    fn test_handler_without_progress() {
        let mut handler = EventHandler::new(false, false);
        handler.handle_event(AppEvent::Verification(VerificationEvent::Cancelled {
            verification_id: Uuid::nil(),
        }));
    }
}
