use serde::{Deserialize, Serialize};

use crate::EventSource;
use vaultiq_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code, when the error provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Whether retrying the operation might succeed.
    pub retryable: bool,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
        retryable: bool,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
            retryable,
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
            error.is_retryable(),
        )
    }
}

pub mod general;
pub mod verification;

pub use general::*;
pub use verification::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// Top-level operation events
    General(GeneralEvent),

    /// Document verification pipeline events
    Verification(VerificationEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Verification(_) => EventSource::VERIFICATION,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Verification(VerificationEvent::Failed { .. }) => Level::ERROR,

            Self::Verification(VerificationEvent::Cancelled { .. }) => Level::WARN,

            Self::Verification(
                VerificationEvent::MetadataParsed { .. }
                | VerificationEvent::CollaboratorStarted { .. }
                | VerificationEvent::CollaboratorCompleted { .. },
            ) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "vaultiq::events::general",
            Self::Verification(_) => "vaultiq::events::verification",
        }
    }

    /// Correlation identifier, when the event belongs to a verification run
    #[must_use]
    pub fn correlation_id(&self) -> Option<String> {
        match self {
            Self::Verification(event) => Some(event.verification_id().to_string()),
            Self::General(_) => None,
        }
    }
}
