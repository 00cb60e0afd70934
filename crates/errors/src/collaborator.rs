//! Errors raised by the external scoring collaborators

use std::borrow::Cow;
use std::fmt;

use crate::UserFacingError;
use thiserror::Error;

/// The three external collaborators consulted during verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Collaborator {
    /// OCR text extraction
    Ocr,
    /// Forgery / fraud detection
    Forgery,
    /// Market value plausibility
    Market,
}

impl Collaborator {
    /// Stable lower-case name used in logs, events and config sections
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ocr => "ocr",
            Self::Forgery => "forgery",
            Self::Market => "market",
        }
    }
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum CollaboratorError {
    #[error("{collaborator} collaborator failed: {message}")]
    Failed {
        collaborator: Collaborator,
        message: String,
    },

    #[error("{collaborator} collaborator returned out-of-range score {score}")]
    ScoreOutOfRange {
        collaborator: Collaborator,
        score: f64,
    },

    #[error("{collaborator} collaborator produced invalid output: {message}")]
    InvalidOutput {
        collaborator: Collaborator,
        message: String,
    },

    #[error("{collaborator} command `{program}` exited with {status}: {stderr}")]
    CommandFailed {
        collaborator: Collaborator,
        program: String,
        status: String,
        stderr: String,
    },

    #[error("no {collaborator} collaborator configured")]
    NotConfigured { collaborator: Collaborator },
}

impl CollaboratorError {
    /// Convenience constructor for a generic collaborator failure
    pub fn failed(collaborator: Collaborator, message: impl Into<String>) -> Self {
        Self::Failed {
            collaborator,
            message: message.into(),
        }
    }

    /// Which collaborator raised this error
    #[must_use]
    pub fn collaborator(&self) -> Collaborator {
        match self {
            Self::Failed { collaborator, .. }
            | Self::ScoreOutOfRange { collaborator, .. }
            | Self::InvalidOutput { collaborator, .. }
            | Self::CommandFailed { collaborator, .. }
            | Self::NotConfigured { collaborator } => *collaborator,
        }
    }
}

impl UserFacingError for CollaboratorError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::ScoreOutOfRange { .. } => Some(
                "The collaborator returned a score outside [0, 1]; relax `score_policy` or fix the model.",
            ),
            Self::InvalidOutput { .. } => {
                Some("Collaborators must print a JSON value or a bare numeric score.")
            }
            Self::NotConfigured { .. } => {
                Some("Add a [collaborators.<name>] section with a `program` to the configuration.")
            }
            Self::CommandFailed { .. } => Some("Run the collaborator command by hand to inspect its output."),
            Self::Failed { .. } => None,
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::CommandFailed { .. })
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::Failed { .. } => Some("collaborator.failed"),
            Self::ScoreOutOfRange { .. } => Some("collaborator.score_out_of_range"),
            Self::InvalidOutput { .. } => Some("collaborator.invalid_output"),
            Self::CommandFailed { .. } => Some("collaborator.command_failed"),
            Self::NotConfigured { .. } => Some("collaborator.not_configured"),
        }
    }
}
