//! Metadata parsing error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum MetadataError {
    #[error("malformed metadata at line {line}, column {column}: {message}")]
    Malformed {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("metadata must be a JSON object, found {found}")]
    NotAnObject { found: String },
}

impl MetadataError {
    /// Whether the payload failed to parse as structured data at all
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            message: err.to_string(),
            line: err.line(),
            column: err.column(),
        }
    }
}

impl UserFacingError for MetadataError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Malformed { .. } => Some("Pass metadata as a valid JSON document."),
            Self::NotAnObject { .. } => {
                Some("Wrap the metadata in a JSON object, e.g. {\"value\": 1000}.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Self::Malformed { .. } => Some("metadata.malformed"),
            Self::NotAnObject { .. } => Some("metadata.not_an_object"),
        }
    }
}
