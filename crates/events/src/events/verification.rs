use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vaultiq_errors::Collaborator;
use vaultiq_types::VerificationStatus;

use super::FailureContext;

/// Document verification lifecycle events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum VerificationEvent {
    /// A verification run began
    Started {
        verification_id: Uuid,
        document: String,
    },

    /// Metadata text parsed into a structured record
    MetadataParsed {
        verification_id: Uuid,
        fields: usize,
    },

    /// A collaborator call is about to be awaited
    CollaboratorStarted {
        verification_id: Uuid,
        collaborator: Collaborator,
    },

    /// A collaborator call returned successfully
    CollaboratorCompleted {
        verification_id: Uuid,
        collaborator: Collaborator,
        #[serde(skip_serializing_if = "Option::is_none")]
        score: Option<f64>,
        duration_ms: u64,
    },

    /// Verdict reached
    Completed {
        verification_id: Uuid,
        score: f64,
        status: VerificationStatus,
        duration_ms: u64,
    },

    /// The run failed; no result was produced
    Failed {
        verification_id: Uuid,
        #[serde(skip_serializing_if = "Option::is_none")]
        collaborator: Option<Collaborator>,
        failure: FailureContext,
    },

    /// The caller cancelled the run before it finished
    Cancelled { verification_id: Uuid },
}

impl VerificationEvent {
    /// Identifier of the run this event belongs to
    #[must_use]
    pub fn verification_id(&self) -> Uuid {
        match self {
            Self::Started {
                verification_id, ..
            }
            | Self::MetadataParsed {
                verification_id, ..
            }
            | Self::CollaboratorStarted {
                verification_id, ..
            }
            | Self::CollaboratorCompleted {
                verification_id, ..
            }
            | Self::Completed {
                verification_id, ..
            }
            | Self::Failed {
                verification_id, ..
            }
            | Self::Cancelled { verification_id } => *verification_id,
        }
    }
}
