//! Handling of collaborator scores that fall outside the nominal range

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use vaultiq_errors::{Collaborator, CollaboratorError};

/// What to do with a collaborator score outside `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Use scores exactly as returned, even when out of range
    Passthrough,
    /// Clamp scores into `[0.0, 1.0]`; NaN is still rejected
    Clamp,
    /// Fail the verification on any out-of-range or non-finite score
    Reject,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self::Passthrough
    }
}

impl ScorePolicy {
    /// Apply the policy to a score returned by `collaborator`.
    ///
    /// # Errors
    ///
    /// Returns `CollaboratorError::ScoreOutOfRange` when the policy refuses
    /// the score.
    pub fn apply(self, collaborator: Collaborator, score: f64) -> Result<f64, CollaboratorError> {
        match self {
            Self::Passthrough => Ok(score),
            Self::Clamp if score.is_nan() => Err(CollaboratorError::ScoreOutOfRange {
                collaborator,
                score,
            }),
            Self::Clamp => Ok(score.clamp(0.0, 1.0)),
            Self::Reject if (0.0..=1.0).contains(&score) => Ok(score),
            Self::Reject => Err(CollaboratorError::ScoreOutOfRange {
                collaborator,
                score,
            }),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::Clamp => "clamp",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for ScorePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passthrough" => Ok(Self::Passthrough),
            "clamp" => Ok(Self::Clamp),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown score policy: {other}")),
        }
    }
}
