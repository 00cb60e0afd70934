//! Scoring configuration for document verification

use crate::constants::DEFAULT_APPROVAL_THRESHOLD;
use serde::{Deserialize, Serialize};
use vaultiq_types::ScorePolicy;

/// Verification scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// The mean score must be strictly greater than this to approve
    #[serde(default = "default_approval_threshold")]
    pub approval_threshold: f64,
    #[serde(default)]
    pub score_policy: ScorePolicy,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            approval_threshold: DEFAULT_APPROVAL_THRESHOLD,
            score_policy: ScorePolicy::default(),
        }
    }
}

fn default_approval_threshold() -> f64 {
    DEFAULT_APPROVAL_THRESHOLD
}
