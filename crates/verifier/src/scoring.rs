//! Aggregation and decision rules

use vaultiq_types::VerificationStatus;

/// Combine the forgery and market scores into the final score.
#[must_use]
pub fn aggregate(fraud: f64, market: f64) -> f64 {
    (fraud + market) / 2.0
}

/// Classify a final score. Approval requires strictly exceeding the
/// threshold; a NaN score is never approved.
#[must_use]
pub fn classify(score: f64, threshold: f64) -> VerificationStatus {
    if score > threshold {
        VerificationStatus::Approved
    } else {
        VerificationStatus::Flagged
    }
}
