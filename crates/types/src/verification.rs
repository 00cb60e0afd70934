//! Verification outcome types

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Output of the OCR collaborator, embedded in the result untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedData(Value);

impl ExtractedData {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Wrap plain extracted text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self(Value::String(text.into()))
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl From<Value> for ExtractedData {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Final verdict for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Approved,
    Flagged,
}

impl VerificationStatus {
    #[must_use]
    pub fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Flagged => "flagged",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-collaborator breakdown of a verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationDetails {
    /// Forgery detection score
    pub fraud: f64,
    /// Market plausibility score
    pub market: f64,
    /// OCR output as produced by the extractor
    pub ocr_data: ExtractedData,
}

/// Result record returned by a successful verification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    /// Mean of the fraud and market scores
    pub score: f64,
    pub status: VerificationStatus,
    pub details: VerificationDetails,
}

impl VerificationResult {
    /// Render as pretty JSON for CLI output
    ///
    /// # Errors
    ///
    /// Returns an error if the result contains values JSON cannot represent.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
