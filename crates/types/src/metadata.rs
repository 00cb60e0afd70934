//! Structured metadata attached to a document submission

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vaultiq_errors::MetadataError;

/// Key/value metadata parsed from a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    /// Parse metadata from its serialized text form.
    ///
    /// # Errors
    ///
    /// Returns `MetadataError::Malformed` if the text is not valid JSON and
    /// `MetadataError::NotAnObject` if the root value is not an object.
    pub fn parse(text: &str) -> Result<Self, MetadataError> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(MetadataError::NotAnObject {
                found: json_kind(&other).to_string(),
            }),
        }
    }

    /// Look up a top-level field
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying JSON map
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Serialize back to compact JSON text
    #[must_use]
    pub fn to_json_string(&self) -> String {
        // A map of JSON values always serializes.
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
