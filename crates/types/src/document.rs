//! Opaque document handles passed through to collaborators

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Reference to the document under verification.
///
/// The verifier never looks inside a document; it hands the same handle to
/// every collaborator that needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Document {
    /// A file on the local filesystem
    Path(PathBuf),
    /// An in-memory buffer
    Bytes(Vec<u8>),
    /// An external identifier such as an IPFS or HTTP URL
    Identifier(String),
}

impl Document {
    /// Create a handle for a file on disk
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::Path(path.into())
    }

    /// Create a handle for an external identifier
    pub fn from_identifier(id: impl Into<String>) -> Self {
        Self::Identifier(id.into())
    }

    /// The filesystem path, when the document is file-backed
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(path) => Some(path),
            _ => None,
        }
    }

    /// The raw bytes, when the document is held in memory
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

impl From<Vec<u8>> for Document {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<PathBuf> for Document {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Short description used in logs and events; never includes byte content.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Self::Identifier(id) => f.write_str(id),
        }
    }
}
