//! Error types for loading and saving namespace documents.

use thiserror::Error;

/// Structured error types for namespace persistence.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PersistError {
    /// A node in the document cannot be placed in the tree
    #[error("Malformed namespace document at '{path}': {reason}")]
    MalformedPersistedTree { path: String, reason: String },

    /// The document is not valid JSON or does not match the expected shape
    #[error("Namespace document serialization failed: {source}")]
    Serialization {
        #[source]
        source: serde_json::Error,
    },
}

impl PersistError {
    /// Check if this error means the document was readable but inconsistent
    pub fn is_malformed(&self) -> bool {
        matches!(self, PersistError::MalformedPersistedTree { .. })
    }

    /// Check if this error came from serde
    pub fn is_serialization_error(&self) -> bool {
        matches!(self, PersistError::Serialization { .. })
    }
}

// Conversion from PersistError to the main Error type
impl From<PersistError> for crate::Error {
    fn from(err: PersistError) -> Self {
        crate::Error::Persist(err)
    }
}
