//! Error types for the namespace registry.

use thiserror::Error;

/// Structured error types for registry lookups.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No namespace is registered under the key
    #[error("Unknown namespace '{key}'")]
    UnknownNamespace { key: String },

    /// A namespace is already registered under the key
    #[error("Namespace '{key}' is already open")]
    DuplicateNamespace { key: String },
}

impl RegistryError {
    /// Check if this error indicates a missing namespace
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::UnknownNamespace { .. })
    }

    /// Check if this error indicates a duplicate registration
    pub fn is_already_exists(&self) -> bool {
        matches!(self, RegistryError::DuplicateNamespace { .. })
    }
}

// Conversion from RegistryError to the main Error type
impl From<RegistryError> for crate::Error {
    fn from(err: RegistryError) -> Self {
        crate::Error::Registry(err)
    }
}
