//! Error types for namespace operations.

use thiserror::Error;

use crate::node::NodeKind;

/// Structured error types for structural namespace operations.
///
/// Every variant except [`NamespaceError::InvariantViolation`] is raised before
/// the namespace is touched, so the caller can report it and carry on.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum NamespaceError {
    /// A node already exists at the path the operation would write to
    #[error("A node already exists at '{path}'")]
    NameConflict { path: String },

    /// The path does not resolve to a node
    #[error("No node at '{path}'")]
    NodeNotFound { path: String },

    /// The name cannot be used as a path segment
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The path resolves to a node that cannot hold children
    #[error("'{path}' is not a group")]
    NotAGroup { path: String },

    /// The operation cannot be applied to the namespace root
    #[error("Cannot {operation} the namespace root")]
    RootNode { operation: &'static str },

    /// A node cannot be moved into itself or one of its descendants
    #[error("Cannot move '{path}' into its own subtree at '{target}'")]
    CyclicMove { path: String, target: String },

    /// The requested kind change is not supported
    #[error("Cannot transform '{path}' from {from} to {to}")]
    InvalidTransform {
        path: String,
        from: NodeKind,
        to: NodeKind,
    },

    /// Tree and indexes disagree; the namespace is corrupt
    #[error("Namespace invariant violated: {reason}")]
    InvariantViolation { reason: String },
}

impl NamespaceError {
    /// Check if this error indicates a path did not resolve
    pub fn is_not_found(&self) -> bool {
        matches!(self, NamespaceError::NodeNotFound { .. })
    }

    /// Check if this error indicates a path collision
    pub fn is_conflict(&self) -> bool {
        matches!(self, NamespaceError::NameConflict { .. })
    }

    /// Check if this error indicates a corrupted namespace
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, NamespaceError::InvariantViolation { .. })
    }

    /// Check if this error was a rejected argument rather than a missing target
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            NamespaceError::InvalidName { .. }
                | NamespaceError::NotAGroup { .. }
                | NamespaceError::RootNode { .. }
                | NamespaceError::CyclicMove { .. }
                | NamespaceError::InvalidTransform { .. }
        )
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&str> {
        match self {
            NamespaceError::NameConflict { path }
            | NamespaceError::NodeNotFound { path }
            | NamespaceError::NotAGroup { path }
            | NamespaceError::CyclicMove { path, .. }
            | NamespaceError::InvalidTransform { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }

    pub(crate) fn invariant(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        tracing::error!(%reason, "Namespace invariant violated");
        NamespaceError::InvariantViolation { reason }
    }
}

// Conversion from NamespaceError to the main Error type
impl From<NamespaceError> for crate::Error {
    fn from(err: NamespaceError) -> Self {
        crate::Error::Namespace(err)
    }
}
