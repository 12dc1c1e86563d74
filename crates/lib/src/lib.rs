//!
//! Waymark: hierarchical code bookmarks that keep their place.
//! This library provides the engine behind a bookmark tree: structure, indexes,
//! line tracking and persistence. Rendering and storage are left to the host.
//!
//! ## Core Concepts
//!
//! * **Nodes (`node::Node`)**: Groups, markers and group-markers, addressed by a
//!   `/`-separated full path. Markers carry an `Anchor` (file, line, column and
//!   a snapshot of the line text).
//! * **Path Index (`index::PathIndex`)**: The authoritative map from full path to
//!   node, covering exactly the nodes reachable from the root.
//! * **Presentation Index (`index::PresentationIndex`)**: One host-defined
//!   payload per node, produced by a `Presenter` and kept key-for-key aligned
//!   with the Path Index.
//! * **Namespaces (`namespace::Namespace`)**: One isolated tree with its indexes
//!   and an active group. All structural operations go through it.
//! * **Line shifting (`shift`)**: Applies document edits to the markers of a
//!   file and re-anchors markers against changed content.
//! * **Persistence (`persist`)**: The JSON document a namespace is saved as.
//! * **Registry (`registry::Registry`)**: Namespaces keyed by workspace, with
//!   post-mutation hooks.

pub mod config;
pub mod constants;
pub mod index;
pub mod namespace;
pub mod node;
pub mod persist;
pub mod registry;
pub mod shift;

pub use config::Config;
pub use index::{PathIndex, PresentationIndex, Presenter};
pub use namespace::{Namespace, NamespaceError, OrderingStrategy};
pub use node::{Anchor, Node, NodeId, NodeKind, SortPolicy, Tree};
pub use persist::{PersistError, StoredNode};
pub use registry::{Change, MutationContext, MutationHook, Registry, RegistryError};
pub use shift::{EditOutcome, LineEdit};

/// Result type used throughout the Waymark library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Waymark library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured tree errors from the namespace module
    #[error(transparent)]
    Namespace(namespace::NamespaceError),

    /// Structured document errors from the persist module
    #[error(transparent)]
    Persist(persist::PersistError),

    /// Structured lookup errors from the registry module
    #[error(transparent)]
    Registry(registry::RegistryError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Namespace(_) => "namespace",
            Error::Persist(_) => "persist",
            Error::Registry(_) => "registry",
        }
    }

    /// Check if this error indicates a node or namespace was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Namespace(ns_err) => ns_err.is_not_found(),
            Error::Registry(registry_err) => registry_err.is_not_found(),
            Error::Persist(_) => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Namespace(ns_err) => ns_err.is_conflict(),
            Error::Registry(registry_err) => registry_err.is_already_exists(),
            _ => false,
        }
    }

    /// Check if the request itself was invalid (bad name, wrong node kind, cycle).
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Error::Namespace(ns_err) => ns_err.is_invalid_argument(),
            _ => false,
        }
    }

    /// Check if the namespace was found in an inconsistent state.
    pub fn is_invariant_violation(&self) -> bool {
        match self {
            Error::Namespace(ns_err) => ns_err.is_invariant_violation(),
            _ => false,
        }
    }

    /// Check if this error concerns a persisted document.
    pub fn is_persist_error(&self) -> bool {
        matches!(self, Error::Persist(_))
    }
}
