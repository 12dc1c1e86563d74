//! Presentation payloads keyed by full path.

use indexmap::IndexMap;

use crate::node::{Node, path};

/// Produces the UI payload for a node.
///
/// Implemented by whatever renders the namespace (a tree view, a CLI listing).
/// The engine calls [`Presenter::present`] whenever a node needs a payload it
/// does not already have; payloads of surviving nodes are re-keyed instead of
/// recreated, so state attached to them outlives renames and moves.
pub trait Presenter {
    type Payload;

    /// Creates the payload for `node`, which lives at `path`.
    fn present(&self, path: &str, node: &Node) -> Self::Payload;
}

/// Map from full path to presentation payload.
///
/// Its key set always matches the namespace's [`PathIndex`](super::PathIndex).
#[derive(Debug, Clone)]
pub struct PresentationIndex<P> {
    entries: IndexMap<String, P>,
}

impl<P> Default for PresentationIndex<P> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<P> PresentationIndex<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&P> {
        self.entries.get(path)
    }

    pub fn set(&mut self, path: impl Into<String>, payload: P) {
        self.entries.insert(path.into(), payload);
    }

    /// Removes a single key and hands back its payload.
    pub fn delete(&mut self, path: &str) -> Option<P> {
        self.entries.shift_remove(path)
    }

    /// Removes `prefix` and every key beneath it, returning the removed entries.
    pub fn delete_subtree(&mut self, prefix: &str) -> Vec<(String, P)> {
        let (removed, kept): (IndexMap<_, _>, IndexMap<_, _>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|(key, _)| path::is_within(key, prefix));
        self.entries = kept;
        removed.into_iter().collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
