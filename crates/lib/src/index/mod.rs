//! Flat path-keyed indexes over a namespace tree.
//!
//! Two indexes are kept next to every tree:
//!
//! * [`PathIndex`] maps each full path to the handle of the node living there.
//! * [`PresentationIndex`] maps the same paths to opaque payloads produced by the
//!   rendering collaborator (see [`Presenter`]).
//!
//! Both preserve insertion order. That order is observable: line-collision
//! detection keeps the first marker it meets. Subtree operations scan every key.

use indexmap::IndexMap;

use crate::node::{NodeId, Tree, path};

mod presentation;
pub use presentation::{PresentationIndex, Presenter};

/// Map from full path to node handle.
#[derive(Debug, Clone, Default)]
pub struct PathIndex {
    entries: IndexMap<String, NodeId>,
}

impl PathIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<NodeId> {
        self.entries.get(path).copied()
    }

    pub fn set(&mut self, path: impl Into<String>, id: NodeId) {
        self.entries.insert(path.into(), id);
    }

    /// Removes a single key, keeping the order of the remaining ones.
    pub fn delete(&mut self, path: &str) -> Option<NodeId> {
        self.entries.shift_remove(path)
    }

    /// Removes `prefix` and every key beneath it, returning the removed entries.
    pub fn delete_subtree(&mut self, prefix: &str) -> Vec<(String, NodeId)> {
        let mut removed = Vec::new();
        self.entries.retain(|key, id| {
            if path::is_within(key, prefix) {
                removed.push((key.clone(), *id));
                false
            } else {
                true
            }
        });
        removed
    }

    /// Clears the index and repopulates it by walking the tree from its root.
    pub fn rebuild(&mut self, tree: &Tree) {
        self.entries.clear();
        self.entries.extend(tree.paths_under(tree.root()));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Marker-like entries bound to `file`, in index order.
    pub fn markers_in<'a>(
        &'a self,
        tree: &'a Tree,
        file: &'a str,
    ) -> impl Iterator<Item = (&'a str, NodeId)> + 'a {
        self.iter().filter(move |(_, id)| {
            tree.get(*id)
                .and_then(|node| node.anchor())
                .is_some_and(|anchor| anchor.file_path == file)
        })
    }

    /// Paths of markers in `file` whose line is already taken by an earlier entry.
    ///
    /// The first marker seen on a line keeps it; every later one is reported.
    pub fn find_line_collisions(&self, tree: &Tree, file: &str) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.markers_in(tree, file)
            .filter_map(|(key, id)| {
                let line = tree.get(id)?.anchor()?.line;
                (!seen.insert(line)).then(|| key.to_string())
            })
            .collect()
    }
}
