//! Consistency checks between a namespace's tree and its indexes.

use std::collections::HashSet;

use super::{Namespace, NamespaceError};
use crate::index::Presenter;

impl<R: Presenter> Namespace<R> {
    /// Verifies that tree, Path Index, Presentation Index and active pointer agree.
    ///
    /// Walks the whole namespace; meant for tests and for hosts that want to
    /// audit a namespace loaded from disk.
    pub fn check_invariants(&self) -> Result<(), NamespaceError> {
        let reachable = self.tree.paths_under(self.tree.root());

        let mut seen = HashSet::new();
        for (key, id) in &reachable {
            if !seen.insert(key.as_str()) {
                return Err(NamespaceError::invariant(format!(
                    "two siblings share the path '{key}'"
                )));
            }
            if self.paths.get(key) != Some(*id) {
                return Err(NamespaceError::invariant(format!(
                    "'{key}' is reachable but not indexed to its node"
                )));
            }
            let node = self.node(*id)?;
            if node.full_path() != *key {
                return Err(NamespaceError::invariant(format!(
                    "node at '{key}' records its path as '{}'",
                    node.full_path()
                )));
            }
        }

        if self.paths.len() != reachable.len() || self.tree.len() != reachable.len() {
            return Err(NamespaceError::invariant(format!(
                "{} reachable nodes, {} indexed paths, {} stored nodes",
                reachable.len(),
                self.paths.len(),
                self.tree.len()
            )));
        }

        let presented: HashSet<&str> = self.presentation.keys().collect();
        let indexed: HashSet<&str> = self.paths.keys().collect();
        if presented != indexed {
            return Err(NamespaceError::invariant(
                "presentation keys differ from indexed paths",
            ));
        }

        let active_ok = self.query(&self.active).is_some_and(|node| node.is_group_like());
        if !active_ok {
            return Err(NamespaceError::invariant(format!(
                "active group '{}' is not a group",
                self.active
            )));
        }
        Ok(())
    }
}
