//! Moving nodes between groups, and exporting or importing whole subtrees.

use std::collections::HashMap;

use tracing::debug;

use super::{Namespace, NamespaceError};
use crate::{
    Result,
    index::Presenter,
    node::{NodeId, path},
    persist::StoredNode,
};

/// Where a moved or imported node lands among the destination's children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingStrategy {
    /// After the last child.
    #[default]
    Append,
    /// At an index into the destination's children as they were before the move.
    ///
    /// Within one parent, moving a node forward places it right after the
    /// sibling that held the index; moving it backward places it right before.
    /// Indexes past the end append.
    AtIndex(usize),
}

impl OrderingStrategy {
    /// Insertion position into a child list that already lost the moved node.
    ///
    /// Removing the node first is what produces the forward/backward adjacency:
    /// a sibling that sat after the node shifts down by one, so inserting at its
    /// old index lands behind it.
    pub fn position(self, len: usize) -> usize {
        match self {
            OrderingStrategy::Append => len,
            OrderingStrategy::AtIndex(index) => index.min(len),
        }
    }
}

impl<R: Presenter> Namespace<R> {
    /// Moves the node at `path` into the group at `target_group`.
    ///
    /// Payloads of the moved subtree are re-keyed, not recreated. Returns the
    /// node's new full path.
    pub fn move_node(
        &mut self,
        path: &str,
        target_group: &str,
        strategy: OrderingStrategy,
    ) -> Result<String> {
        let id = self.resolve(path)?;
        if id == self.tree.root() {
            return Err(NamespaceError::RootNode { operation: "move" }.into());
        }
        let target = self.resolve_group(target_group)?;
        if path::is_within(target_group, path) {
            return Err(NamespaceError::CyclicMove {
                path: path.to_string(),
                target: target_group.to_string(),
            }
            .into());
        }
        let node = self.node(id)?;
        let same_parent = node.parent_path == target_group;
        let new_path = path::join(target_group, &node.name);
        if !same_parent && self.paths.exists(&new_path) {
            return Err(NamespaceError::NameConflict { path: new_path }.into());
        }
        let parent = self.parent_of(id)?;

        self.unlink(parent, id)?;
        let mut payloads = self.detach_keys(path)?;
        self.node_mut(id)?.parent_path = target_group.to_string();
        self.rebase_descendants(id, path, &new_path)?;

        let children = self.children_of_mut(target)?;
        let position = strategy.position(children.len());
        children.insert(position, id);
        self.sort_children(target)?;
        self.attach_keys(id, &mut payloads);

        self.follow_active(path, &new_path);
        debug!(from = path, to = %new_path, ?strategy, "Moved node");
        Ok(new_path)
    }

    /// Copies the subtree at `path` into its persisted form.
    pub fn export_subtree(&self, path: &str) -> Result<StoredNode> {
        let id = self.resolve(path)?;
        Ok(StoredNode::from_tree(&self.tree, id)?)
    }

    /// Checks that [`Namespace::import_subtree`] would accept `stored` under `group_path`.
    pub fn check_import(&self, stored: &StoredNode, group_path: &str) -> Result<()> {
        self.resolve_group(group_path)?;
        let full_path = path::join(group_path, stored.name());
        if self.paths.exists(&full_path) {
            return Err(NamespaceError::NameConflict { path: full_path }.into());
        }
        stored.validate_names()?;
        Ok(())
    }

    /// Adds a persisted subtree under the group at `group_path`.
    ///
    /// Stored parent paths are ignored: every imported node is rewritten to sit
    /// where it lands, and every node gets a fresh payload. Returns the full path
    /// of the imported subtree's top node.
    pub fn import_subtree(
        &mut self,
        stored: StoredNode,
        group_path: &str,
        strategy: OrderingStrategy,
    ) -> Result<String> {
        self.check_import(&stored, group_path)?;
        let target = self.resolve_group(group_path)?;

        let id = self.graft(stored, group_path)?;
        let children = self.children_of_mut(target)?;
        let position = strategy.position(children.len());
        children.insert(position, id);
        self.sort_children(target)?;
        self.attach_keys(id, &mut HashMap::new());

        let full_path = path::join(group_path, &self.node(id)?.name);
        debug!(path = %full_path, "Imported subtree");
        Ok(full_path)
    }

    /// Allocates `stored` and its descendants beneath `parent_path`.
    fn graft(
        &mut self,
        stored: StoredNode,
        parent_path: &str,
    ) -> std::result::Result<NodeId, NamespaceError> {
        let (mut node, children) = stored.into_parts();
        node.parent_path = parent_path.to_string();
        let own_path = node.full_path();
        let id = self.tree.alloc(node);
        for child in children {
            let child_id = self.graft(child, &own_path)?;
            self.children_of_mut(id)?.push(child_id);
        }
        if !self.node(id)?.children().is_empty() {
            self.sort_children(id)?;
        }
        Ok(id)
    }
}
