//! Kind changes between markers, groups and group-markers.
//!
//! Supported changes:
//!
//! | from        | to          | effect                                   |
//! |-------------|-------------|------------------------------------------|
//! | Marker      | GroupMarker | gains an empty child list                |
//! | GroupMarker | Group       | drops its coordinates, keeps children    |
//! | GroupMarker | Marker      | drops its children and their subtrees    |
//! | Group       | GroupMarker | needs coordinates, see [`Namespace::anchor_group`] |
//!
//! Each change replaces the node: the old entry leaves both indexes and the
//! new one is indexed under the same path with a fresh payload. Operations never
//! interleave, so no caller can observe the path while it is briefly unindexed.

use tracing::debug;

use super::{Namespace, NamespaceError};
use crate::{
    Result,
    constants::ROOT_PATH,
    index::Presenter,
    node::{Anchor, Node, NodeBody, NodeId, NodeKind, path},
};

impl<R: Presenter> Namespace<R> {
    /// Changes the kind of the node at `path`.
    ///
    /// Returns false when the node already has kind `to`.
    pub fn transform(&mut self, path: &str, to: NodeKind) -> Result<bool> {
        let id = self.resolve(path)?;
        let node = self.node(id)?;
        let from = node.kind();
        if from == to {
            return Ok(false);
        }
        if id == self.tree.root() {
            return Err(NamespaceError::RootNode {
                operation: "transform",
            }
            .into());
        }

        let body = match (&node.body, to) {
            (NodeBody::Marker { anchor }, NodeKind::GroupMarker) => NodeBody::GroupMarker {
                anchor: anchor.clone(),
                color: String::new(),
                children: Vec::new(),
            },
            (NodeBody::GroupMarker { color, children, .. }, NodeKind::Group) => NodeBody::Group {
                color: color.clone(),
                children: children.clone(),
            },
            (NodeBody::GroupMarker { anchor, .. }, NodeKind::Marker) => NodeBody::Marker {
                anchor: anchor.clone(),
            },
            _ => {
                return Err(NamespaceError::InvalidTransform {
                    path: path.to_string(),
                    from,
                    to,
                }
                .into());
            }
        };

        self.replace_node(id, path, body)?;
        debug!(path, %from, %to, "Transformed node");
        Ok(true)
    }

    /// Turns the group at `path` into a group-marker anchored at `anchor`.
    ///
    /// Children are kept.
    pub fn anchor_group(&mut self, path: &str, anchor: Anchor) -> Result<()> {
        let id = self.resolve(path)?;
        if id == self.tree.root() {
            return Err(NamespaceError::RootNode {
                operation: "anchor",
            }
            .into());
        }
        let node = self.node(id)?;
        let body = match &node.body {
            NodeBody::Group { color, children } => NodeBody::GroupMarker {
                anchor,
                color: color.clone(),
                children: children.clone(),
            },
            _ => {
                return Err(NamespaceError::InvalidTransform {
                    path: path.to_string(),
                    from: node.kind(),
                    to: NodeKind::GroupMarker,
                }
                .into());
            }
        };

        self.replace_node(id, path, body)?;
        debug!(path, "Anchored group");
        Ok(())
    }

    /// Supersedes the node `id` at `path` with a node of the same name and parent.
    ///
    /// Children the new body no longer references are freed along with their
    /// subtrees and index entries.
    fn replace_node(
        &mut self,
        id: NodeId,
        path: &str,
        body: NodeBody,
    ) -> std::result::Result<(), NamespaceError> {
        let parent = self.parent_of(id)?;
        let old = self.node(id)?;
        let replacement = Node {
            name: old.name.clone(),
            parent_path: old.parent_path.clone(),
            body,
        };
        let dropped: Vec<NodeId> = old
            .children()
            .iter()
            .filter(|child| !replacement.children().contains(*child))
            .copied()
            .collect();

        // Cut the old entry.
        let position = self.unlink(parent, id)?;
        if self.paths.delete(path).is_none() || self.presentation.delete(path).is_none() {
            return Err(NamespaceError::invariant(format!(
                "'{path}' is missing from an index"
            )));
        }
        for child in dropped {
            let child_path = match self.tree.get(child) {
                Some(node) => node.full_path(),
                None => continue,
            };
            self.paths.delete_subtree(&child_path);
            self.presentation.delete_subtree(&child_path);
            self.tree.free_subtree(child);
        }
        self.tree.free(id);

        // Insert the new one in the same slot.
        let payload = self.presenter.present(path, &replacement);
        let new_id = self.tree.alloc(replacement);
        self.children_of_mut(parent)?.insert(position, new_id);
        self.sort_children(parent)?;
        self.paths.set(path, new_id);
        self.presentation.set(path, payload);

        if !self.node(new_id)?.is_group_like() && path::is_within(&self.active, path) {
            self.active = ROOT_PATH.to_string();
        }
        Ok(())
    }
}
