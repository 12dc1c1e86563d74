//! Namespaces: one bookmark tree plus the indexes derived from it.
//!
//! A [`Namespace`] owns a [`Tree`], a [`PathIndex`], a [`PresentationIndex`] and
//! the path of the active group. It is the only writer of all four, and every
//! structural operation keeps them aligned:
//!
//! * the Path Index holds exactly the full paths reachable from the root;
//! * the Presentation Index holds exactly the same keys;
//! * sibling names are unique, so every full path names one node.
//!
//! Operations validate against the Path Index before touching anything, so a
//! recoverable error leaves the namespace unchanged. An
//! [`NamespaceError::InvariantViolation`] means the namespace was already
//! corrupt; it aborts the operation and is never repaired.
//!
//! # Example
//!
//! ```rust
//! use waymark::{Anchor, Config, Namespace, Node, Presenter};
//!
//! struct Labels;
//!
//! impl Presenter for Labels {
//!     type Payload = String;
//!     fn present(&self, path: &str, _node: &Node) -> String {
//!         format!("[{path}]")
//!     }
//! }
//!
//! let mut ns = Namespace::new(Labels, Config::default());
//! ns.insert(Node::group("todo", "yellow"), "")?;
//! ns.insert(Node::marker("parser", Anchor::new("src/parse.rs", 41, 0)), "todo")?;
//!
//! let renamed = ns.rename("todo", "later")?;
//! assert_eq!(renamed, "later");
//! assert!(ns.query("later/parser").is_some());
//! // Payloads follow their node through the rename.
//! assert_eq!(ns.payload("later/parser").map(String::as_str), Some("[todo/parser]"));
//! # Ok::<(), waymark::Error>(())
//! ```

use std::collections::HashMap;

use tracing::debug;

use crate::{
    Config, Result,
    constants::ROOT_PATH,
    index::{PathIndex, PresentationIndex, Presenter},
    node::{Node, NodeId, Tree, path},
};

mod checks;
mod errors;
mod moves;
mod transform;

pub use errors::NamespaceError;
pub use moves::OrderingStrategy;

/// Payloads detached from the Presentation Index, keyed by the node they belong to.
pub(crate) type DetachedPayloads<P> = HashMap<NodeId, P>;

/// One isolated bookmark tree with its Path and Presentation indexes.
pub struct Namespace<R: Presenter> {
    pub(crate) tree: Tree,
    pub(crate) paths: PathIndex,
    pub(crate) presentation: PresentationIndex<R::Payload>,
    pub(crate) presenter: R,
    pub(crate) active: String,
    pub(crate) config: Config,
}

impl<R: Presenter> Namespace<R> {
    /// Creates a namespace holding only the root group.
    pub fn new(presenter: R, config: Config) -> Self {
        let mut namespace = Self {
            tree: Tree::new(),
            paths: PathIndex::new(),
            presentation: PresentationIndex::new(),
            presenter,
            active: ROOT_PATH.to_string(),
            config,
        };
        namespace.rebuild_indexes(HashMap::new());
        namespace
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn paths(&self) -> &PathIndex {
        &self.paths
    }

    pub fn presentation(&self) -> &PresentationIndex<R::Payload> {
        &self.presentation
    }

    pub fn presenter(&self) -> &R {
        &self.presenter
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Path of the group new markers are added to by default.
    pub fn active_group(&self) -> &str {
        &self.active
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when the namespace holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.paths.len() <= 1
    }

    /// Looks up the node at `path`.
    pub fn query(&self, path: &str) -> Option<&Node> {
        self.paths.get(path).and_then(|id| self.tree.get(id))
    }

    /// Presentation payload of the node at `path`.
    pub fn payload(&self, path: &str) -> Option<&R::Payload> {
        self.presentation.get(path)
    }

    /// Full paths of the node at `path` and all of its descendants, in pre-order.
    pub fn list_subtree(&self, path: &str) -> Result<Vec<String>> {
        let id = self.resolve(path)?;
        Ok(self
            .tree
            .paths_under(id)
            .into_iter()
            .map(|(path, _)| path)
            .collect())
    }

    /// Paths of every marker-like node bound to `file`, in index order.
    pub fn markers_in(&self, file: &str) -> Vec<String> {
        self.paths
            .markers_in(&self.tree, file)
            .map(|(path, _)| path.to_string())
            .collect()
    }

    /// Inserts a detached node into the group at `group_path`.
    ///
    /// The node enters the tree without children. Returns its full path.
    pub fn insert(&mut self, node: Node, group_path: &str) -> Result<String> {
        path::validate_name(&node.name)?;
        let group = self.resolve_group(group_path)?;
        let full_path = path::join(group_path, &node.name);
        if self.paths.exists(&full_path) {
            return Err(NamespaceError::NameConflict { path: full_path }.into());
        }

        let mut node = node;
        node.parent_path = group_path.to_string();
        node.clear_children();
        let payload = self.presenter.present(&full_path, &node);
        let id = self.tree.alloc(node);
        self.children_of_mut(group)?.push(id);
        self.sort_children(group)?;
        self.paths.set(full_path.clone(), id);
        self.presentation.set(full_path.clone(), payload);

        debug!(path = %full_path, "Inserted node");
        Ok(full_path)
    }

    /// Deletes the node at `path` together with its whole subtree.
    pub fn delete(&mut self, path: &str) -> Result<()> {
        let id = self.resolve(path)?;
        if id == self.tree.root() {
            return Err(NamespaceError::RootNode {
                operation: "delete",
            }
            .into());
        }
        let parent = self.parent_of(id)?;
        let group_like = self.node(id)?.is_group_like();
        self.unlink(parent, id)?;

        if group_like {
            let keys = self.paths.delete_subtree(path).len();
            let payloads = self.presentation.delete_subtree(path).len();
            let freed = self.tree.free_subtree(id);
            if keys != payloads || keys != freed {
                return Err(NamespaceError::invariant(format!(
                    "deleting '{path}' removed {keys} keys, {payloads} payloads and {freed} nodes"
                ))
                .into());
            }
        } else {
            self.paths.delete(path);
            self.tree.free(id);
            if self.presentation.delete(path).is_none() {
                return Err(
                    NamespaceError::invariant(format!("no payload indexed at '{path}'")).into(),
                );
            }
        }

        if path::is_within(&self.active, path) {
            self.active = ROOT_PATH.to_string();
        }
        debug!(path, "Deleted node");
        Ok(())
    }

    /// Renames the node at `path`, returning its new full path.
    ///
    /// Renaming a group rewrites the stored parent path of every descendant and
    /// rebuilds both indexes from the root, carrying each node's payload over.
    pub fn rename(&mut self, path: &str, new_name: &str) -> Result<String> {
        path::validate_name(new_name)?;
        let id = self.resolve(path)?;
        if id == self.tree.root() {
            return Err(NamespaceError::RootNode {
                operation: "rename",
            }
            .into());
        }
        let node = self.node(id)?;
        if node.name == new_name {
            return Ok(path.to_string());
        }
        let new_path = path::join(&node.parent_path, new_name);
        let group_like = node.is_group_like();
        if self.paths.exists(&new_path) {
            return Err(NamespaceError::NameConflict { path: new_path }.into());
        }
        let parent = self.parent_of(id)?;

        if group_like {
            let payloads = self.detach_keys(ROOT_PATH)?;
            self.node_mut(id)?.name = new_name.to_string();
            self.rebase_descendants(id, path, &new_path)?;
            self.sort_children(parent)?;
            self.rebuild_indexes(payloads);
        } else {
            self.node_mut(id)?.name = new_name.to_string();
            self.sort_children(parent)?;
            self.paths.delete(path);
            self.paths.set(new_path.clone(), id);
            let payload = self.presentation.delete(path).ok_or_else(|| {
                NamespaceError::invariant(format!("no payload indexed at '{path}'"))
            })?;
            self.presentation.set(new_path.clone(), payload);
        }

        self.follow_active(path, &new_path);
        debug!(from = path, to = %new_path, "Renamed node");
        Ok(new_path)
    }

    /// Makes the group at `path` the active group.
    ///
    /// Returns false, changing nothing, when it already is active or when `path`
    /// does not name a group-like node.
    pub fn activate(&mut self, path: &str) -> bool {
        if self.active == path {
            return false;
        }
        match self.query(path) {
            Some(node) if node.is_group_like() => {
                self.active = path.to_string();
                debug!(path, "Activated group");
                true
            }
            _ => false,
        }
    }

    pub(crate) fn resolve(&self, path: &str) -> std::result::Result<NodeId, NamespaceError> {
        self.paths
            .get(path)
            .ok_or_else(|| NamespaceError::NodeNotFound {
                path: path.to_string(),
            })
    }

    pub(crate) fn resolve_group(&self, path: &str) -> std::result::Result<NodeId, NamespaceError> {
        let id = self.resolve(path)?;
        if self.node(id)?.is_group_like() {
            Ok(id)
        } else {
            Err(NamespaceError::NotAGroup {
                path: path.to_string(),
            })
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> std::result::Result<&Node, NamespaceError> {
        self.tree
            .get(id)
            .ok_or_else(|| NamespaceError::invariant(format!("indexed node {id:?} is not in the tree")))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> std::result::Result<&mut Node, NamespaceError> {
        self.tree
            .get_mut(id)
            .ok_or_else(|| NamespaceError::invariant(format!("indexed node {id:?} is not in the tree")))
    }

    /// Locates the group a node declares as its parent.
    pub(crate) fn parent_of(&self, id: NodeId) -> std::result::Result<NodeId, NamespaceError> {
        let node = self.node(id)?;
        self.paths
            .get(&node.parent_path)
            .filter(|parent| self.tree.get(*parent).is_some_and(Node::is_group_like))
            .ok_or_else(|| {
                NamespaceError::invariant(format!(
                    "parent '{}' of '{}' cannot be located",
                    node.parent_path,
                    node.full_path()
                ))
            })
    }

    pub(crate) fn children_of_mut(
        &mut self,
        group: NodeId,
    ) -> std::result::Result<&mut Vec<NodeId>, NamespaceError> {
        self.node_mut(group)?
            .children_mut()
            .ok_or_else(|| NamespaceError::invariant(format!("node {group:?} cannot hold children")))
    }

    pub(crate) fn sort_children(&mut self, group: NodeId) -> std::result::Result<(), NamespaceError> {
        let mut children = std::mem::take(self.children_of_mut(group)?);
        self.config.sort.sort(&mut children, &self.tree);
        *self.children_of_mut(group)? = children;
        Ok(())
    }

    /// Removes `id` from its parent's child list, returning the index it held.
    pub(crate) fn unlink(
        &mut self,
        parent: NodeId,
        id: NodeId,
    ) -> std::result::Result<usize, NamespaceError> {
        let children = self.children_of_mut(parent)?;
        let position = children.iter().position(|child| *child == id).ok_or_else(|| {
            NamespaceError::invariant(format!("node {id:?} is missing from its parent's children"))
        })?;
        children.remove(position);
        Ok(position)
    }

    /// Rewrites the stored parent path of every descendant of `id` from `old` to `new`.
    pub(crate) fn rebase_descendants(
        &mut self,
        id: NodeId,
        old: &str,
        new: &str,
    ) -> std::result::Result<(), NamespaceError> {
        let descendants: Vec<NodeId> = self.tree.walk(id).skip(1).map(|(_, d)| d).collect();
        for descendant in descendants {
            let node = self.node_mut(descendant)?;
            let rebased = path::rebase(&node.parent_path, old, new);
            match rebased {
                Some(parent_path) => node.parent_path = parent_path,
                None => {
                    return Err(NamespaceError::invariant(format!(
                        "'{}' is not under '{old}'",
                        node.parent_path
                    )));
                }
            }
        }
        Ok(())
    }

    /// Removes `prefix` and everything beneath it from both indexes.
    ///
    /// The removed payloads are handed back keyed by node, ready to be re-keyed.
    pub(crate) fn detach_keys(
        &mut self,
        prefix: &str,
    ) -> std::result::Result<DetachedPayloads<R::Payload>, NamespaceError> {
        let keys = self.paths.delete_subtree(prefix);
        let payloads = self.presentation.delete_subtree(prefix);
        if keys.len() != payloads.len() {
            return Err(NamespaceError::invariant(format!(
                "'{prefix}' has {} indexed paths but {} payloads",
                keys.len(),
                payloads.len()
            )));
        }
        let by_path: HashMap<String, NodeId> = keys.into_iter().collect();
        payloads
            .into_iter()
            .map(|(key, payload)| match by_path.get(&key) {
                Some(id) => Ok((*id, payload)),
                None => Err(NamespaceError::invariant(format!(
                    "payload at '{key}' has no indexed node"
                ))),
            })
            .collect()
    }

    /// Indexes `start` and its descendants under their traversal paths.
    ///
    /// Nodes with an entry in `payloads` get it back; the rest get a fresh one.
    pub(crate) fn attach_keys(&mut self, start: NodeId, payloads: &mut DetachedPayloads<R::Payload>) {
        for (key, id) in self.tree.paths_under(start) {
            let payload = match payloads.remove(&id) {
                Some(payload) => payload,
                None => match self.tree.get(id) {
                    Some(node) => self.presenter.present(&key, node),
                    None => continue,
                },
            };
            self.paths.set(key.clone(), id);
            self.presentation.set(key, payload);
        }
    }

    /// Rebuilds both indexes from the root.
    pub(crate) fn rebuild_indexes(&mut self, mut payloads: DetachedPayloads<R::Payload>) {
        self.paths.rebuild(&self.tree);
        let mut presentation = PresentationIndex::new();
        for (key, id) in self.paths.iter() {
            let payload = match payloads.remove(&id) {
                Some(payload) => payload,
                None => match self.tree.get(id) {
                    Some(node) => self.presenter.present(key, node),
                    None => continue,
                },
            };
            presentation.set(key, payload);
        }
        self.presentation = presentation;
    }

    /// Keeps the active-group pointer on its group after a rename or move.
    pub(crate) fn follow_active(&mut self, old: &str, new: &str) {
        if let Some(active) = path::rebase(&self.active, old, new) {
            self.active = active;
        }
    }
}
