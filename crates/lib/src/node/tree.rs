//! Arena storage for the nodes of one namespace.

use slab::Slab;

use super::{Node, NodeId, path};

/// Owns every node of a namespace, rooted at an unnamed group.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Slab<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only the root group.
    pub fn new() -> Self {
        let mut nodes = Slab::new();
        let root = NodeId(nodes.insert(Node::root()));
        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn alloc(&mut self, node: Node) -> NodeId {
        NodeId(self.nodes.insert(node))
    }

    /// Frees `id` and every node beneath it, returning how many were freed.
    pub(crate) fn free_subtree(&mut self, id: NodeId) -> usize {
        let doomed: Vec<NodeId> = self.walk(id).map(|(_, id)| id).collect();
        for id in &doomed {
            self.nodes.try_remove(id.0);
        }
        doomed.len()
    }

    /// Frees `id` alone, returning the node it held.
    pub(crate) fn free(&mut self, id: NodeId) -> Option<Node> {
        self.nodes.try_remove(id.0)
    }

    /// Pre-order traversal starting at `start`.
    ///
    /// Each item pairs a node handle with the path of its parent as derived from
    /// the traversal itself (not from the node's stored `parent_path`). The start
    /// node is paired with its stored parent path.
    pub fn walk(&self, start: NodeId) -> Walk<'_> {
        let stack = match self.get(start) {
            Some(node) => vec![(node.parent_path.clone(), start)],
            None => Vec::new(),
        };
        Walk { tree: self, stack }
    }

    /// Full paths of `start` and its descendants in pre-order.
    pub fn paths_under(&self, start: NodeId) -> Vec<(String, NodeId)> {
        self.walk(start)
            .filter_map(|(ancestor, id)| {
                self.get(id)
                    .map(|node| (path::join(&ancestor, &node.name), id))
            })
            .collect()
    }
}

/// Lazy pre-order iterator over a subtree. Cloning restarts from the same point.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    tree: &'a Tree,
    stack: Vec<(String, NodeId)>,
}

impl Iterator for Walk<'_> {
    type Item = (String, NodeId);

    fn next(&mut self) -> Option<Self::Item> {
        let (ancestor, id) = self.stack.pop()?;
        if let Some(node) = self.tree.get(id) {
            let own_path = path::join(&ancestor, &node.name);
            for child in node.children().iter().rev() {
                self.stack.push((own_path.clone(), *child));
            }
        }
        Some((ancestor, id))
    }
}
