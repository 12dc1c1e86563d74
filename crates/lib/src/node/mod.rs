//! Node model for bookmark namespaces.
//!
//! A namespace is a tree of [`Node`]s. Every node is one of three kinds:
//!
//! * **Group** - a named container with a display color and ordered children.
//! * **Marker** - a leaf bound to a position in a file.
//! * **GroupMarker** - both at once: it carries a marker's [`Anchor`] and a
//!   group's children.
//!
//! Nodes are stored in an arena owned by the namespace ([`Tree`]) and refer to
//! their children through [`NodeId`] handles, so each node has exactly one owner.
//! Callers reason about kinds through the capability queries
//! [`Node::is_group_like`] and [`Node::is_marker_like`].

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod order;
pub mod path;
mod tree;

pub use order::SortPolicy;
pub use tree::{Tree, Walk};

/// Handle to a node stored in a namespace's [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// The three node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    Group,
    Marker,
    GroupMarker,
}

impl NodeKind {
    /// Returns true for kinds that can hold children.
    pub fn is_group_like(self) -> bool {
        matches!(self, NodeKind::Group | NodeKind::GroupMarker)
    }

    /// Returns true for kinds that carry an [`Anchor`].
    pub fn is_marker_like(self) -> bool {
        matches!(self, NodeKind::Marker | NodeKind::GroupMarker)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Group => "group",
            NodeKind::Marker => "marker",
            NodeKind::GroupMarker => "group-marker",
        };
        f.write_str(name)
    }
}

/// Position of a marker inside a document.
///
/// `line_text` is the last seen content of `line` and is used to re-anchor the
/// marker after the file changed outside the editor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    pub file_path: String,
    pub line: u32,
    pub column: u32,
    pub line_text: String,
}

impl Anchor {
    pub fn new(file_path: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
            line_text: String::new(),
        }
    }

    /// Sets the line snapshot.
    pub fn with_text(mut self, line_text: impl Into<String>) -> Self {
        self.line_text = line_text.into();
        self
    }
}

/// Variant-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeBody {
    Group {
        color: String,
        children: Vec<NodeId>,
    },
    Marker {
        anchor: Anchor,
    },
    GroupMarker {
        anchor: Anchor,
        color: String,
        children: Vec<NodeId>,
    },
}

/// A single entry in a bookmark namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) parent_path: String,
    pub(crate) body: NodeBody,
}

impl Node {
    /// Creates a detached group.
    pub fn group(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_path: String::new(),
            body: NodeBody::Group {
                color: color.into(),
                children: Vec::new(),
            },
        }
    }

    /// Creates a detached marker.
    pub fn marker(name: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            name: name.into(),
            parent_path: String::new(),
            body: NodeBody::Marker { anchor },
        }
    }

    /// Creates a detached group-marker with no children.
    pub fn group_marker(name: impl Into<String>, anchor: Anchor, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent_path: String::new(),
            body: NodeBody::GroupMarker {
                anchor,
                color: color.into(),
                children: Vec::new(),
            },
        }
    }

    pub(crate) fn root() -> Self {
        Self::group("", "")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path of the containing group; empty for the root and top-level nodes.
    pub fn parent_path(&self) -> &str {
        &self.parent_path
    }

    /// Full path of this node.
    pub fn full_path(&self) -> String {
        path::join(&self.parent_path, &self.name)
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Group { .. } => NodeKind::Group,
            NodeBody::Marker { .. } => NodeKind::Marker,
            NodeBody::GroupMarker { .. } => NodeKind::GroupMarker,
        }
    }

    pub fn is_group_like(&self) -> bool {
        self.kind().is_group_like()
    }

    pub fn is_marker_like(&self) -> bool {
        self.kind().is_marker_like()
    }

    /// Marker coordinates, if this node is marker-like.
    pub fn anchor(&self) -> Option<&Anchor> {
        match &self.body {
            NodeBody::Marker { anchor } | NodeBody::GroupMarker { anchor, .. } => Some(anchor),
            NodeBody::Group { .. } => None,
        }
    }

    pub(crate) fn anchor_mut(&mut self) -> Option<&mut Anchor> {
        match &mut self.body {
            NodeBody::Marker { anchor } | NodeBody::GroupMarker { anchor, .. } => Some(anchor),
            NodeBody::Group { .. } => None,
        }
    }

    /// Display color, if this node is group-like.
    pub fn color(&self) -> Option<&str> {
        match &self.body {
            NodeBody::Group { color, .. } | NodeBody::GroupMarker { color, .. } => {
                Some(color.as_str())
            }
            NodeBody::Marker { .. } => None,
        }
    }

    /// Ordered child handles; always empty for a pure marker.
    pub fn children(&self) -> &[NodeId] {
        match &self.body {
            NodeBody::Group { children, .. } | NodeBody::GroupMarker { children, .. } => {
                children.as_slice()
            }
            NodeBody::Marker { .. } => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.body {
            NodeBody::Group { children, .. } | NodeBody::GroupMarker { children, .. } => {
                Some(children)
            }
            NodeBody::Marker { .. } => None,
        }
    }

    /// Drops every child handle. Used when a node enters a tree as a fresh entry.
    pub(crate) fn clear_children(&mut self) {
        if let Some(children) = self.children_mut() {
            children.clear();
        }
    }
}
