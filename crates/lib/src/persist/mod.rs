//! Persisted form of a namespace.
//!
//! A namespace is stored as one JSON document: a recursive object tagged by
//! `"type"`. Every node records the full path of its *parent* in `"uri"`; the
//! root has an empty name and an empty uri.
//!
//! ```json
//! {
//!   "type": "group", "name": "", "uri": "", "color": "",
//!   "children": [
//!     { "type": "group", "name": "todo", "uri": "", "color": "yellow", "children": [
//!       { "type": "bookmark", "name": "parser", "uri": "todo",
//!         "fsPath": "src/parse.rs", "line": 41, "col": 0, "lineText": "fn parse()" }
//!     ] }
//!   ]
//! }
//! ```
//!
//! Loading attaches every node to the group its `uri` names, verbatim. A `uri`
//! that does not resolve makes the whole document malformed; hosts usually fall
//! back to an empty namespace via [`Namespace::load_or_empty`].

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::{
    Config, Result,
    constants::ROOT_PATH,
    index::Presenter,
    namespace::{Namespace, NamespaceError},
    node::{Anchor, Node, NodeBody, NodeId, Tree, path},
};

mod errors;
pub use errors::PersistError;

/// One node of the persisted tree document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoredNode {
    #[serde(rename = "group")]
    Group {
        name: String,
        uri: String,
        #[serde(default)]
        color: String,
        #[serde(default)]
        children: Vec<StoredNode>,
    },
    #[serde(rename = "bookmark")]
    Bookmark {
        name: String,
        uri: String,
        #[serde(rename = "fsPath")]
        fs_path: String,
        line: u32,
        #[serde(default)]
        col: u32,
        #[serde(rename = "lineText", default)]
        line_text: String,
    },
    #[serde(rename = "groupbookmark")]
    GroupBookmark {
        name: String,
        uri: String,
        #[serde(default)]
        color: String,
        #[serde(default)]
        children: Vec<StoredNode>,
        #[serde(rename = "fsPath")]
        fs_path: String,
        line: u32,
        #[serde(default)]
        col: u32,
        #[serde(rename = "lineText", default)]
        line_text: String,
    },
}

impl StoredNode {
    pub fn name(&self) -> &str {
        match self {
            StoredNode::Group { name, .. }
            | StoredNode::Bookmark { name, .. }
            | StoredNode::GroupBookmark { name, .. } => name,
        }
    }

    /// Recorded full path of the parent group.
    pub fn uri(&self) -> &str {
        match self {
            StoredNode::Group { uri, .. }
            | StoredNode::Bookmark { uri, .. }
            | StoredNode::GroupBookmark { uri, .. } => uri,
        }
    }

    pub fn children(&self) -> &[StoredNode] {
        match self {
            StoredNode::Group { children, .. } | StoredNode::GroupBookmark { children, .. } => {
                children.as_slice()
            }
            StoredNode::Bookmark { .. } => &[],
        }
    }

    /// Captures the subtree rooted at `id`.
    pub(crate) fn from_tree(tree: &Tree, id: NodeId) -> std::result::Result<Self, NamespaceError> {
        let node = tree
            .get(id)
            .ok_or_else(|| NamespaceError::invariant(format!("node {id:?} is not in the tree")))?;
        let children = node
            .children()
            .iter()
            .map(|child| Self::from_tree(tree, *child))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let name = node.name.clone();
        let uri = node.parent_path.clone();

        Ok(match &node.body {
            NodeBody::Group { color, .. } => StoredNode::Group {
                name,
                uri,
                color: color.clone(),
                children,
            },
            NodeBody::Marker { anchor } => StoredNode::Bookmark {
                name,
                uri,
                fs_path: anchor.file_path.clone(),
                line: anchor.line,
                col: anchor.column,
                line_text: anchor.line_text.clone(),
            },
            NodeBody::GroupMarker { anchor, color, .. } => StoredNode::GroupBookmark {
                name,
                uri,
                color: color.clone(),
                children,
                fs_path: anchor.file_path.clone(),
                line: anchor.line,
                col: anchor.column,
                line_text: anchor.line_text.clone(),
            },
        })
    }

    /// Splits into a detached node (parent path taken from `uri`) and its stored children.
    pub(crate) fn into_parts(self) -> (Node, Vec<StoredNode>) {
        let (mut node, uri, children) = match self {
            StoredNode::Group {
                name,
                uri,
                color,
                children,
            } => (Node::group(name, color), uri, children),
            StoredNode::Bookmark {
                name,
                uri,
                fs_path,
                line,
                col,
                line_text,
            } => (
                Node::marker(name, Anchor::new(fs_path, line, col).with_text(line_text)),
                uri,
                Vec::new(),
            ),
            StoredNode::GroupBookmark {
                name,
                uri,
                color,
                children,
                fs_path,
                line,
                col,
                line_text,
            } => (
                Node::group_marker(
                    name,
                    Anchor::new(fs_path, line, col).with_text(line_text),
                    color,
                ),
                uri,
                children,
            ),
        };
        node.parent_path = uri;
        (node, children)
    }

    /// Checks every name in the subtree and sibling uniqueness below it.
    pub(crate) fn validate_names(&self) -> std::result::Result<(), NamespaceError> {
        path::validate_name(self.name())?;
        let mut seen = std::collections::HashSet::new();
        for child in self.children() {
            if !seen.insert(child.name()) {
                return Err(NamespaceError::NameConflict {
                    path: path::join(self.name(), child.name()),
                });
            }
            child.validate_names()?;
        }
        Ok(())
    }
}

impl<R: Presenter> Namespace<R> {
    /// Captures the whole namespace as a persisted document.
    pub fn to_document(&self) -> Result<StoredNode> {
        Ok(StoredNode::from_tree(&self.tree, self.tree.root())?)
    }

    /// Serializes the namespace document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        let document = self.to_document()?;
        serde_json::to_string_pretty(&document)
            .map_err(|source| PersistError::Serialization { source }.into())
    }

    /// Rebuilds a namespace from a persisted document.
    ///
    /// Nodes are attached top-down to the group named by their `uri`. Every node
    /// gets a fresh payload from `presenter`, and groups are ordered by the
    /// configured sort policy.
    pub fn from_document(document: StoredNode, presenter: R, config: Config) -> Result<Self> {
        let children = match document {
            StoredNode::Group {
                name,
                uri,
                children,
                ..
            } if name.is_empty() && uri.is_empty() => children,
            other => {
                return Err(PersistError::MalformedPersistedTree {
                    path: other.name().to_string(),
                    reason: "the root must be an unnamed group".to_string(),
                }
                .into());
            }
        };

        let mut namespace = Namespace::new(presenter, config);
        let mut loaded: HashMap<String, NodeId> = HashMap::new();
        loaded.insert(ROOT_PATH.to_string(), namespace.tree.root());

        let mut queue: VecDeque<StoredNode> = children.into();
        while let Some(stored) = queue.pop_front() {
            let (node, children) = stored.into_parts();
            let full_path = node.full_path();
            let malformed = |reason: String| PersistError::MalformedPersistedTree {
                path: full_path.clone(),
                reason,
            };

            if let Err(err) = path::validate_name(&node.name) {
                return Err(malformed(err.to_string()).into());
            }
            let parent = loaded
                .get(&node.parent_path)
                .copied()
                .filter(|id| namespace.tree.get(*id).is_some_and(Node::is_group_like))
                .ok_or_else(|| {
                    malformed(format!("parent '{}' does not resolve to a group", node.parent_path))
                })?;
            if loaded.contains_key(&full_path) {
                return Err(malformed("duplicate path".to_string()).into());
            }

            let id = namespace.tree.alloc(node);
            namespace.children_of_mut(parent)?.push(id);
            loaded.insert(full_path, id);
            queue.extend(children);
        }

        let groups: Vec<NodeId> = loaded
            .values()
            .copied()
            .filter(|id| namespace.tree.get(*id).is_some_and(Node::is_group_like))
            .collect();
        for group in groups {
            namespace.sort_children(group)?;
        }
        namespace.rebuild_indexes(HashMap::new());
        tracing::debug!(nodes = namespace.len(), "Loaded namespace document");
        Ok(namespace)
    }

    /// Parses a JSON namespace document.
    pub fn from_json(json: &str, presenter: R, config: Config) -> Result<Self> {
        let document: StoredNode = serde_json::from_str(json)
            .map_err(|source| -> crate::Error { PersistError::Serialization { source }.into() })?;
        Self::from_document(document, presenter, config)
    }
}

impl<R: Presenter + Clone> Namespace<R> {
    /// Parses a JSON namespace document, falling back to an empty namespace.
    ///
    /// A malformed document is reported with `tracing::warn!` and discarded as a
    /// whole; a partially loaded tree is never returned.
    pub fn load_or_empty(json: &str, presenter: R, config: Config) -> Self {
        match Self::from_json(json, presenter.clone(), config.clone()) {
            Ok(namespace) => namespace,
            Err(err) => {
                tracing::warn!("Discarding unreadable namespace document: {err}");
                Self::new(presenter, config)
            }
        }
    }
}
