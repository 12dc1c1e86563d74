//! Tree items shown for each bookmark.

use serde::Serialize;
use uuid::Uuid;
use waymark::{Node, NodeKind, Presenter};

/// Display handle for one node.
///
/// Created once per node and carried over renames and moves; a kind change
/// replaces it, so `kind` is always current.
#[derive(Debug, Clone, Serialize)]
pub struct TreeItem {
    pub id: Uuid,
    pub kind: NodeKind,
}

impl TreeItem {
    /// First eight characters of the id, for human output.
    pub fn short_id(&self) -> String {
        let mut id = self.id.simple().to_string();
        id.truncate(8);
        id
    }
}

/// Builds a [`TreeItem`] for every node that needs one.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeItems;

impl Presenter for TreeItems {
    type Payload = TreeItem;

    fn present(&self, _path: &str, node: &Node) -> TreeItem {
        TreeItem {
            id: Uuid::new_v4(),
            kind: node.kind(),
        }
    }
}
