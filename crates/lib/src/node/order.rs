//! Child ordering policies.
//!
//! The ordering of a group's children is a configuration value kept outside the
//! tree. Every mutation that changes a child list calls [`SortPolicy::sort`];
//! under [`SortPolicy::Manual`] that call leaves the list untouched, so the
//! insertion or move position chosen by the caller stays authoritative.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{Node, NodeId, Tree};

/// How the children of a group are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortPolicy {
    /// Group-like nodes first, then markers; each run ordered by name.
    #[default]
    GroupFirst,
    /// Ordered by name only.
    Plain,
    /// Insertion and move order is kept as is.
    Manual,
}

impl SortPolicy {
    /// Compares two siblings under this policy.
    ///
    /// Returns `None` for [`SortPolicy::Manual`], which has no ordering of its own.
    pub fn compare(self, a: &Node, b: &Node) -> Option<Ordering> {
        match self {
            SortPolicy::GroupFirst => Some(
                b.is_group_like()
                    .cmp(&a.is_group_like())
                    .then_with(|| compare_names(&a.name, &b.name)),
            ),
            SortPolicy::Plain => Some(compare_names(&a.name, &b.name)),
            SortPolicy::Manual => None,
        }
    }

    /// Reorders `children` in place. The sort is stable.
    pub fn sort(self, children: &mut [NodeId], tree: &Tree) {
        if self == SortPolicy::Manual {
            return;
        }
        children.sort_by(|a, b| match (tree.get(*a), tree.get(*b)) {
            (Some(a), Some(b)) => self.compare(a, b).unwrap_or(Ordering::Equal),
            _ => Ordering::Equal,
        });
    }
}

/// Human-oriented name comparison: case-insensitive first, raw text breaks ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| a.cmp(b))
}
