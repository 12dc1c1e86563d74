//! Path arithmetic for slash-separated node paths.
//!
//! A full path is the sequence of ancestor names from the namespace root down to
//! a node, joined with [`SEPARATOR`]. The root itself has the empty path, so a
//! top-level node's full path is just its name.
//!
//! ```rust
//! # use waymark::node::path;
//! assert_eq!(path::join("", "work"), "work");
//! assert_eq!(path::join("work/todo", "parser"), "work/todo/parser");
//! assert!(path::is_within("work/todo/parser", "work/todo"));
//! assert!(!path::is_within("work/todos", "work/todo"));
//! ```

use crate::{
    constants::{ROOT_PATH, SEPARATOR},
    namespace::NamespaceError,
};

/// Checks that `name` can be used as a single path segment.
///
/// # Errors
/// Returns [`NamespaceError::InvalidName`] if the name is empty or contains the separator.
pub fn validate_name(name: &str) -> Result<(), NamespaceError> {
    if name.is_empty() {
        return Err(NamespaceError::InvalidName {
            name: name.to_string(),
            reason: "names cannot be empty".to_string(),
        });
    }
    if name.contains(SEPARATOR) {
        return Err(NamespaceError::InvalidName {
            name: name.to_string(),
            reason: format!("names cannot contain '{SEPARATOR}'"),
        });
    }
    Ok(())
}

/// Joins a parent path and a segment name into a full path.
pub fn join(parent_path: &str, name: &str) -> String {
    if parent_path.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        parent_path.to_string()
    } else {
        format!("{parent_path}{SEPARATOR}{name}")
    }
}

/// Splits a full path into its parent path and final segment.
///
/// The root path splits into two empty strings.
pub fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => (ROOT_PATH, path),
    }
}

/// Returns true if `path` equals `ancestor` or lies underneath it.
///
/// Every path lies within the root path.
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return true;
    }
    match path.strip_prefix(ancestor) {
        Some(rest) => rest.is_empty() || rest.starts_with(SEPARATOR),
        None => false,
    }
}

/// Replaces the leading `old` portion of `path` with `new`.
///
/// Returns `None` when `path` does not lie within `old`.
pub fn rebase(path: &str, old: &str, new: &str) -> Option<String> {
    if !is_within(path, old) {
        return None;
    }
    let rest = path[old.len()..].trim_start_matches(SEPARATOR);
    Some(join(new, rest))
}
