//! Insert, delete, rename and activation tests.

use waymark::{Anchor, Error, NamespaceError, Node, NodeKind};

use crate::helpers::*;

#[test]
fn test_new_namespace_holds_only_root() {
    let ns = empty_namespace();
    assert!(ns.is_empty());
    assert_eq!(ns.len(), 1);
    assert_eq!(ns.active_group(), "");
    assert!(ns.query("").is_some_and(|root| root.kind() == NodeKind::Group));
    assert!(ns.payload("").is_some());
    assert_consistent(&ns);
}

#[test]
fn test_insert_orders_groups_first() {
    let ns = sample_namespace();
    assert_eq!(child_names(&ns, ""), ["review", "todo", "readme"]);
    assert_eq!(child_names(&ns, "todo"), ["lexer", "parser"]);
    assert_eq!(
        all_paths(&ns),
        [
            "review",
            "review/api",
            "review/api/handler",
            "todo",
            "todo/lexer",
            "todo/parser",
            "readme",
        ]
    );
}

#[test]
fn test_insert_sets_parent_path_and_payload() {
    let ns = sample_namespace();
    let handler = ns.query("review/api/handler").expect("handler exists");
    assert_eq!(handler.parent_path(), "review/api");
    assert_eq!(handler.full_path(), "review/api/handler");
    assert_eq!(
        ns.payload("review/api/handler").map(|tag| tag.created_at.as_str()),
        Some("review/api/handler")
    );
}

#[test]
fn test_insert_rejects_conflicts_without_changes() {
    let mut ns = sample_namespace();
    let before = all_paths(&ns);

    let err = ns
        .insert(marker("parser", "other.rs", 1), "todo")
        .expect_err("duplicate sibling name");
    assert!(err.is_conflict());
    assert_eq!(all_paths(&ns), before);
    assert_eq!(
        ns.query("todo/parser")
            .and_then(|node| node.anchor())
            .map(|anchor| anchor.file_path.as_str()),
        Some("src/parse.rs")
    );
    assert_consistent(&ns);
}

#[test]
fn test_insert_rejects_bad_targets_and_names() {
    let mut ns = sample_namespace();

    let err = ns
        .insert(marker("x", "a.rs", 1), "readme")
        .expect_err("markers cannot hold children");
    assert!(matches!(err, Error::Namespace(NamespaceError::NotAGroup { .. })));

    let err = ns
        .insert(marker("x", "a.rs", 1), "missing")
        .expect_err("target does not exist");
    assert!(err.is_not_found());

    for name in ["", "a/b"] {
        let err = ns
            .insert(marker(name, "a.rs", 1), "")
            .expect_err("invalid name");
        assert!(matches!(err, Error::Namespace(NamespaceError::InvalidName { .. })));
    }
    assert_consistent(&ns);
}

#[test]
fn test_insert_into_group_marker() {
    let mut ns = sample_namespace();
    let path = ns
        .insert(marker("route", "src/api.rs", 30), "review/api")
        .expect("group-markers hold children");
    assert_eq!(path, "review/api/route");
    assert_eq!(child_names(&ns, "review/api"), ["handler", "route"]);
}

#[test]
fn test_delete_group_removes_subtree() {
    let mut ns = sample_namespace();
    ns.delete("review").expect("Failed to delete review");

    for gone in ["review", "review/api", "review/api/handler"] {
        assert!(ns.query(gone).is_none(), "{gone} survived");
        assert!(ns.payload(gone).is_none(), "{gone} payload survived");
    }
    assert_eq!(all_paths(&ns), ["todo", "todo/lexer", "todo/parser", "readme"]);
    assert_eq!(ns.tree().len(), 5);
    assert_consistent(&ns);
}

#[test]
fn test_delete_marker_and_root() {
    let mut ns = sample_namespace();
    ns.delete("todo/lexer").expect("Failed to delete lexer");
    assert_eq!(child_names(&ns, "todo"), ["parser"]);

    let err = ns.delete("").expect_err("root cannot be deleted");
    assert!(matches!(err, Error::Namespace(NamespaceError::RootNode { .. })));
    assert!(ns.delete("todo/lexer").expect_err("already gone").is_not_found());
    assert_consistent(&ns);
}

#[test]
fn test_rename_group_rewrites_descendants() {
    let mut ns = sample_namespace();
    let created = ns.presenter().created();
    let handler_tag = ns.payload("review/api/handler").cloned();

    let renamed = ns.rename("review", "audit").expect("Failed to rename");
    assert_eq!(renamed, "audit");
    assert!(ns.query("review").is_none());
    assert!(ns.query("review/api/handler").is_none());

    let handler = ns.query("audit/api/handler").expect("handler moved with its group");
    assert_eq!(handler.parent_path(), "audit/api");
    assert_eq!(ns.payload("audit/api/handler").cloned(), handler_tag);
    assert_eq!(ns.presenter().created(), created, "rename must not recreate payloads");

    // "audit" sorts before "todo" like "review" did.
    assert_eq!(child_names(&ns, ""), ["audit", "todo", "readme"]);
    assert_consistent(&ns);
}

#[test]
fn test_rename_marker_resorts_siblings() {
    let mut ns = sample_namespace();
    let renamed = ns.rename("todo/lexer", "tokens").expect("Failed to rename");
    assert_eq!(renamed, "todo/tokens");
    assert_eq!(child_names(&ns, "todo"), ["parser", "tokens"]);
    assert_consistent(&ns);
}

#[test]
fn test_rename_to_same_name_is_noop() {
    let mut ns = sample_namespace();
    let created = ns.presenter().created();
    assert_eq!(ns.rename("todo", "todo").expect("noop"), "todo");
    assert_eq!(ns.presenter().created(), created);
}

#[test]
fn test_rename_conflict_leaves_namespace_untouched() {
    let mut ns = sample_namespace();
    let before = all_paths(&ns);
    let err = ns.rename("todo/lexer", "parser").expect_err("sibling exists");
    assert!(err.is_conflict());
    assert_eq!(all_paths(&ns), before);
    assert_consistent(&ns);
}

#[test]
fn test_names_differing_only_in_case_are_distinct() {
    let mut ns = empty_namespace();
    ns.insert(marker("Alpha", "a.rs", 1), "").expect("Alpha");
    ns.insert(marker("alpha", "a.rs", 2), "").expect("alpha");
    assert_eq!(child_names(&ns, ""), ["Alpha", "alpha"]);
}

#[test]
fn test_active_group_follows_rename_and_resets_on_delete() {
    let mut ns = sample_namespace();
    assert!(ns.activate("review/api"));
    assert!(!ns.activate("review/api"), "already active");
    assert!(!ns.activate("readme"), "markers cannot be active");
    assert!(!ns.activate("missing"));

    ns.rename("review", "audit").expect("Failed to rename");
    assert_eq!(ns.active_group(), "audit/api");

    ns.delete("audit").expect("Failed to delete");
    assert_eq!(ns.active_group(), "");
    assert_consistent(&ns);
}

#[test]
fn test_markers_in_file() {
    let ns = sample_namespace();
    assert_eq!(ns.markers_in("src/api.rs"), ["review/api", "review/api/handler"]);
    assert!(ns.markers_in("nothing.rs").is_empty());
}

#[test]
fn test_list_subtree() {
    let ns = sample_namespace();
    assert_eq!(
        ns.list_subtree("review").expect("review exists"),
        ["review", "review/api", "review/api/handler"]
    );
    assert!(ns.list_subtree("nope").expect_err("missing").is_not_found());
}

#[test]
fn test_insert_drops_children_of_detached_node() {
    let mut ns = empty_namespace();
    let node = Node::group_marker("g", Anchor::new("f.rs", 1, 0), "");
    ns.insert(node, "").expect("insert group-marker");
    assert!(ns.query("g").is_some_and(|node| node.children().is_empty()));
}
