//! Node kind transformation tests.

use waymark::{Anchor, Error, NamespaceError, NodeKind};

use crate::helpers::*;

#[test]
fn test_marker_to_group_marker() {
    let mut ns = sample_namespace();
    let old_tag = ns.payload("todo/parser").cloned();

    assert!(ns.transform("todo/parser", NodeKind::GroupMarker).expect("transform"));
    let node = ns.query("todo/parser").expect("still there");
    assert_eq!(node.kind(), NodeKind::GroupMarker);
    assert_eq!(node.anchor().map(|a| a.line), Some(41));
    assert_ne!(ns.payload("todo/parser").cloned(), old_tag, "payload is fresh");

    // Now group-like, so it sorts ahead of lexer.
    assert_eq!(child_names(&ns, "todo"), ["parser", "lexer"]);
    ns.insert(marker("inner", "src/parse.rs", 50), "todo/parser")
        .expect("can hold children now");
    assert_consistent(&ns);
}

#[test]
fn test_group_marker_to_group_keeps_children() {
    let mut ns = sample_namespace();
    assert!(ns.transform("review/api", NodeKind::Group).expect("transform"));
    let node = ns.query("review/api").expect("still there");
    assert_eq!(node.kind(), NodeKind::Group);
    assert!(node.anchor().is_none());
    assert_eq!(node.color(), Some("red"));
    assert!(ns.query("review/api/handler").is_some());
    assert!(ns.markers_in("src/api.rs") == ["review/api/handler"]);
    assert_consistent(&ns);
}

#[test]
fn test_group_marker_to_marker_drops_children() {
    let mut ns = sample_namespace();
    assert!(ns.activate("review/api"));
    assert!(ns.transform("review/api", NodeKind::Marker).expect("transform"));

    assert_eq!(
        ns.query("review/api").map(|node| node.kind()),
        Some(NodeKind::Marker)
    );
    assert!(ns.query("review/api/handler").is_none());
    assert!(ns.payload("review/api/handler").is_none());
    assert_eq!(ns.active_group(), "", "demoted group cannot stay active");
    assert_consistent(&ns);
}

#[test]
fn test_transform_to_same_kind_is_noop() {
    let mut ns = sample_namespace();
    let created = ns.presenter().created();
    assert!(!ns.transform("todo", NodeKind::Group).expect("noop"));
    assert_eq!(ns.presenter().created(), created);
}

#[test]
fn test_invalid_transforms() {
    let mut ns = sample_namespace();
    let before = all_paths(&ns);

    for (path, kind) in [
        ("todo", NodeKind::Marker),
        ("todo", NodeKind::GroupMarker),
        ("readme", NodeKind::Group),
    ] {
        let err = ns.transform(path, kind).expect_err("not a supported transform");
        assert!(
            matches!(err, Error::Namespace(NamespaceError::InvalidTransform { .. })),
            "{path} -> {kind}: {err}"
        );
    }
    let err = ns.transform("", NodeKind::GroupMarker).expect_err("root");
    assert!(matches!(err, Error::Namespace(NamespaceError::RootNode { .. })));
    assert_eq!(all_paths(&ns), before);
}

#[test]
fn test_anchor_group() {
    let mut ns = sample_namespace();
    ns.anchor_group("todo", Anchor::new("TODO.md", 4, 2))
        .expect("anchor todo");
    let node = ns.query("todo").expect("todo exists");
    assert_eq!(node.kind(), NodeKind::GroupMarker);
    assert_eq!(node.color(), Some("yellow"));
    assert_eq!(child_names(&ns, "todo"), ["lexer", "parser"]);
    assert_eq!(ns.markers_in("TODO.md"), ["todo"]);

    let err = ns
        .anchor_group("todo", Anchor::new("TODO.md", 4, 2))
        .expect_err("already anchored");
    assert!(err.is_invalid_argument());
    assert_consistent(&ns);
}
