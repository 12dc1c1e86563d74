//! Re-anchoring markers against changed file content.

use waymark::{Anchor, Config, Namespace, Node};

use crate::helpers::*;

fn document(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|line| line.to_string()).collect()
}

fn anchored(name: &str, line: u32, text: &str) -> Node {
    Node::marker(name, Anchor::new("f.rs", line, 0).with_text(text))
}

#[test]
fn test_matching_markers_are_untouched() {
    let mut ns = empty_namespace();
    ns.insert(anchored("a", 1, "fn main() {"), "").expect("insert");

    let lines = document(&["// header", "fn main() {", "}"]);
    let outcome = ns.reanchor("f.rs", &lines).expect("reanchor");
    assert!(outcome.is_empty());
    assert_eq!(line_of(&ns, "a"), 1);
}

#[test]
fn test_marker_follows_its_text() {
    let mut ns = empty_namespace();
    ns.insert(anchored("a", 1, "fn main() {"), "").expect("insert");

    let lines = document(&["// header", "use std::io;", "", "fn main() {", "}"]);
    let outcome = ns.reanchor("f.rs", &lines).expect("reanchor");
    assert_eq!(line_of(&ns, "a"), 3);
    assert_eq!(outcome.shifted, ["a"]);
    assert_consistent(&ns);
}

#[test]
fn test_nearest_match_wins_and_ties_go_up() {
    let mut ns = empty_namespace();
    ns.insert(anchored("a", 2, "x"), "").expect("insert");

    let lines = document(&["x", "y", "z", "x"]);
    // Distance 1 above is "y", below is "x" at 3; nearest is 3.
    ns.reanchor("f.rs", &lines).expect("reanchor");
    assert_eq!(line_of(&ns, "a"), 3);

    let mut ns = empty_namespace();
    ns.insert(anchored("b", 2, "x"), "").expect("insert");
    let lines = document(&["q", "x", "z", "x"]);
    ns.reanchor("f.rs", &lines).expect("reanchor");
    assert_eq!(line_of(&ns, "b"), 1, "equal distance resolves upwards");
}

#[test]
fn test_unmatched_marker_refreshes_snapshot() {
    let mut ns = empty_namespace();
    ns.insert(anchored("a", 1, "gone"), "").expect("insert");
    ns.insert(anchored("b", 9, "also gone"), "").expect("insert");

    let lines = document(&["one", "two", "three"]);
    let outcome = ns.reanchor("f.rs", &lines).expect("reanchor");

    let a = ns.query("a").and_then(|node| node.anchor()).expect("a");
    assert_eq!((a.line, a.line_text.as_str()), (1, "two"));
    let b = ns.query("b").and_then(|node| node.anchor()).expect("b");
    assert_eq!((b.line, b.line_text.as_str()), (2, "three"), "clamped to the last line");
    assert_eq!(outcome.refreshed, ["a", "b"]);
}

#[test]
fn test_radius_limits_search() {
    let config = Config {
        reanchor_radius: 1,
        ..Config::default()
    };
    let mut ns = Namespace::new(Tagger::default(), config);
    ns.insert(anchored("a", 0, "target"), "").expect("insert");

    let lines = document(&["a", "b", "target"]);
    let outcome = ns.reanchor("f.rs", &lines).expect("reanchor");
    assert_eq!(line_of(&ns, "a"), 0);
    assert_eq!(outcome.refreshed, ["a"]);
}

#[test]
fn test_reanchor_resolves_collisions() {
    let mut ns = empty_namespace();
    ns.insert(anchored("first", 0, "shared"), "").expect("insert");
    ns.insert(anchored("second", 4, "shared"), "").expect("insert");

    let lines = document(&["x", "x", "shared", "x", "x"]);
    let outcome = ns.reanchor("f.rs", &lines).expect("reanchor");
    assert_eq!(line_of(&ns, "first"), 2);
    assert!(ns.query("second").is_none());
    assert_eq!(outcome.removed, ["second"]);
    assert_eq!(outcome.shifted, ["first"]);
    assert_consistent(&ns);
}
