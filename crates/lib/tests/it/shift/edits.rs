//! Line shifting on document edits.

use waymark::{Anchor, LineEdit, Namespace, Node, NodeKind};

use crate::helpers::*;

/// Markers `m<line>` in `f.rs` at each of `lines`, plus one in another file.
fn file_namespace(lines: &[u32]) -> Namespace<Tagger> {
    let mut ns = empty_namespace();
    for line in lines {
        ns.insert(marker(&format!("m{line}"), "f.rs", *line), "")
            .expect("Failed to insert marker");
    }
    ns.insert(marker("elsewhere", "g.rs", 3), "")
        .expect("Failed to insert marker");
    ns
}

#[test]
fn test_single_line_insertion_shifts_lines_below() {
    let mut ns = file_namespace(&[1, 2, 5]);
    let outcome = ns
        .apply_edit("f.rs", LineEdit::insertion(2, 2))
        .expect("Failed to apply edit");

    assert_eq!(line_of(&ns, "m1"), 1);
    assert_eq!(line_of(&ns, "m2"), 2, "a marker on the edited line stays");
    assert_eq!(line_of(&ns, "m5"), 7);
    assert_eq!(line_of(&ns, "elsewhere"), 3);
    assert_eq!(outcome.shifted, ["m5"]);
    assert!(outcome.removed.is_empty());
    assert_consistent(&ns);
}

#[test]
fn test_single_line_edit_without_newlines_changes_nothing() {
    let mut ns = file_namespace(&[1, 2, 5]);
    let outcome = ns
        .apply_edit("f.rs", LineEdit::insertion(2, 0))
        .expect("Failed to apply edit");
    assert!(outcome.is_empty());
    assert_eq!(line_of(&ns, "m5"), 5);
}

#[test]
fn test_multi_line_delete_removes_interior_markers() {
    let mut ns = file_namespace(&[1, 3, 4, 6, 9]);
    let outcome = ns
        .apply_edit("f.rs", LineEdit::new(2, 5, 0))
        .expect("Failed to apply edit");

    assert!(ns.query("m3").is_none());
    assert!(ns.query("m4").is_none());
    assert_eq!(line_of(&ns, "m1"), 1);
    assert_eq!(line_of(&ns, "m6"), 3);
    assert_eq!(line_of(&ns, "m9"), 6);

    let mut removed = outcome.removed.clone();
    removed.sort();
    assert_eq!(removed, ["m3", "m4"]);
    assert_eq!(outcome.shifted, ["m6", "m9"]);
    assert_consistent(&ns);
}

#[test]
fn test_multi_line_replacement_with_growth() {
    let mut ns = file_namespace(&[2, 5, 8]);
    // Lines 2..=4 replaced by text containing five line breaks.
    ns.apply_edit("f.rs", LineEdit::new(2, 4, 5))
        .expect("Failed to apply edit");
    assert_eq!(line_of(&ns, "m2"), 2);
    assert_eq!(line_of(&ns, "m5"), 8);
    assert_eq!(line_of(&ns, "m8"), 11);
}

#[test]
fn test_reversed_range_behaves_like_ordered_range() {
    let mut forward = file_namespace(&[1, 3, 6]);
    let mut reversed = file_namespace(&[1, 3, 6]);
    let a = forward
        .apply_edit("f.rs", LineEdit::new(2, 5, 0))
        .expect("forward");
    let b = reversed
        .apply_edit("f.rs", LineEdit::new(5, 2, 0))
        .expect("reversed");
    assert_eq!(a, b);
    assert_eq!(all_paths(&forward), all_paths(&reversed));
}

#[test]
fn test_collisions_keep_first_marker_in_index_order() {
    let mut ns = file_namespace(&[2, 6]);
    // Line 6 lands on line 2 after deleting lines 2..6.
    let outcome = ns
        .apply_edit("f.rs", LineEdit::new(2, 6, 0))
        .expect("Failed to apply edit");

    assert_eq!(line_of(&ns, "m2"), 2);
    assert!(ns.query("m6").is_none());
    assert_eq!(outcome.removed, ["m6"]);
    assert!(outcome.shifted.is_empty(), "removed markers are not reported as shifted");
    assert_consistent(&ns);
}

#[test]
fn test_interior_group_marker_takes_its_children() {
    let mut ns = empty_namespace();
    ns.insert(
        Node::group_marker("section", Anchor::new("f.rs", 3, 0), ""),
        "",
    )
    .expect("Failed to insert section");
    ns.insert(marker("inner", "g.rs", 10), "section")
        .expect("Failed to insert inner");
    ns.insert(marker("after", "f.rs", 8), "")
        .expect("Failed to insert after");

    let outcome = ns
        .apply_edit("f.rs", LineEdit::new(2, 4, 0))
        .expect("Failed to apply edit");
    assert!(ns.query("section").is_none());
    assert!(ns.query("section/inner").is_none());
    assert_eq!(line_of(&ns, "after"), 6);
    assert_eq!(outcome.removed, ["section"]);
    assert_consistent(&ns);
}

#[test]
fn test_colliding_group_marker_keeps_children() {
    let mut ns = empty_namespace();
    ns.insert(Node::group("g", ""), "").expect("Failed to insert group");
    ns.insert(marker("c", "f.rs", 3), "g")
        .expect("Failed to insert child");
    ns.anchor_group("g", Anchor::new("f.rs", 3, 0))
        .expect("Failed to anchor group");
    // Anchoring re-indexes the group after its child.
    assert_eq!(ns.markers_in("f.rs"), ["g/c", "g"]);

    let outcome = ns
        .apply_edit("f.rs", LineEdit::insertion(0, 0))
        .expect("Failed to apply edit");

    assert!(outcome.removed.is_empty());
    assert_eq!(outcome.unanchored, ["g"]);
    assert_eq!(ns.query("g").map(|n| n.kind()), Some(NodeKind::Group));
    assert_eq!(line_of(&ns, "g/c"), 3);
    assert_eq!(ns.markers_in("f.rs"), ["g/c"]);
    assert_consistent(&ns);
}

#[test]
fn test_colliding_empty_group_marker_is_deleted() {
    let mut ns = file_namespace(&[4]);
    ns.insert(marker("late", "f.rs", 4), "")
        .expect("Failed to insert marker");
    ns.transform("late", NodeKind::GroupMarker)
        .expect("Failed to transform");

    let outcome = ns
        .apply_edit("f.rs", LineEdit::insertion(0, 0))
        .expect("Failed to apply edit");

    assert_eq!(outcome.removed, ["late"]);
    assert!(outcome.unanchored.is_empty());
    assert_eq!(ns.markers_in("f.rs"), ["m4"]);
    assert_consistent(&ns);
}

#[test]
fn test_batched_edits_apply_in_order() {
    let mut ns = file_namespace(&[5, 10]);
    let outcome = ns
        .apply_edits(
            "f.rs",
            &[LineEdit::insertion(1, 3), LineEdit::new(7, 9, 0)],
        )
        .expect("Failed to apply edits");

    // First edit: 5 -> 8, 10 -> 13. Second edit removes 8, shifts 13 -> 11.
    assert!(ns.query("m5").is_none());
    assert_eq!(line_of(&ns, "m10"), 11);
    assert_eq!(outcome.removed, ["m5"]);
    assert_eq!(outcome.shifted, ["m10"]);
    assert_consistent(&ns);
}

#[test]
fn test_edit_in_untracked_file_is_empty() {
    let mut ns = file_namespace(&[1, 2]);
    let outcome = ns
        .apply_edit("other.rs", LineEdit::new(0, 40, 0))
        .expect("Failed to apply edit");
    assert!(outcome.is_empty());
    assert_eq!(all_paths(&ns), ["elsewhere", "m1", "m2"]);
}
