use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use waymark::{Anchor, Config, Namespace, Node, Presenter, SortPolicy};

// ==========================
// PRESENTER
// ==========================

/// Payload recording which call to the presenter produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub serial: usize,
    pub created_at: String,
}

/// Presenter handing out numbered tags, so tests can tell reused payloads from fresh ones.
#[derive(Debug, Clone, Default)]
pub struct Tagger {
    next: Arc<AtomicUsize>,
}

impl Tagger {
    /// Number of payloads created so far, across every clone.
    pub fn created(&self) -> usize {
        self.next.load(Ordering::SeqCst)
    }
}

impl Presenter for Tagger {
    type Payload = Tag;

    fn present(&self, path: &str, _node: &Node) -> Tag {
        Tag {
            serial: self.next.fetch_add(1, Ordering::SeqCst),
            created_at: path.to_string(),
        }
    }
}

// ==========================
// FIXTURES
// ==========================

pub fn marker(name: &str, file: &str, line: u32) -> Node {
    Node::marker(name, Anchor::new(file, line, 0).with_text(format!("line {line}")))
}

pub fn empty_namespace() -> Namespace<Tagger> {
    Namespace::new(Tagger::default(), Config::default())
}

pub fn manual_namespace() -> Namespace<Tagger> {
    Namespace::new(
        Tagger::default(),
        Config::default().with_sort(SortPolicy::Manual),
    )
}

/// A small namespace used across tests:
///
/// ```text
/// review/            group
///   api              group-marker  src/api.rs:10
///     handler        marker        src/api.rs:20
/// todo/              group
///   lexer            marker        src/lex.rs:3
///   parser           marker        src/parse.rs:41
/// readme             marker        README.md:0
/// ```
pub fn sample_namespace() -> Namespace<Tagger> {
    let mut ns = empty_namespace();
    ns.insert(Node::group("todo", "yellow"), "")
        .expect("Failed to insert todo");
    ns.insert(marker("parser", "src/parse.rs", 41), "todo")
        .expect("Failed to insert parser");
    ns.insert(marker("lexer", "src/lex.rs", 3), "todo")
        .expect("Failed to insert lexer");
    ns.insert(Node::group("review", ""), "")
        .expect("Failed to insert review");
    ns.insert(
        Node::group_marker("api", Anchor::new("src/api.rs", 10, 0), "red"),
        "review",
    )
    .expect("Failed to insert api");
    ns.insert(marker("handler", "src/api.rs", 20), "review/api")
        .expect("Failed to insert handler");
    ns.insert(marker("readme", "README.md", 0), "")
        .expect("Failed to insert readme");
    assert_consistent(&ns);
    ns
}

// ==========================
// ASSERTIONS
// ==========================

/// Asserts that tree, both indexes and the active pointer agree.
pub fn assert_consistent<R: Presenter>(ns: &Namespace<R>) {
    if let Err(err) = ns.check_invariants() {
        panic!("namespace is inconsistent: {err}");
    }
    let paths: Vec<&str> = ns.paths().keys().collect();
    let mut payloads: Vec<&str> = ns.presentation().keys().collect();
    let mut sorted_paths = paths.clone();
    sorted_paths.sort_unstable();
    payloads.sort_unstable();
    assert_eq!(sorted_paths, payloads, "index key sets differ");
}

/// Full paths of every node, in tree order, root excluded.
pub fn all_paths<R: Presenter>(ns: &Namespace<R>) -> Vec<String> {
    ns.list_subtree("")
        .expect("root always resolves")
        .into_iter()
        .skip(1)
        .collect()
}

/// Names of the children of the group at `path`, in order.
pub fn child_names<R: Presenter>(ns: &Namespace<R>, path: &str) -> Vec<String> {
    let node = ns.query(path).expect("group exists");
    node.children()
        .iter()
        .map(|id| {
            ns.tree()
                .get(*id)
                .map(|child| child.name().to_string())
                .expect("child is stored")
        })
        .collect()
}

pub fn line_of<R: Presenter>(ns: &Namespace<R>, path: &str) -> u32 {
    ns.query(path)
        .and_then(|node| node.anchor())
        .map(|anchor| anchor.line)
        .expect("marker exists")
}
