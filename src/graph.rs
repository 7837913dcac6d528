//! Graph description emitter
//!
//! Walks a (usually compressed) prefix tree and produces a renderer
//! agnostic directed graph: nodes labelled with their snippets, edges
//! labelled with their key segment, plus ordering hints (invisible
//! ordering edges, same-rank groups, anchor nodes for the root edges).
//! No escaping or format encoding happens here.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::{borrow::ToOwned, format, string::String, vec, vec::Vec};

use core::fmt;
use core::str::FromStr;

use serde::Serialize;

use crate::snippet::Snippet;
use crate::trie::{PrefixTree, TrieNode};

/// Header fields shown under a snippet's name when they are not the
/// grouping field
pub const EXTRA_LABEL_FIELDS: [&str; 2] = ["key", "group"];

// ── Sort Mode ──────────────────────────────────────────────────────────

/// Which siblings get ordered lexicographically by edge label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Every node's children, at every depth
    #[default]
    All,
    /// Only the root's children
    #[cfg_attr(feature = "cli", value(alias = "root-only"))]
    Root,
    /// Stored (first-insertion) order everywhere
    None,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::All => "all",
            SortMode::Root => "root",
            SortMode::None => "none",
        }
    }

    /// Whether children are ordered at the given depth (0 = root)
    pub fn sorts_at(self, depth: usize) -> bool {
        match self {
            SortMode::All => true,
            SortMode::Root => depth == 0,
            SortMode::None => false,
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown sort mode name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortMode(pub String);

impl fmt::Display for UnknownSortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort mode: {} (expected all, root or none)", self.0)
    }
}

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(SortMode::All),
            "root" | "root-only" => Ok(SortMode::Root),
            "none" => Ok(SortMode::None),
            other => Err(UnknownSortMode(other.to_owned())),
        }
    }
}

// ── Description Types ─────────────────────────────────────────────────

/// One row of a node label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnippetLabel {
    pub name: String,
    pub rel_path: String,
    pub major_mode: Option<String>,
    /// Non-empty `key`/`group` values other than the grouping field
    pub extras: Vec<String>,
}

impl SnippetLabel {
    fn new(snippet: &Snippet, key_field: &str) -> Self {
        let extras = EXTRA_LABEL_FIELDS
            .iter()
            .filter(|&&field| field != key_field)
            .filter_map(|&field| snippet.header_value(field))
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect();
        Self {
            name: String::from(snippet.name()),
            rel_path: snippet.rel_path.clone(),
            major_mode: snippet.major_mode().map(String::from),
            extras,
        }
    }
}

/// Visual node for one trie node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphNode {
    pub id: String,
    /// Key spelled by the path to this node
    pub key: String,
    /// One entry per attached snippet; empty renders as a point
    pub snippets: Vec<SnippetLabel>,
}

/// Edge kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// Parent → child link
    Link,
    /// Root link, drawn from an invisible anchor or from the shown root
    Anchored,
    /// Invisible ordering constraint between consecutive sorted siblings
    Order,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub tail: String,
    pub head: String,
    /// Key segment for links, `None` for ordering edges
    pub label: Option<String>,
    pub kind: EdgeKind,
}

/// Renderer-agnostic graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphDescription {
    /// Grouping field the tree was built on
    pub key_field: String,
    pub sort: SortMode,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Invisible anchor node ids, one per root child unless the root is shown
    pub anchors: Vec<String>,
    /// Sibling groups to keep on the same rank
    pub rank_groups: Vec<Vec<String>>,
}

impl GraphDescription {
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Labelled edges: links and anchored root links
    pub fn links(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(|e| e.kind != EdgeKind::Order)
    }
}

// ── Emitter ────────────────────────────────────────────────────────────

/// Node id for a path of sibling indices: `_`, `_0`, `_0_2`, ...
pub fn node_id(path: &[usize]) -> String {
    let mut id = String::from("_");
    for (i, idx) in path.iter().enumerate() {
        if i > 0 {
            id.push('_');
        }
        id.push_str(&format!("{idx}"));
    }
    id
}

/// Emit the graph description for `tree` built on `key_field`.
///
/// The root is only emitted as a node when it carries snippets (empty
/// keys); its edges then leave from it directly. Otherwise every root
/// edge starts at its own invisible anchor.
///
/// Nodes are listed parent by parent: a node's children are emitted
/// together, before any grandchild.
pub fn emit_graph(tree: &PrefixTree, key_field: &str, sort: SortMode) -> GraphDescription {
    let mut graph = GraphDescription {
        key_field: String::from(key_field),
        sort,
        ..GraphDescription::default()
    };
    let root = tree.root();
    let root_shown = !root.snippets().is_empty();
    if root_shown {
        graph.nodes.push(make_node(root, &[], String::new(), key_field));
    }
    let mut emitter = Emitter {
        key_field,
        sort,
        root_shown,
        graph: &mut graph,
    };
    emitter.walk(root);
    tracing::debug!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        sort = %sort,
        "emitted graph description"
    );
    graph
}

fn make_node(node: &TrieNode, path: &[usize], key: String, key_field: &str) -> GraphNode {
    GraphNode {
        id: node_id(path),
        key,
        snippets: node
            .snippets()
            .iter()
            .map(|s| SnippetLabel::new(s, key_field))
            .collect(),
    }
}

/// Node whose children are still to be emitted
struct Pending<'t> {
    node: &'t TrieNode,
    path: Vec<usize>,
    key: String,
}

struct Emitter<'g> {
    key_field: &'g str,
    sort: SortMode,
    root_shown: bool,
    graph: &'g mut GraphDescription,
}

impl Emitter<'_> {
    fn walk(&mut self, root: &TrieNode) {
        let mut stack = vec![Pending {
            node: root,
            path: Vec::new(),
            key: String::new(),
        }];
        while let Some(Pending { node, path, key }) = stack.pop() {
            let next = self.emit_children(node, &path, &key);
            stack.extend(next.into_iter().rev());
        }
    }

    /// Emit the child nodes and edges of one node; returns the children
    /// in emission order.
    fn emit_children<'t>(&mut self, node: &'t TrieNode, path: &[usize], key: &str) -> Vec<Pending<'t>> {
        let tail = node_id(path);
        let sorted = self.sort.sorts_at(path.len());
        let mut edges: Vec<&'t (String, TrieNode)> = node.children().iter().collect();
        if sorted {
            edges.sort_by(|a, b| a.0.cmp(&b.0));
        }

        let mut heads: Vec<String> = Vec::new();
        let mut next = Vec::with_capacity(edges.len());
        for (i, (label, child)) in edges.into_iter().enumerate() {
            let mut child_path = Vec::with_capacity(path.len() + 1);
            child_path.extend_from_slice(path);
            child_path.push(i);
            let mut child_key = String::with_capacity(key.len() + label.len());
            child_key.push_str(key);
            child_key.push_str(label);

            let head = node_id(&child_path);
            self.graph
                .nodes
                .push(make_node(child, &child_path, child_key.clone(), self.key_field));

            if sorted {
                if let Some(prev) = heads.last() {
                    self.graph.edges.push(GraphEdge {
                        tail: prev.clone(),
                        head: head.clone(),
                        label: None,
                        kind: EdgeKind::Order,
                    });
                }
            }
            heads.push(head.clone());

            if path.is_empty() {
                let origin = if self.root_shown {
                    tail.clone()
                } else {
                    let anchor = node_id(&[i + node.child_count()]);
                    self.graph.anchors.push(anchor.clone());
                    anchor
                };
                self.graph.edges.push(GraphEdge {
                    tail: origin,
                    head,
                    label: Some(label.clone()),
                    kind: EdgeKind::Anchored,
                });
            } else {
                self.graph.edges.push(GraphEdge {
                    tail: tail.clone(),
                    head,
                    label: Some(label.clone()),
                    kind: EdgeKind::Link,
                });
            }

            next.push(Pending {
                node: child,
                path: child_path,
                key: child_key,
            });
        }

        if sorted && !heads.is_empty() {
            self.graph.rank_groups.push(heads);
        }
        next
    }
}
