//! snippet-vis — Snippet Prefix-Tree Visualizer
//!
//! Group snippets by a header field, collapse chains, catch collisions.
//!
//! Indexes a directory of header-tagged snippet files into prefix trees:
//! - One single-character edge per key character, snippets on the node
//!   the key ends at
//! - Chain compression into multi-character edges
//! - Conflict detection (several snippets under one key)
//! - Renderer-agnostic graph description, rendered to Graphviz DOT
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`snippet`] | Snippet record (header, meta, body, relative path) |
//! | [`trie`] | Prefix tree with insertion-ordered children and DFS |
//! | [`compress`] | Bottom-up chain compression |
//! | [`conflict`] | Key collision report |
//! | [`graph`] | Graph description emitter (nodes, edges, anchors, ranks) |
//! | [`grouping`] | Grouping keys and the per-key trie index |
//! | `error` | Crate error type (`std`) |
//! | `parse` | Snippet file header parser (`std`) |
//! | `filter` | Negatable regex filters (`std`) |
//! | `modes` | Mode directories, `.yas-parents`, file discovery (`std`) |
//! | `dot` | Graphviz DOT renderer, `dot` and preview runners (`std`) |
//! | `config` | Command-line configuration (`cli`) |
//! | `pipeline` | End-to-end run (`cli`) |
//!
//! # Feature flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `std` | Filesystem, parsing, filtering and rendering (default; core is `no_std` + `alloc`) |
//! | `cli` | Configuration, pipeline and the `snippet-vis` binary (default) |
//!
//! # Quick Start
//!
//! ```
//! use snippet_vis::{emit_graph, find_conflicts, PrefixTree, Snippet, SortMode};
//!
//! let mut tree = PrefixTree::new();
//! tree.put("cat", Snippet::new("m/cat").with_header("name", "cat"));
//! tree.put("car", Snippet::new("m/car").with_header("name", "car"));
//! tree.put("dog", Snippet::new("m/dog").with_header("name", "dog"));
//!
//! // "c" -> "a" collapses into a single "ca" edge
//! let tree = tree.compress();
//! let labels: Vec<&str> = tree.root().children().iter().map(|(label, _)| label.as_str()).collect();
//! assert_eq!(labels, ["ca", "dog"]);
//!
//! assert!(find_conflicts(&tree, "name").is_clean());
//! let graph = emit_graph(&tree, "name", SortMode::All);
//! assert_eq!(graph.nodes.len(), 4);
//! ```
//!
//! Author: Moroya Sakamoto

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod compress;
pub mod conflict;
pub mod graph;
pub mod grouping;
pub mod snippet;
pub mod trie;

#[cfg(feature = "std")]
pub mod dot;
#[cfg(feature = "std")]
pub mod error;
#[cfg(feature = "std")]
pub mod filter;
#[cfg(feature = "std")]
pub mod modes;
#[cfg(feature = "std")]
pub mod parse;

#[cfg(feature = "cli")]
pub mod config;
#[cfg(feature = "cli")]
pub mod pipeline;

pub use conflict::{check_conflicts, find_conflicts, Conflict, ConflictReport};
pub use graph::{emit_graph, EdgeKind, GraphDescription, GraphEdge, GraphNode, SnippetLabel, SortMode};
pub use grouping::{GroupingKey, SnippetIndex};
pub use snippet::Snippet;
pub use trie::{PrefixTree, TrieNode};

#[cfg(feature = "std")]
pub use dot::DotRenderer;
#[cfg(feature = "std")]
pub use error::{Error, Result};
#[cfg(feature = "std")]
pub use filter::SnippetFilter;
#[cfg(feature = "std")]
pub use parse::{load_snippet, parse_snippet};

#[cfg(feature = "cli")]
pub use config::VisConfig;
#[cfg(feature = "cli")]
pub use pipeline::{run, Outcome};
