//! Chain compression
//!
//! Collapses runs of snippet-free, single-child nodes into one edge with
//! a multi-character label. The rewrite is a bottom-up fold that builds
//! new nodes: every subtree is fully compressed before its parent decides
//! whether to merge, so one pass collapses chains of any length. The fold
//! keeps its frames on a heap stack, so key length is bounded by memory
//! only.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};
#[cfg(feature = "std")]
use std::vec;

use crate::snippet::Snippet;
use crate::trie::{PrefixTree, TrieNode};

impl PrefixTree {
    /// Compress chains, consuming the uncompressed tree.
    ///
    /// The root is never merged away, and a node carrying snippets is
    /// never merged even when it has a single child.
    pub fn compress(self) -> PrefixTree {
        let before = self.root.child_count();
        let tree = PrefixTree {
            root: compress_root(self.root),
        };
        tracing::debug!(
            root_edges_before = before,
            root_edges_after = tree.root.child_count(),
            nodes = tree.node_count(),
            "compressed prefix tree"
        );
        tree
    }

    /// True if no non-root node is a snippet-free single-child link
    pub fn is_compressed(&self) -> bool {
        self.root.nodes().skip(1).all(|node| !node.is_chain_link())
    }
}

/// One node of the fold: its incoming label, its snippets, the children
/// still to compress and the ones already compressed.
struct Frame {
    label: String,
    snippets: Vec<Snippet>,
    pending: vec::IntoIter<(String, TrieNode)>,
    done: Vec<(String, TrieNode)>,
}

impl Frame {
    fn new(label: String, node: TrieNode) -> Self {
        let (children, snippets) = node.into_parts();
        Self {
            label,
            snippets,
            done: Vec::with_capacity(children.len()),
            pending: children.into_iter(),
        }
    }

    /// Close the frame once every child is compressed, splicing a chain
    /// link into its incoming label.
    fn finish(mut self) -> (String, TrieNode) {
        if self.snippets.is_empty() && self.done.len() == 1 {
            if let Some((sole_label, sole_child)) = self.done.pop() {
                self.label.push_str(&sole_label);
                return (self.label, sole_child);
            }
        }
        (self.label, TrieNode::from_parts(self.done, self.snippets))
    }
}

fn compress_root(root: TrieNode) -> TrieNode {
    let mut root = Frame::new(String::new(), root);
    let mut stack: Vec<Frame> = Vec::new();
    loop {
        let top = stack.last_mut().unwrap_or(&mut root);
        match top.pending.next() {
            Some((label, child)) => stack.push(Frame::new(label, child)),
            None => match stack.pop() {
                Some(frame) => {
                    let edge = frame.finish();
                    stack.last_mut().unwrap_or(&mut root).done.push(edge);
                }
                // Root frame: never merged
                None => return TrieNode::from_parts(root.done, root.snippets),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snippet::Snippet;
    #[cfg(not(feature = "std"))]
    use alloc::{format, vec};

    fn tree_of(keys: &[&str]) -> PrefixTree {
        let mut tree = PrefixTree::new();
        for key in keys {
            tree.put(key, Snippet::new(&format!("m/{key}")));
        }
        tree
    }

    fn labels(node: &TrieNode) -> Vec<&str> {
        node.children().iter().map(|(l, _)| l.as_str()).collect()
    }

    fn sorted_entries(tree: &PrefixTree) -> Vec<(String, Vec<String>)> {
        let mut entries: Vec<(String, Vec<String>)> = tree
            .entries()
            .into_iter()
            .map(|(k, paths)| (k, paths.into_iter().map(String::from).collect()))
            .collect();
        entries.sort();
        entries
    }

    #[test]
    fn test_cat_car_dog() {
        let tree = tree_of(&["cat", "car", "dog"]).compress();
        let root = tree.root();
        assert_eq!(labels(root), ["ca", "dog"]);

        let ca = root.child("ca").expect("ca edge");
        assert!(ca.snippets().is_empty());
        assert_eq!(labels(ca), ["t", "r"]);
        assert_eq!(ca.child("t").unwrap().snippets()[0].rel_path, "m/cat");
        assert_eq!(ca.child("r").unwrap().snippets()[0].rel_path, "m/car");

        let dog = root.child("dog").expect("dog edge");
        assert_eq!(dog.snippets()[0].rel_path, "m/dog");
        assert!(dog.is_leaf());
    }

    #[test]
    fn test_single_key_collapses_to_one_edge() {
        let tree = tree_of(&["while"]).compress();
        assert_eq!(labels(tree.root()), ["while"]);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_root_never_merged() {
        // Root has one child and no snippets, yet must stay
        let tree = tree_of(&["ab"]).compress();
        assert!(tree.root().snippets().is_empty());
        assert_eq!(tree.root().child_count(), 1);
        assert!(tree.get("ab").is_some());
    }

    #[test]
    fn test_node_with_snippet_not_merged() {
        let tree = tree_of(&["do", "done"]).compress();
        assert_eq!(labels(tree.root()), ["do"]);
        let d = tree.root().child("do").unwrap();
        assert_eq!(d.snippets().len(), 1);
        assert_eq!(labels(d), ["ne"]);
    }

    #[test]
    fn test_empty_key_on_root_kept() {
        let mut tree = tree_of(&["abc"]);
        tree.put("", Snippet::new("m/root"));
        let tree = tree.compress();
        assert_eq!(tree.root().snippets().len(), 1);
        assert_eq!(labels(tree.root()), ["abc"]);
    }

    #[test]
    fn test_empty_tree_compresses() {
        let tree = PrefixTree::new().compress();
        assert!(tree.is_empty());
        assert!(tree.is_compressed());
    }

    #[test]
    fn test_deep_chain_single_pass() {
        let tree = tree_of(&["a", "abcdefgh", "abcdefgx"]).compress();
        let a = tree.root().child("a").unwrap();
        assert_eq!(labels(a), ["bcdefg"]);
        let g = a.child("bcdefg").unwrap();
        assert_eq!(labels(g), ["h", "x"]);
    }

    #[test]
    fn test_compress_preserves_entries() {
        let keys = [
            "for", "fore", "forall", "while", "with", "w", "if", "ifdef", "ifndef", "x",
        ];
        let tree = tree_of(&keys);
        let before = sorted_entries(&tree);
        let after = sorted_entries(&tree.compress());
        assert_eq!(before, after);
    }

    #[test]
    fn test_compress_eliminates_chain_links() {
        let keys = ["alpha", "alps", "beta", "bet", "gamma", "g", "delta"];
        let tree = tree_of(&keys);
        assert!(!tree.is_compressed());
        let tree = tree.compress();
        assert!(tree.is_compressed());
    }

    #[test]
    fn test_compress_idempotent() {
        let keys = ["inc", "include", "incl", "ifdef", "ifndef", "main", "m"];
        let once = tree_of(&keys).compress();
        let twice = once.clone().compress();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_compress_keeps_sibling_order() {
        let tree = tree_of(&["zeta", "alpha", "mu"]).compress();
        assert_eq!(labels(tree.root()), ["zeta", "alpha", "mu"]);
    }

    #[test]
    fn test_properties_over_generated_key_sets() {
        // Keys over a tiny alphabet force lots of shared prefixes
        let alphabet = ['a', 'b', 'c'];
        for seed in 0u32..40 {
            let mut keys: Vec<String> = Vec::new();
            let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
            for _ in 0..(seed % 9 + 1) {
                let mut key = String::new();
                state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                let len = (state >> 16) % 6;
                for _ in 0..len {
                    state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                    key.push(alphabet[((state >> 16) % 3) as usize]);
                }
                keys.push(key);
            }
            let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
            let tree = tree_of(&refs);
            let before = sorted_entries(&tree);
            let once = tree.compress();
            assert_eq!(before, sorted_entries(&once), "seed {seed}");
            assert!(once.is_compressed(), "seed {seed}");
            assert_eq!(once.clone().compress(), once, "seed {seed}");
        }
    }

    // ── Long keys ──────────────────────────────────────────────────────

    #[test]
    fn test_long_key_compresses_to_one_edge() {
        let key = "a".repeat(200_000);
        let mut tree = PrefixTree::new();
        tree.put(&key, Snippet::new("m/long"));
        let tree = tree.compress();
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.root().children()[0].0.len(), 200_000);
        assert!(tree.is_compressed());
        assert_eq!(tree.get(&key).unwrap().snippets()[0].rel_path, "m/long");
    }

    #[test]
    fn test_long_key_with_branch_at_end() {
        let stem = "x".repeat(150_000);
        let mut tree = PrefixTree::new();
        tree.put(&stem[..1], Snippet::new("m/x"));
        tree.put(&format!("{stem}1"), Snippet::new("m/1"));
        tree.put(&format!("{stem}2"), Snippet::new("m/2"));
        let tree = tree.compress();
        // x, the merged stem, and its two leaves
        assert_eq!(tree.node_count(), 5);
        let x = tree.root().child("x").unwrap();
        let stem_node = x.child(&stem[1..]).expect("merged stem");
        assert_eq!(labels(stem_node), ["1", "2"]);
    }
}
