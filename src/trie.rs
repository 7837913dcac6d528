//! Prefix tree over snippet keys
//!
//! Each edge carries a non-empty label; concatenating the labels from
//! the root to a node spells the key its snippets were inserted under.
//! Before compression every label is a single character.
//!
//! Children keep first-insertion order, so traversals are deterministic
//! without any sorting. A label → index map gives O(1) child lookup
//! while inserting.
//!
//! A tree is as deep as its longest key, so every walk (traversal,
//! clone, comparison, drop) runs on an explicit heap stack.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap as HashMap;
#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};
#[cfg(feature = "std")]
use std::collections::HashMap;

use core::fmt;
use core::mem;

use crate::snippet::Snippet;

/// Trie node — owns its children exclusively
#[derive(Default)]
pub struct TrieNode {
    /// (edge label, child) in first-insertion order
    children: Vec<(String, TrieNode)>,
    /// Maps edge label → index in `children`
    index: HashMap<String, usize>,
    /// Snippets whose key ends at this node, deduplicated by path
    snippets: Vec<Snippet>,
}

impl TrieNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a node from already-assembled parts
    pub(crate) fn from_parts(children: Vec<(String, TrieNode)>, snippets: Vec<Snippet>) -> Self {
        let index = children
            .iter()
            .enumerate()
            .map(|(i, (label, _))| (label.clone(), i))
            .collect();
        Self {
            children,
            index,
            snippets,
        }
    }

    /// Split a node back into its parts
    pub(crate) fn into_parts(mut self) -> (Vec<(String, TrieNode)>, Vec<Snippet>) {
        (mem::take(&mut self.children), mem::take(&mut self.snippets))
    }

    /// Outgoing edges in first-insertion order
    pub fn children(&self) -> &[(String, TrieNode)] {
        &self.children
    }

    /// Child under exactly this edge label
    pub fn child(&self, label: &str) -> Option<&TrieNode> {
        self.index.get(label).map(|&idx| &self.children[idx].1)
    }

    /// Snippets attached to this node
    pub fn snippets(&self) -> &[Snippet] {
        &self.snippets
    }

    /// Number of outgoing edges
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// True if this node has no snippets and exactly one child
    pub fn is_chain_link(&self) -> bool {
        self.snippets.is_empty() && self.children.len() == 1
    }

    fn child_or_insert(&mut self, label: &str) -> &mut TrieNode {
        let idx = match self.index.get(label) {
            Some(&idx) => idx,
            None => {
                let idx = self.children.len();
                self.children.push((String::from(label), TrieNode::new()));
                self.index.insert(String::from(label), idx);
                idx
            }
        };
        &mut self.children[idx].1
    }

    /// Attach a snippet; a snippet with the same path is only kept once
    fn attach(&mut self, snippet: Snippet) {
        if !self.snippets.contains(&snippet) {
            self.snippets.push(snippet);
        }
    }

    /// This node and every descendant, pre-order
    pub(crate) fn nodes(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }
}

/// Pre-order walk over nodes only, without key chunks
pub(crate) struct Nodes<'a> {
    stack: Vec<&'a TrieNode>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a TrieNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children.iter().rev().map(|(_, child)| child));
        Some(node)
    }
}

// ── Iterative Drop / Clone / Eq / Debug ───────────────────────────────

impl Drop for TrieNode {
    fn drop(&mut self) {
        let mut stack: Vec<TrieNode> = self.children.drain(..).map(|(_, child)| child).collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.children.drain(..).map(|(_, child)| child));
            // `node` drops here with no children left
        }
    }
}

/// A node being cloned: its copied snippets and children cloned so far
struct CloneFrame<'a> {
    label: String,
    snippets: Vec<Snippet>,
    pending: core::slice::Iter<'a, (String, TrieNode)>,
    done: Vec<(String, TrieNode)>,
}

impl<'a> CloneFrame<'a> {
    fn new(label: String, node: &'a TrieNode) -> Self {
        Self {
            label,
            snippets: node.snippets.clone(),
            pending: node.children.iter(),
            done: Vec::with_capacity(node.children.len()),
        }
    }
}

impl Clone for TrieNode {
    fn clone(&self) -> Self {
        let mut stack = vec![CloneFrame::new(String::new(), self)];
        while let Some(mut frame) = stack.pop() {
            if let Some((label, child)) = frame.pending.next() {
                stack.push(frame);
                stack.push(CloneFrame::new(label.clone(), child));
                continue;
            }
            let node = TrieNode::from_parts(frame.done, frame.snippets);
            match stack.last_mut() {
                Some(parent) => parent.done.push((frame.label, node)),
                None => return node,
            }
        }
        TrieNode::new()
    }
}

impl PartialEq for TrieNode {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.snippets != b.snippets || a.children.len() != b.children.len() {
                return false;
            }
            for ((la, ca), (lb, cb)) in a.children.iter().zip(&b.children) {
                if la != lb {
                    return false;
                }
                stack.push((ca, cb));
            }
        }
        true
    }
}

impl fmt::Debug for TrieNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrieNode")
            .field("edges", &self.children.len())
            .field("snippets", &self.snippets)
            .field("nodes", &self.nodes().count())
            .finish()
    }
}

/// Prefix tree — the root represents the empty key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrefixTree {
    pub(crate) root: TrieNode,
}

impl PrefixTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Insert `snippet` under `key`, one single-character edge per char.
    /// An empty key attaches to the root.
    pub fn put(&mut self, key: &str, snippet: Snippet) {
        let mut node = &mut self.root;
        let mut buf = [0u8; 4];
        for c in key.chars() {
            node = node.child_or_insert(c.encode_utf8(&mut buf));
        }
        node.attach(snippet);
    }

    /// Node reached by consuming exactly `key`, following edges of any length
    pub fn get(&self, key: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        let mut rest = key;
        while !rest.is_empty() {
            let (label, child) = node
                .children
                .iter()
                .find(|(label, _)| rest.starts_with(label.as_str()))?;
            rest = &rest[label.len()..];
            node = child;
        }
        Some(node)
    }

    /// Total node count, root included
    pub fn node_count(&self) -> usize {
        self.root.nodes().count()
    }

    /// Total attached snippets over all nodes
    pub fn snippet_count(&self) -> usize {
        self.root.nodes().map(|node| node.snippets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty() && self.root.snippets.is_empty()
    }

    /// Pre-order traversal. `visitor` receives each node with the edge
    /// labels leading to it; `context` is threaded through every call.
    pub fn dfs<'a, C, F>(&'a self, mut visitor: F, context: &mut C)
    where
        F: FnMut(&'a TrieNode, &[&'a str], &mut C),
    {
        let mut key_chunks: Vec<&'a str> = Vec::new();
        visitor(&self.root, key_chunks.as_slice(), context);

        // (chunks above the edge, edge label, child)
        let mut stack: Vec<(usize, &'a str, &'a TrieNode)> = self
            .root
            .children
            .iter()
            .rev()
            .map(|(label, child)| (0, label.as_str(), child))
            .collect();
        while let Some((depth, label, node)) = stack.pop() {
            key_chunks.truncate(depth);
            key_chunks.push(label);
            visitor(node, key_chunks.as_slice(), context);
            for (label, child) in node.children.iter().rev() {
                stack.push((depth + 1, label.as_str(), child));
            }
        }
    }

    /// Pre-order iterator over `(key chunks, node)`, same order as [`dfs`](Self::dfs)
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            stack: vec![(Vec::new(), &self.root)],
        }
    }

    /// Every key with attached snippets and the paths attached under it
    pub fn entries(&self) -> Vec<(String, Vec<&str>)> {
        self.iter()
            .filter(|(_, node)| !node.snippets.is_empty())
            .map(|(chunks, node)| {
                let paths = node.snippets.iter().map(|s| s.rel_path.as_str()).collect();
                (chunks.concat(), paths)
            })
            .collect()
    }
}

/// Explicit-stack pre-order iterator. Each yielded chunk list is its own
/// copy, so items stay valid while the traversal continues.
pub struct Iter<'a> {
    stack: Vec<(Vec<&'a str>, &'a TrieNode)>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Vec<&'a str>, &'a TrieNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (chunks, node) = self.stack.pop()?;
        // Reverse push keeps siblings in stored order
        for (label, child) in node.children.iter().rev() {
            let mut child_chunks = chunks.clone();
            child_chunks.push(label.as_str());
            self.stack.push((child_chunks, child));
        }
        Some((chunks, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[cfg(not(feature = "std"))]
    use alloc::{format, string::ToString};

    fn snip(path: &str) -> Snippet {
        Snippet::new(path)
    }

    #[test]
    fn test_empty_tree() {
        let tree = PrefixTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.snippet_count(), 0);
    }

    #[test]
    fn test_put_single_char_edges() {
        let mut tree = PrefixTree::new();
        tree.put("cat", snip("m/cat"));
        assert_eq!(tree.node_count(), 4); // root + c + a + t
        let c = tree.root().child("c").expect("c edge");
        let a = c.child("a").expect("a edge");
        let t = a.child("t").expect("t edge");
        assert_eq!(t.snippets().len(), 1);
        assert!(c.snippets().is_empty());
    }

    #[test]
    fn test_put_empty_key_attaches_to_root() {
        let mut tree = PrefixTree::new();
        tree.put("", snip("m/empty"));
        assert_eq!(tree.root().snippets().len(), 1);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_put_shares_prefixes() {
        let mut tree = PrefixTree::new();
        tree.put("cat", snip("m/cat"));
        tree.put("car", snip("m/car"));
        assert_eq!(tree.node_count(), 5); // root + c + a + t + r
        assert_eq!(tree.root().child_count(), 1);
    }

    #[test]
    fn test_put_same_path_is_set_insert() {
        let mut tree = PrefixTree::new();
        tree.put("k", snip("m/k"));
        tree.put("k", snip("m/k"));
        assert_eq!(tree.get("k").unwrap().snippets().len(), 1);
    }

    #[test]
    fn test_put_unicode_key() {
        let mut tree = PrefixTree::new();
        tree.put("λx", snip("m/lambda"));
        assert!(tree.root().child("λ").is_some());
        assert_eq!(tree.get("λx").unwrap().snippets().len(), 1);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut tree = PrefixTree::new();
        for key in ["z", "a", "m"] {
            tree.put(key, snip(key));
        }
        let labels: Vec<&str> = tree
            .root()
            .children()
            .iter()
            .map(|(l, _)| l.as_str())
            .collect();
        assert_eq!(labels, ["z", "a", "m"]);
    }

    #[test]
    fn test_get_missing() {
        let mut tree = PrefixTree::new();
        tree.put("cat", snip("m/cat"));
        assert!(tree.get("cow").is_none());
        assert!(tree.get("cats").is_none());
        assert!(tree.get("ca").unwrap().snippets().is_empty());
    }

    #[test]
    fn test_dfs_pre_order_with_chunks() {
        let mut tree = PrefixTree::new();
        tree.put("ab", snip("m/ab"));
        tree.put("b", snip("m/b"));
        let mut seen: Vec<String> = Vec::new();
        tree.dfs(
            |_, chunks, seen: &mut Vec<String>| seen.push(chunks.concat()),
            &mut seen,
        );
        assert_eq!(seen, ["", "a", "ab", "b"]);
    }

    #[test]
    fn test_dfs_context_threaded() {
        let mut tree = PrefixTree::new();
        tree.put("abc", snip("m/1"));
        tree.put("abd", snip("m/2"));
        let mut visits = 0usize;
        tree.dfs(|_, _, n: &mut usize| *n += 1, &mut visits);
        assert_eq!(visits, tree.node_count());
    }

    #[test]
    fn test_iter_matches_dfs_order() {
        let mut tree = PrefixTree::new();
        for (i, key) in ["to", "tea", "ted", "ten", "i", "in", "inn"].iter().enumerate() {
            tree.put(key, snip(&format!("m/{i}")));
        }
        let mut from_dfs: Vec<String> = Vec::new();
        tree.dfs(|_, chunks, out: &mut Vec<String>| out.push(chunks.concat()), &mut from_dfs);
        let from_iter: Vec<String> = tree.iter().map(|(chunks, _)| chunks.concat()).collect();
        assert_eq!(from_dfs, from_iter);
    }

    #[test]
    fn test_iter_items_independent() {
        let mut tree = PrefixTree::new();
        tree.put("ab", snip("m/ab"));
        tree.put("ac", snip("m/ac"));
        let items: Vec<_> = tree.iter().collect();
        // Collected chunk lists must not alias each other
        let keys: Vec<String> = items.iter().map(|(c, _)| c.concat()).collect();
        assert_eq!(keys, ["", "a", "ab", "ac"]);
    }

    #[test]
    fn test_entries_reproduce_keys() {
        let keys = ["for", "fori", "while", "do", "d"];
        let mut tree = PrefixTree::new();
        for key in keys {
            tree.put(key, snip(&format!("m/{key}")));
        }
        let mut entries = tree.entries();
        entries.sort();
        let mut expected: Vec<(String, Vec<String>)> = keys
            .iter()
            .map(|k| (k.to_string(), vec![format!("m/{k}")]))
            .collect();
        expected.sort();
        let entries: Vec<(String, Vec<String>)> = entries
            .into_iter()
            .map(|(k, paths)| (k, paths.into_iter().map(String::from).collect()))
            .collect();
        assert_eq!(entries, expected);
    }

    #[test]
    fn test_insertion_order_irrelevant_to_entries() {
        let keys = ["abc", "ab", "b", "abd"];
        let mut t1 = PrefixTree::new();
        let mut t2 = PrefixTree::new();
        for key in keys {
            t1.put(key, snip(key));
        }
        for key in keys.iter().rev() {
            t2.put(key, snip(key));
        }
        let mut e1 = t1.entries();
        let mut e2 = t2.entries();
        e1.sort();
        e2.sort();
        assert_eq!(e1, e2);
        assert_eq!(t1.node_count(), t2.node_count());
    }

    #[test]
    fn test_snippet_count() {
        let mut tree = PrefixTree::new();
        tree.put("a", snip("m/1"));
        tree.put("a", snip("m/2"));
        tree.put("b", snip("m/3"));
        assert_eq!(tree.snippet_count(), 3);
    }

    // ── Long keys ──────────────────────────────────────────────────────

    const LONG: usize = 200_000;

    #[test]
    fn test_long_key_walks_without_recursion() {
        let key = "a".repeat(LONG);
        let mut tree = PrefixTree::new();
        tree.put(&key, snip("m/long"));
        tree.put(&key[..10], snip("m/short"));
        assert_eq!(tree.node_count(), LONG + 1);
        assert_eq!(tree.snippet_count(), 2);
        assert_eq!(tree.get(&key).unwrap().snippets()[0].rel_path, "m/long");

        let mut deepest = 0usize;
        tree.dfs(
            |_, chunks, deepest: &mut usize| *deepest = (*deepest).max(chunks.len()),
            &mut deepest,
        );
        assert_eq!(deepest, LONG);

        let copy = tree.clone();
        assert_eq!(copy, tree);
        drop(copy);
        drop(tree);
    }

    #[test]
    fn test_clone_and_eq_see_deep_differences() {
        let key = "b".repeat(LONG);
        let mut a = PrefixTree::new();
        a.put(&key, snip("m/1"));
        let mut b = a.clone();
        assert_eq!(a, b);
        b.put(&key, snip("m/2"));
        assert_ne!(a, b);
    }
}
