//! Key collision detection
//!
//! A conflict is a trie node holding more than one snippet: several
//! distinct files map to the same key under the grouping field in use.
//! Every conflicting node is reported, not just the first.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::trie::PrefixTree;

/// One conflicting key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Full key spelled by the path to the node
    pub key: String,
    /// Value of the grouping field from the first snippet exposing one
    pub representative: Option<String>,
    /// Relative paths of every snippet under the key
    pub paths: Vec<String>,
}

/// Conflict check result
#[derive(Debug, Clone)]
pub struct ConflictReport {
    /// Header field the tree was built on
    pub key_field: String,
    /// Conflicts in traversal order
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    /// True if no key maps to more than one snippet
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }

    /// Log every conflict at error level
    pub fn log(&self) {
        for conflict in &self.conflicts {
            tracing::error!(
                field = %self.key_field,
                value = conflict.representative.as_deref().unwrap_or(""),
                "{} conflict",
                self.key_field
            );
            for path in &conflict.paths {
                tracing::error!(path = %path, "@ {}", path);
            }
        }
    }
}

/// Collect every node with more than one attached snippet.
///
/// Read-only: the tree is never modified.
pub fn find_conflicts(tree: &PrefixTree, key_field: &str) -> ConflictReport {
    let mut conflicts: Vec<Conflict> = Vec::new();
    tree.dfs(
        |node, key_chunks, conflicts: &mut Vec<Conflict>| {
            let snippets = node.snippets();
            if snippets.len() <= 1 {
                return;
            }
            let representative = snippets
                .iter()
                .filter_map(|s| s.header_value(key_field))
                .find(|v| !v.is_empty())
                .map(String::from);
            conflicts.push(Conflict {
                key: key_chunks.concat(),
                representative,
                paths: snippets.iter().map(|s| s.rel_path.clone()).collect(),
            });
        },
        &mut conflicts,
    );
    ConflictReport {
        key_field: String::from(key_field),
        conflicts,
    }
}

/// Check a tree for conflicts, logging each one.
///
/// Returns `true` when the whole tree is conflict-free.
pub fn check_conflicts(tree: &PrefixTree, key_field: &str) -> bool {
    let report = find_conflicts(tree, key_field);
    report.log();
    report.is_clean()
}
