//! Grouping keys and the per-key trie index
//!
//! Every snippet is inserted into one prefix tree per grouping field it
//! carries, so the same snippet set can be viewed by `key`, `group` or
//! `name`.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::{borrow::ToOwned, string::String};

use core::fmt;
use core::str::FromStr;

use crate::snippet::Snippet;
use crate::trie::PrefixTree;

/// Header field a trie is built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum GroupingKey {
    /// Expansion key
    #[default]
    Key,
    /// Menu group
    Group,
    /// Display name
    Name,
}

impl GroupingKey {
    pub const ALL: [GroupingKey; 3] = [GroupingKey::Key, GroupingKey::Group, GroupingKey::Name];

    /// Position in [`ALL`](Self::ALL)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Header field name
    pub fn as_str(self) -> &'static str {
        match self {
            GroupingKey::Key => "key",
            GroupingKey::Group => "group",
            GroupingKey::Name => "name",
        }
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown grouping field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGroupingKey(pub String);

impl fmt::Display for UnknownGroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown grouping key: {} (expected key, group or name)", self.0)
    }
}

impl FromStr for GroupingKey {
    type Err = UnknownGroupingKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GroupingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| UnknownGroupingKey(s.to_owned()))
    }
}

/// One prefix tree per grouping key, indexed by [`GroupingKey::index`]
#[derive(Debug, Clone)]
pub struct SnippetIndex {
    tries: [PrefixTree; 3],
}

impl Default for SnippetIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SnippetIndex {
    pub fn new() -> Self {
        Self {
            tries: [PrefixTree::new(), PrefixTree::new(), PrefixTree::new()],
        }
    }

    /// Insert `snippet` into every trie whose field it carries.
    ///
    /// A missing `key` field is logged; missing `group`/`name` fields are
    /// expected and silently skipped. Returns how many tries got the snippet.
    pub fn insert(&mut self, snippet: &Snippet) -> usize {
        let mut inserted = 0;
        for (grouping, tree) in GroupingKey::ALL.into_iter().zip(self.tries.iter_mut()) {
            match snippet.header_value(grouping.as_str()) {
                Some(value) => {
                    tree.put(value, snippet.clone());
                    inserted += 1;
                }
                None if grouping == GroupingKey::Key => {
                    tracing::warn!(path = %snippet.rel_path, "snippet without key");
                }
                None => {}
            }
        }
        inserted
    }

    /// Compress every trie
    pub fn compress(self) -> Self {
        Self {
            tries: self.tries.map(PrefixTree::compress),
        }
    }

    /// Trie built on `grouping`
    pub fn trie(&self, grouping: GroupingKey) -> &PrefixTree {
        &self.tries[grouping.index()]
    }

    /// Take the trie built on `grouping`
    pub fn into_trie(self, grouping: GroupingKey) -> PrefixTree {
        let [key, group, name] = self.tries;
        match grouping {
            GroupingKey::Key => key,
            GroupingKey::Group => group,
            GroupingKey::Name => name,
        }
    }
}
