//! Snippet filters
//!
//! Optional regexes over `name`, `group`, `path` and `body`. A regex
//! prefixed with `(?~)` is negated: the snippet is kept only when the
//! rest of the pattern does *not* match.
//!
//! Author: Moroya Sakamoto

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::{Error, Result};
use crate::snippet::Snippet;

/// Prefix marking a negated filter
pub const NEGATED_REGEX_PREFIX: &str = "(?~)";

/// Properties a filter may be set on
pub const FILTER_FIELDS: [&str; 4] = ["name", "group", "path", "body"];

/// One compiled filter
#[derive(Debug, Clone)]
pub struct NegatableRegex {
    pub negated: bool,
    pub regex: Regex,
}

impl NegatableRegex {
    /// Compile `pattern`, stripping a leading `(?~)`
    pub fn parse(field: &'static str, pattern: &str) -> Result<Self> {
        let (negated, positive) = match pattern.strip_prefix(NEGATED_REGEX_PREFIX) {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        let regex = Regex::new(positive).map_err(|source| Error::Regex { field, source })?;
        Ok(Self { negated, regex })
    }

    /// True if `value` passes this filter
    pub fn accepts(&self, value: &str) -> bool {
        self.regex.is_match(value) != self.negated
    }
}

/// Set of per-property filters
#[derive(Debug, Clone, Default)]
pub struct SnippetFilter {
    filters: BTreeMap<&'static str, NegatableRegex>,
}

impl SnippetFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter on `field` (one of [`FILTER_FIELDS`])
    pub fn with(mut self, field: &'static str, pattern: &str) -> Result<Self> {
        self.filters
            .insert(field, NegatableRegex::parse(field, pattern)?);
        Ok(self)
    }

    /// Build from optional patterns in [`FILTER_FIELDS`] order
    pub fn from_patterns(patterns: [Option<&str>; 4]) -> Result<Self> {
        let mut filter = Self::new();
        for (field, pattern) in FILTER_FIELDS.into_iter().zip(patterns) {
            if let Some(pattern) = pattern {
                filter = filter.with(field, pattern)?;
            }
        }
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// True if a body filter is set, so bodies must be kept while parsing
    pub fn needs_body(&self) -> bool {
        self.filters.contains_key("body")
    }

    /// True if every filtered property of `snippet` passes
    pub fn matches(&self, snippet: &Snippet) -> bool {
        for (key, value) in snippet.properties() {
            if let Some(filter) = self.filters.get(key) {
                if !filter.accepts(value) {
                    tracing::info!(path = %snippet.rel_path, field = key, "ignoring snippet");
                    return false;
                }
            }
        }
        true
    }
}
