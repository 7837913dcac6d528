//! Snippet records
//!
//! A snippet is a header-tagged text record identified by its path
//! relative to the snippet root. Header fields (`key`, `group`, `name`,
//! ...) drive the grouping tries; everything else is carried along for
//! labelling and filtering.
//!
//! Author: Moroya Sakamoto

#[cfg(not(feature = "std"))]
use alloc::{collections::BTreeMap, string::String, vec::Vec};
#[cfg(feature = "std")]
use std::collections::BTreeMap;

use core::cmp::Ordering;
use core::hash::{Hash, Hasher};

/// Path separator used in relative snippet paths
pub const PATH_SEPARATOR: char = '/';

/// Immutable snippet record. Identity is the relative path alone.
#[derive(Debug, Clone, Default)]
pub struct Snippet {
    /// Header fields (`# key: value` lines)
    pub header: BTreeMap<String, String>,
    /// Meta fields (`# -*- k: v; ... -*-` lines)
    pub meta: BTreeMap<String, String>,
    /// Body text after the end-of-header marker, if it was kept
    pub body: Option<String>,
    /// Path relative to the snippet root, `<major-mode>/<file>`
    pub rel_path: String,
}

impl Snippet {
    pub fn new(rel_path: &str) -> Self {
        Self {
            rel_path: String::from(rel_path),
            ..Self::default()
        }
    }

    /// Builder: set a header field
    pub fn with_header(mut self, field: &str, value: &str) -> Self {
        self.header.insert(String::from(field), String::from(value));
        self
    }

    /// Builder: set a meta field
    pub fn with_meta(mut self, field: &str, value: &str) -> Self {
        self.meta.insert(String::from(field), String::from(value));
        self
    }

    /// Builder: set the body
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(String::from(body));
        self
    }

    /// Header value for `field`, if present
    pub fn header_value(&self, field: &str) -> Option<&str> {
        self.header.get(field).map(String::as_str)
    }

    /// The `name` header field, or an empty string
    pub fn name(&self) -> &str {
        self.header_value("name").unwrap_or("")
    }

    /// Major mode — the first component of the relative path
    pub fn major_mode(&self) -> Option<&str> {
        self.rel_path
            .find(PATH_SEPARATOR)
            .map(|end| &self.rel_path[..end])
    }

    /// All filterable properties: header, meta, `path`, and `body` when kept
    pub fn properties(&self) -> Vec<(&str, &str)> {
        let mut props: Vec<(&str, &str)> = self
            .header
            .iter()
            .chain(self.meta.iter())
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        props.push(("path", self.rel_path.as_str()));
        if let Some(body) = &self.body {
            props.push(("body", body.as_str()));
        }
        props
    }
}

impl PartialEq for Snippet {
    fn eq(&self, other: &Self) -> bool {
        self.rel_path == other.rel_path
    }
}

impl Eq for Snippet {}

impl Hash for Snippet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.rel_path.hash(state);
    }
}

impl PartialOrd for Snippet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Snippet {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rel_path.cmp(&other.rel_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_path_only() {
        let a = Snippet::new("c-mode/for").with_header("key", "for");
        let b = Snippet::new("c-mode/for").with_header("key", "fori");
        let c = Snippet::new("c-mode/while").with_header("key", "for");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_major_mode() {
        assert_eq!(Snippet::new("c-mode/for").major_mode(), Some("c-mode"));
        assert_eq!(
            Snippet::new("c-mode/loops/for").major_mode(),
            Some("c-mode")
        );
        assert_eq!(Snippet::new("orphan").major_mode(), None);
    }

    #[test]
    fn test_header_accessors() {
        let s = Snippet::new("m/x")
            .with_header("name", "for loop")
            .with_header("key", "for");
        assert_eq!(s.name(), "for loop");
        assert_eq!(s.header_value("key"), Some("for"));
        assert_eq!(s.header_value("group"), None);
        assert_eq!(Snippet::new("m/y").name(), "");
    }

    #[test]
    fn test_properties_include_path_and_body() {
        let s = Snippet::new("m/x")
            .with_header("name", "n")
            .with_meta("coding", "utf-8")
            .with_body("body text");
        let props = s.properties();
        assert!(props.contains(&("name", "n")));
        assert!(props.contains(&("coding", "utf-8")));
        assert!(props.contains(&("path", "m/x")));
        assert!(props.contains(&("body", "body text")));
    }

    #[test]
    fn test_properties_without_body() {
        let s = Snippet::new("m/x");
        let props = s.properties();
        assert_eq!(props, [("path", "m/x")]);
    }

    #[test]
    fn test_ordering_by_path() {
        let a = Snippet::new("a/x").with_header("name", "z");
        let b = Snippet::new("b/x").with_header("name", "a");
        assert!(a < b);
    }
}
