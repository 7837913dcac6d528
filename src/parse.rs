//! Snippet file parser
//!
//! A snippet file starts with a comment header terminated by `# --`:
//!
//! ```text
//! # -*- mode: snippet; coding: utf-8 -*-
//! # name: for loop
//! # key: for
//! # group: loops
//! # --
//! for (${1:i} = 0; $1 < ${2:n}; ++$1) {
//!   $0
//! }
//! ```
//!
//! `# -*- k: v; ... -*-` lines fill the meta map, `# k: v` lines fill the
//! header map. The body is only kept when asked for.
//!
//! Author: Moroya Sakamoto

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::snippet::{Snippet, PATH_SEPARATOR};

static HEADER_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*#\s*--\s*$").unwrap());
static HEADER_META: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#\s*-\*-\s+(.*)-\*-\s*$").unwrap());
static HEADER_KEY_VAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*#([^:]*):\s*(.*?)\s*$").unwrap());

/// Parse result
#[derive(Debug, Clone)]
pub struct Parsed {
    pub snippet: Snippet,
    /// False if the text had no `# --` line
    pub header_terminated: bool,
}

/// Parse snippet text. `keep_body` retains everything after `# --`.
pub fn parse_snippet(text: &str, rel_path: &str, keep_body: bool) -> Parsed {
    let mut snippet = Snippet::new(rel_path);
    let mut body = String::new();
    let mut header_terminated = false;

    for raw in text.split_inclusive('\n') {
        if header_terminated {
            body.push_str(raw);
            continue;
        }
        let line = raw.trim_end_matches(['\n', '\r']);
        if HEADER_END.is_match(line) {
            header_terminated = true;
            if !keep_body {
                break;
            }
            continue;
        }

        let line = line.trim();
        if let Some(caps) = HEADER_META.captures(line) {
            for pair in caps[1].split(';') {
                let (k, v) = pair.split_once(':').unwrap_or((pair, ""));
                snippet.meta.insert(k.trim().to_owned(), v.trim().to_owned());
            }
            continue;
        }
        if let Some(caps) = HEADER_KEY_VAL.captures(line) {
            snippet
                .header
                .insert(caps[1].trim().to_owned(), caps[2].trim().to_owned());
        }
    }

    if keep_body && !body.is_empty() {
        snippet.body = Some(body);
    }
    Parsed {
        snippet,
        header_terminated,
    }
}

/// Relative path of `path` under `root`, `/`-separated
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let mut out = String::new();
    for (i, component) in rel.components().enumerate() {
        if i > 0 {
            out.push(PATH_SEPARATOR);
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}

/// Read and parse the snippet file at `path`; `rel_path` is taken
/// relative to `root`.
pub fn load_snippet(root: &Path, path: &Path, keep_body: bool) -> Result<Snippet> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let text = String::from_utf8_lossy(&bytes);
    let rel_path = relative_path(root, path);
    let parsed = parse_snippet(&text, &rel_path, keep_body);
    if !parsed.header_terminated {
        tracing::warn!(path = %rel_path, "no end of header");
    }
    Ok(parsed.snippet)
}
