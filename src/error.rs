//! Error types for the filesystem, parsing and rendering layers.
//!
//! The trie core never fails; these cover everything around it.
//!
//! Author: Moroya Sakamoto

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised while loading, checking or rendering snippets.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to walk snippet directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("invalid {field} filter regex: {source}")]
    Regex {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("failed to read mode colors: {0}")]
    ModeColors(#[source] serde_json::Error),

    #[error("failed to serialize graph: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("no match for modes: {}", .0.join(","))]
    NoMatchingModes(Vec<String>),

    #[error("{0} conflicting key(s) found")]
    Conflicts(usize),

    #[error("graph renderer exited with {status}")]
    Render { status: ExitStatus },

    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("preview command exited with {status}")]
    Preview { status: ExitStatus },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matching_modes_message() {
        let err = Error::NoMatchingModes(vec!["c-".into(), "py".into()]);
        assert_eq!(err.to_string(), "no match for modes: c-,py");
    }

    #[test]
    fn test_io_message_includes_path() {
        let err = Error::io(
            "snippets/c-mode/for",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("snippets/c-mode/for"), "{msg}");
        assert!(msg.contains("gone"), "{msg}");
    }
}
