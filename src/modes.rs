//! Major modes and snippet discovery
//!
//! The snippet root holds one directory per major mode. A mode may list
//! parent modes (one per line) in `.yas-parents`; their snippets are
//! visible in the child mode too, transitively.
//!
//! Author: Moroya Sakamoto

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use walkdir::WalkDir;

use crate::error::{Error, Result};

/// File listing a mode's parent modes
pub const PARENTS_FILE: &str = ".yas-parents";

/// Mode → directly inherited modes
pub type ModeDeps = BTreeMap<String, BTreeSet<String>>;

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// True for file names that are snippets: no `.`/`#` prefix, no `~` suffix
pub fn is_snippet_file_name(name: &str) -> bool {
    !(name.starts_with('.') || name.starts_with('#') || name.ends_with('~'))
}

/// Mode directories under `root` whose name starts with any of `prefixes`
pub fn match_modes_by_prefix(root: &Path, prefixes: &[String]) -> Result<Vec<String>> {
    let prefixes: Vec<&str> = prefixes
        .iter()
        .map(|p| p.trim_end_matches(['/', MAIN_SEPARATOR]))
        .collect();
    let entries = std::fs::read_dir(root).map_err(|e| Error::io(root, e))?;

    let mut modes = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(root, e))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_hidden(&name) || !entry.path().is_dir() {
            continue;
        }
        if prefixes.iter().any(|p| name.starts_with(*p)) {
            modes.push(name);
        }
    }
    modes.sort();
    Ok(modes)
}

/// Read the parents of every mode reachable from `modes`
pub fn compute_mode_deps(root: &Path, modes: &[String]) -> Result<ModeDeps> {
    let mut deps = ModeDeps::new();
    let mut seen = BTreeSet::new();
    let mut stack: Vec<String> = modes.to_vec();

    while let Some(mode) = stack.pop() {
        if !seen.insert(mode.clone()) {
            continue;
        }
        let parents_path = root.join(&mode).join(PARENTS_FILE);
        if !parents_path.exists() {
            deps.entry(mode).or_default();
            continue;
        }
        let text = std::fs::read_to_string(&parents_path).map_err(|e| Error::io(&parents_path, e))?;
        let parents: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        tracing::debug!(mode = %mode, parents = ?parents, "read mode parents");
        stack.extend(parents.iter().cloned());
        deps.entry(mode).or_default().extend(parents);
    }
    Ok(deps)
}

/// Modes visible from `mode`, itself included
pub fn transitive_modes(deps: &ModeDeps, mode: &str) -> BTreeSet<String> {
    let mut closure = BTreeSet::new();
    let mut stack = vec![mode.to_owned()];
    while let Some(m) = stack.pop() {
        if closure.insert(m.clone()) {
            if let Some(parents) = deps.get(&m) {
                stack.extend(parents.iter().cloned());
            }
        }
    }
    closure
}

/// Union of the transitive modes of every requested mode. Dependent
/// modes are logged per requested mode.
pub fn resolve_modes(deps: &ModeDeps, requested: &[String]) -> BTreeSet<String> {
    let mut all = BTreeSet::new();
    for mode in requested {
        let closure = transitive_modes(deps, mode);
        let dependents: Vec<&str> = closure
            .iter()
            .filter(|m| *m != mode)
            .map(String::as_str)
            .collect();
        if !dependents.is_empty() {
            tracing::info!(mode = %mode, "dependent modes of {}: {}", mode, dependents.join(","));
        }
        all.extend(closure);
    }
    all
}

/// Every snippet file under each mode directory, following symlinks
pub fn snippet_paths<'a>(
    root: &Path,
    modes: impl IntoIterator<Item = &'a String>,
) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for mode in modes {
        let mode_path = root.join(mode);
        for entry in WalkDir::new(&mode_path).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            if is_snippet_file_name(&entry.file_name().to_string_lossy()) {
                paths.push(entry.into_path());
            }
        }
    }
    Ok(paths)
}
