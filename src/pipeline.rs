//! End-to-end run
//!
//! Resolve modes, discover and parse snippet files, filter, index into
//! one prefix tree per grouping key, compress, check `name` conflicts,
//! then emit and render the graph for the chosen key.
//!
//! Author: Moroya Sakamoto

use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::VisConfig;
use crate::conflict::{find_conflicts, ConflictReport};
use crate::dot::{self, DotRenderer};
use crate::error::{Error, Result};
use crate::filter::SnippetFilter;
use crate::graph::{emit_graph, GraphDescription};
use crate::grouping::{GroupingKey, SnippetIndex};
use crate::modes::{compute_mode_deps, match_modes_by_prefix, resolve_modes, snippet_paths};
use crate::parse::load_snippet;

/// What a run did
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Mode directories matched by the requested prefixes
    pub modes: Vec<String>,
    /// Matched modes plus their (transitive) parents
    pub resolved_modes: BTreeSet<String>,
    /// Snippet files found under the resolved modes
    pub discovered: usize,
    /// Snippets that passed the filters
    pub indexed: usize,
    /// `name` conflicts; `None` when the check was skipped
    pub conflicts: Option<ConflictReport>,
    /// Emitted graph; `None` with `--check-only`
    pub graph: Option<GraphDescription>,
    /// Rendered image left on disk (not previewed)
    pub image: Option<PathBuf>,
}

/// Build the snippet index for `config`, returning it with the partially
/// filled outcome.
fn build_index(config: &VisConfig) -> Result<(SnippetIndex, Outcome)> {
    let root = config.root_dir.as_path();
    let modes = match_modes_by_prefix(root, &config.modes)?;
    if modes.is_empty() {
        return Err(Error::NoMatchingModes(config.modes.clone()));
    }
    tracing::debug!(modes = ?modes, "matched modes");

    let mut deps = compute_mode_deps(root, &modes)?;
    if config.no_parents {
        deps.values_mut().for_each(BTreeSet::clear);
    }
    let resolved_modes = resolve_modes(&deps, &modes);

    let filter = SnippetFilter::from_patterns(config.filter_patterns())?;
    let keep_body = filter.needs_body();

    let paths = snippet_paths(root, &resolved_modes)?;
    let mut index = SnippetIndex::new();
    let mut indexed = 0;
    for path in &paths {
        let snippet = load_snippet(root, path, keep_body)?;
        if !filter.matches(&snippet) {
            continue;
        }
        index.insert(&snippet);
        indexed += 1;
    }
    tracing::info!(discovered = paths.len(), indexed, "indexed snippets");

    if !config.no_compress {
        index = index.compress();
    }

    let outcome = Outcome {
        modes,
        resolved_modes,
        discovered: paths.len(),
        indexed,
        conflicts: None,
        graph: None,
        image: None,
    };
    Ok((index, outcome))
}

/// Run the whole visualizer for `config`
pub fn run(config: &VisConfig) -> Result<Outcome> {
    config.validate()?;
    let (index, mut outcome) = build_index(config)?;

    // Several modes may legitimately share names
    if outcome.modes.len() > 1 {
        tracing::info!("more than one mode requested, skipping conflict check");
    } else {
        let field = GroupingKey::Name.as_str();
        let report = find_conflicts(index.trie(GroupingKey::Name), field);
        report.log();
        let count = report.conflicts.len();
        outcome.conflicts = Some(report);
        if count > 0 {
            if !config.force {
                return Err(Error::Conflicts(count));
            }
            tracing::warn!(count, "continuing despite conflicts");
        }
    }

    if config.check_only {
        return Ok(outcome);
    }

    let graph = emit_graph(index.trie(config.key), config.key.as_str(), config.sort);
    if config.json {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &graph).map_err(Error::Serialize)?;
        writeln!(out).map_err(|e| Error::io("<stdout>", e))?;
    } else {
        outcome.image = render(config, &outcome.modes, &graph)?;
    }
    outcome.graph = Some(graph);
    Ok(outcome)
}

fn renderer(config: &VisConfig) -> Result<DotRenderer> {
    match config.mode_colors_path() {
        Some(path) => Ok(DotRenderer::with_mode_colors(DotRenderer::load_mode_colors(
            &path,
        )?)),
        None => Ok(DotRenderer::new()),
    }
}

/// Render `graph`: to stderr on dry runs, else through `dot` into
/// `<root>/<mode>.<format>`. Returns the image path if it was kept.
fn render(config: &VisConfig, modes: &[String], graph: &GraphDescription) -> Result<Option<PathBuf>> {
    let renderer = renderer(config)?;
    if config.dry_run {
        let stderr = std::io::stderr();
        let mut out = stderr.lock();
        renderer
            .render(graph, &mut out)
            .map_err(|e| Error::io("<stderr>", e))?;
        return Ok(None);
    }

    let base = config.out_basename(modes);
    let dot_path = with_suffix(&base, "dot");
    let img_path = with_suffix(&base, &config.dot_format);

    let rendered = write_dot(&renderer, graph, &dot_path)
        .and_then(|()| dot::rasterize(&dot_path, &img_path, &config.dot_format));
    remove_quietly(&dot_path);
    rendered?;

    if config.preview {
        let previewed = dot::preview(&img_path);
        remove_quietly(&img_path);
        previewed?;
        return Ok(None);
    }
    Ok(Some(img_path))
}

fn write_dot(renderer: &DotRenderer, graph: &GraphDescription, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path).map_err(|e| Error::io(path, e))?;
    let mut out = std::io::BufWriter::new(file);
    renderer
        .render(graph, &mut out)
        .and_then(|()| out.flush())
        .map_err(|e| Error::io(path, e))
}

/// `base` + `.` + `suffix`, keeping any dots already in the file name
fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = base.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        tracing::debug!(path = %path.display(), error = %e, "could not remove");
    }
}
