//! Tool configuration
//!
//! Every option of the visualizer, parsed from the command line (and
//! `SNIPPET_VIS_*` environment variables where noted).
//!
//! Author: Moroya Sakamoto

use std::path::PathBuf;

use clap::Parser;

use crate::error::{Error, Result};
use crate::graph::SortMode;
use crate::grouping::GroupingKey;

/// Mode color file looked up under the root when none is given
pub const DEFAULT_MODE_COLORS_FILE: &str = ".mode-colors.json";

/// Output basename when several modes are drawn together
pub const ALL_MODES_BASENAME: &str = "_all-modes";

#[derive(Parser, Debug, Clone)]
#[command(name = "snippet-vis")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Visualize snippet keys as a compressed prefix tree and catch key conflicts")]
pub struct VisConfig {
    // === Input ===
    /// Root directory of the snippets (one subdirectory per major mode)
    #[arg(long, env = "SNIPPET_VIS_ROOT", default_value = ".", value_name = "DIR")]
    pub root_dir: PathBuf,

    /// Do not include dependent modes as per .yas-parents
    #[arg(long)]
    pub no_parents: bool,

    /// Major mode(s); a unique prefix is enough
    #[arg(value_name = "MODE", required = true, num_args = 1..)]
    pub modes: Vec<String>,

    // === Tree ===
    /// Do not compress prefix tree nodes without snippets
    #[arg(long)]
    pub no_compress: bool,

    /// Which siblings to sort in the prefix tree
    #[arg(long, value_enum, default_value_t = SortMode::All)]
    pub sort: SortMode,

    /// Key used for grouping snippets in the prefix tree
    #[arg(short, long, value_enum, default_value_t = GroupingKey::Key)]
    pub key: GroupingKey,

    // === Filters ===
    /// Filter snippets by name (prefix by (?~) to negate)
    #[arg(long, value_name = "REGEX")]
    pub name: Option<String>,

    /// Filter snippets by group (prefix by (?~) to negate)
    #[arg(long, value_name = "REGEX")]
    pub group: Option<String>,

    /// Filter snippets by relative path (prefix by (?~) to negate)
    #[arg(long, value_name = "REGEX")]
    pub path: Option<String>,

    /// Filter snippets by body (prefix by (?~) to negate)
    #[arg(long, value_name = "REGEX")]
    pub body: Option<String>,

    // === Output ===
    /// JSON map of major mode to color (default: <root>/.mode-colors.json)
    #[arg(long, value_name = "FILE")]
    pub mode_colors_file: Option<PathBuf>,

    /// Draw every snippet name in the default color
    #[arg(long)]
    pub no_mode_color: bool,

    /// Output format of the visualizer
    #[arg(long, default_value = "svg", value_name = "FMT")]
    pub dot_format: String,

    /// Interactively preview the image. The viewer command is set via
    /// the YASNIPPET_VIS_PREVIEW environment variable.
    #[arg(short, long, conflicts_with = "check_only")]
    pub preview: bool,

    /// Do not generate any output, just check for conflicts
    #[arg(short, long)]
    pub check_only: bool,

    /// Keep going when conflicts are found
    #[arg(short, long)]
    pub force: bool,

    /// Print the DOT graph to stderr instead of rendering it
    #[arg(long)]
    pub dry_run: bool,

    /// Print the graph description as JSON to stdout instead of DOT
    #[arg(long, conflicts_with_all = ["preview", "dry_run"])]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl VisConfig {
    /// Config for `modes` under `root_dir` with every other option at its default
    pub fn new(root_dir: impl Into<PathBuf>, modes: &[&str]) -> Self {
        Self {
            root_dir: root_dir.into(),
            no_parents: false,
            modes: modes.iter().map(|m| m.to_string()).collect(),
            no_compress: false,
            sort: SortMode::All,
            key: GroupingKey::Key,
            name: None,
            group: None,
            path: None,
            body: None,
            mode_colors_file: None,
            no_mode_color: false,
            dot_format: String::from("svg"),
            preview: false,
            check_only: false,
            force: false,
            dry_run: false,
            json: false,
            verbose: false,
        }
    }

    /// Validate option combinations clap cannot express
    pub fn validate(&self) -> Result<()> {
        if self.modes.is_empty() {
            return Err(Error::Config(String::from("at least one mode is required")));
        }
        if self.preview && self.check_only {
            return Err(Error::Config(String::from(
                "--preview and --check-only are mutually exclusive",
            )));
        }
        if self.dot_format.trim().is_empty() {
            return Err(Error::Config(String::from("--dot-format must not be empty")));
        }
        Ok(())
    }

    /// Filter patterns in `name`, `group`, `path`, `body` order
    pub fn filter_patterns(&self) -> [Option<&str>; 4] {
        [
            self.name.as_deref(),
            self.group.as_deref(),
            self.path.as_deref(),
            self.body.as_deref(),
        ]
    }

    /// Mode color file to read, if any
    pub fn mode_colors_path(&self) -> Option<PathBuf> {
        if self.no_mode_color {
            return None;
        }
        match &self.mode_colors_file {
            Some(path) => Some(path.clone()),
            None => {
                let default = self.root_dir.join(DEFAULT_MODE_COLORS_FILE);
                default.is_file().then_some(default)
            }
        }
    }

    /// Output path without extension for the resolved `modes`
    pub fn out_basename(&self, modes: &[String]) -> PathBuf {
        match modes {
            [single] => self.root_dir.join(single),
            _ => self.root_dir.join(ALL_MODES_BASENAME),
        }
    }
}
