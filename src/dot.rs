//! Graphviz DOT renderer
//!
//! Serializes a [`GraphDescription`] to DOT, laid out left to right.
//! Snippet nodes get an HTML table label (one row per snippet, name
//! coloured by major mode); snippet-free nodes render as points. Root
//! edges start at invisible anchors so they leave from a clean port.
//!
//! Author: Moroya Sakamoto

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{Error, Result};
use crate::graph::{EdgeKind, GraphDescription, GraphNode};

/// Color for modes missing from the color map
pub const DEFAULT_MODE_COLOR: &str = "black";

/// Environment variable overriding the preview command
pub const PREVIEW_ENV: &str = "YASNIPPET_VIS_PREVIEW";

/// Preview command used when [`PREVIEW_ENV`] is unset
pub const DEFAULT_PREVIEW_COMMAND: &str = "xdg-open";

/// Escape text for HTML-like labels
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Attribute value: HTML-like (`<...>`) or quoted string
enum Attr<'a> {
    Html(String),
    Text(&'a str),
}

fn write_attrs(out: &mut impl Write, attrs: &[(&str, Attr<'_>)]) -> io::Result<()> {
    write!(out, "[ ")?;
    for (i, (name, value)) in attrs.iter().enumerate() {
        if i > 0 {
            write!(out, ",")?;
        }
        match value {
            Attr::Html(html) => write!(out, "{name}=<{html}>")?,
            Attr::Text(text) => write!(out, "{name}=\"{text}\"")?,
        }
    }
    write!(out, " ]")
}

/// DOT renderer with a major-mode color map
#[derive(Debug, Clone, Default)]
pub struct DotRenderer {
    mode_colors: HashMap<String, String>,
}

impl DotRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode_colors(mode_colors: HashMap<String, String>) -> Self {
        Self { mode_colors }
    }

    /// Load a `{ "<mode>": "<color>" }` JSON map
    pub fn load_mode_colors(path: &Path) -> Result<HashMap<String, String>> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&text).map_err(Error::ModeColors)
    }

    fn color_of(&self, mode: Option<&str>) -> &str {
        mode.and_then(|m| self.mode_colors.get(m))
            .map(String::as_str)
            .unwrap_or(DEFAULT_MODE_COLOR)
    }

    /// Write `graph` as a DOT digraph
    pub fn render(&self, graph: &GraphDescription, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "digraph {{\nrankdir=LR")?;
        write!(out, "node ")?;
        write_attrs(out, &[("shape", Attr::Text("box"))])?;
        writeln!(out)?;
        write!(out, "edge ")?;
        write_attrs(out, &[("fontname", Attr::Text("courier"))])?;
        writeln!(out)?;

        for node in &graph.nodes {
            self.render_node(node, out)?;
        }
        for anchor in &graph.anchors {
            write!(out, "{anchor} ")?;
            write_attrs(out, &[("style", Attr::Text("invisible"))])?;
            writeln!(out)?;
        }
        for edge in &graph.edges {
            let label = escape_html(edge.label.as_deref().unwrap_or(""));
            match edge.kind {
                EdgeKind::Order => {
                    write!(out, "{} -> {} ", edge.tail, edge.head)?;
                    write_attrs(
                        out,
                        &[("style", Attr::Text("invisible")), ("dir", Attr::Text("none"))],
                    )?;
                }
                EdgeKind::Anchored => {
                    write!(out, "{}:e -> {}:w ", edge.tail, edge.head)?;
                    write_attrs(
                        out,
                        &[("label", Attr::Html(label.clone())), ("tooltip", Attr::Html(label))],
                    )?;
                }
                EdgeKind::Link => {
                    write!(out, "{} -> {} ", edge.tail, edge.head)?;
                    write_attrs(
                        out,
                        &[("label", Attr::Html(label.clone())), ("tooltip", Attr::Html(label))],
                    )?;
                }
            }
            writeln!(out)?;
        }
        for group in &graph.rank_groups {
            writeln!(out, "{{ rank=same {} }}", group.join(" "))?;
        }
        writeln!(out, "}}")
    }

    fn render_node(&self, node: &GraphNode, out: &mut impl Write) -> io::Result<()> {
        let mut attrs = vec![
            ("style", Attr::Text("invisible")),
            ("tooltip", Attr::Html(escape_html(&node.key))),
        ];
        if node.snippets.is_empty() {
            attrs.push(("shape", Attr::Text("point")));
        }
        attrs.push(("label", Attr::Html(self.table_label(node))));
        write!(out, "{} ", node.id)?;
        write_attrs(out, &attrs)?;
        writeln!(out)
    }

    fn table_label(&self, node: &GraphNode) -> String {
        if node.snippets.is_empty() {
            return String::new();
        }
        let mut label = String::from(r#"<TABLE BORDER="0" CELLBORDER="1" CELLSPACING="0">"#);
        for snippet in &node.snippets {
            label.push_str(&format!(
                r#"<TR><TD HREF="{}"><FONT COLOR="{}">{}</FONT>"#,
                escape_html(&snippet.rel_path),
                self.color_of(snippet.major_mode.as_deref()),
                escape_html(&snippet.name),
            ));
            for extra in &snippet.extras {
                label.push_str(&format!(
                    r#"<BR/><FONT POINT-SIZE="10" COLOR="gray">{}</FONT>"#,
                    escape_html(extra)
                ));
            }
            label.push_str("</TD></TR>");
        }
        label.push_str("</TABLE>");
        label
    }

    /// Render to a `String`
    pub fn render_to_string(&self, graph: &GraphDescription) -> String {
        let mut buf = Vec::new();
        // Writing to a Vec cannot fail
        let _ = self.render(graph, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

/// Run `dot -T<format> -o <img_path>` with `dot_path` on stdin
pub fn rasterize(dot_path: &Path, img_path: &Path, format: &str) -> Result<()> {
    let input = std::fs::File::open(dot_path).map_err(|e| Error::io(dot_path, e))?;
    let status = Command::new("dot")
        .arg(format!("-T{format}"))
        .arg("-o")
        .arg(img_path)
        .stdin(Stdio::from(input))
        .status()
        .map_err(|source| Error::Spawn {
            command: String::from("dot"),
            source,
        })?;
    if !status.success() {
        return Err(Error::Render { status });
    }
    tracing::info!(image = %img_path.display(), "rendered graph");
    Ok(())
}

/// Open `img_path` with the preview command (see [`PREVIEW_ENV`])
pub fn preview(img_path: &Path) -> Result<()> {
    let command = std::env::var(PREVIEW_ENV).unwrap_or_else(|_| String::from(DEFAULT_PREVIEW_COMMAND));
    let mut words = command.split_whitespace();
    let program = words.next().unwrap_or(DEFAULT_PREVIEW_COMMAND);
    let status = Command::new(program)
        .args(words)
        .arg(img_path)
        .status()
        .map_err(|source| Error::Spawn {
            command: command.clone(),
            source,
        })?;
    if !status.success() {
        return Err(Error::Preview { status });
    }
    Ok(())
}
