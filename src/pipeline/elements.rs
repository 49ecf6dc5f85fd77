//! Element extraction from raw Markdown (the regex-driven source).
//!
//! This is the fallback path used when no structured content list
//! accompanies the document. Three constructs are recognised:
//!
//! - images via the standard `![alt](path "title")` syntax,
//! - display equations via `$$ … $$` blocks (inline `$…$` math is out of
//!   scope — it is far too noisy to attribute to sections reliably),
//! - tables as literal `<table>…</table>` HTML blocks, the form emitted by
//!   PDF conversion pipelines for anything beyond trivial grids.
//!
//! Table captions are recovered heuristically from the three lines above
//! the table. That is best effort: a caption placed below the table, or
//! phrased without a "Table N" marker, yields an empty string rather than
//! an error.

use crate::output::Element;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// `![alt](target "optional title")`. The target stops at whitespace or a
/// closing paren, so a quoted title parses into its own capture group.
static RE_IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"!\[([^\]]*)\]\(([^\s)]+)(?:\s+"([^"]*)")?\)"#).unwrap());

/// Display equation block. `[^$]` keeps the match from swallowing two
/// adjacent equations into one span.
static RE_EQUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\$\$([^$]+?)\$\$").unwrap());

/// Literal HTML table block, case-insensitive, spanning lines.
static RE_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?si)<table[^>]*>.*?</table>").unwrap());

/// A "Table N" / "Tab. N" / "表N" caption marker.
static RE_TABLE_CAPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Table|Tab\.|表)\s*\d+").unwrap());

/// The typed element lists produced by either extraction source, plus the
/// block-position index when the source can provide one.
///
/// Both the regex path (this module) and the structured path
/// ([`crate::pipeline::blocks`]) produce this same shape, so the assignment
/// stage pairs naturally with whichever source ran.
#[derive(Debug, Clone, Default)]
pub struct ExtractedElements {
    pub figures: Vec<Element>,
    pub tables: Vec<Element>,
    pub equations: Vec<Element>,
    /// `"{type}_{id}"` → index of the element's source block in the content
    /// list. Only the structured path can know this; the regex path leaves
    /// it `None`, which steers assignment to context matching.
    pub positions: Option<HashMap<String, usize>>,
}

/// Extract figures, equations, and tables from raw Markdown text.
///
/// IDs are assigned in match order, 1-based, independently per type.
pub fn extract_from_markdown(content: &str, base_path: Option<&Path>) -> ExtractedElements {
    let figures = extract_figures(content, base_path);
    let equations = extract_equations(content);
    let tables = extract_tables(content);

    debug!(
        figures = figures.len(),
        tables = tables.len(),
        equations = equations.len(),
        "extracted elements from markdown"
    );

    ExtractedElements {
        figures,
        tables,
        equations,
        positions: None,
    }
}

fn extract_figures(content: &str, base_path: Option<&Path>) -> Vec<Element> {
    RE_IMAGE
        .captures_iter(content)
        .enumerate()
        .map(|(i, caps)| {
            let alt = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let target = &caps[2];
            // Quoted title wins; alt text is the fallback caption.
            let caption = caps
                .get(3)
                .map(|m| m.as_str())
                .filter(|t| !t.is_empty())
                .unwrap_or(alt);
            Element::Image {
                id: (i + 1) as u32,
                path: resolve_image_path(target, base_path),
                caption: caption.to_string(),
            }
        })
        .collect()
}

/// Prefer an absolute path when the relative target resolves against
/// `base_path` to an existing file; otherwise keep the original string
/// verbatim. URLs and already-absolute paths are never rewritten.
fn resolve_image_path(target: &str, base_path: Option<&Path>) -> String {
    let is_absolute_or_url = target.starts_with("http://")
        || target.starts_with("https://")
        || target.starts_with('/');

    if let Some(base) = base_path {
        if !is_absolute_or_url {
            let resolved = base.join(target);
            if resolved.exists() {
                return resolved.to_string_lossy().into_owned();
            }
        }
    }
    target.to_string()
}

fn extract_equations(content: &str) -> Vec<Element> {
    RE_EQUATION
        .captures_iter(content)
        .enumerate()
        .map(|(i, caps)| Element::Equation {
            id: (i + 1) as u32,
            text: format!("$$\n{}\n$$", caps[1].trim()),
            format: "latex".to_string(),
        })
        .collect()
}

fn extract_tables(content: &str) -> Vec<Element> {
    RE_TABLE
        .find_iter(content)
        .enumerate()
        .map(|(i, m)| Element::Table {
            id: (i + 1) as u32,
            path: None,
            caption: find_table_caption(content, m.start()),
            body: m.as_str().to_string(),
        })
        .collect()
}

/// Scan up to three lines immediately above the table for a caption line.
fn find_table_caption(content: &str, table_start: usize) -> String {
    let before: Vec<&str> = content[..table_start].split('\n').collect();
    before
        .iter()
        .rev()
        .take(3)
        .find(|line| RE_TABLE_CAPTION.is_match(line))
        .map(|line| line.trim().to_string())
        .unwrap_or_default()
}
