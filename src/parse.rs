//! Parse entry points.
//!
//! Four doors into the same pipeline, from most to least raw:
//!
//! - [`parse_markdown`] — raw text only; elements come from regex
//!   extraction and attach to sections by textual reference. Infallible.
//! - [`parse_with_blocks`] — raw text plus an already-decoded content
//!   list; elements come from the blocks and attach by position. Infallible.
//! - [`parse_content_list`] — raw text plus the content list as a JSON
//!   string; fails only when the JSON is malformed.
//! - [`parse_file`] — reads the Markdown file (and an explicit or
//!   auto-discovered sibling `*content_list.json`) from disk.
//!
//! An empty content list behaves exactly like an absent one: the parse
//! falls back to the Markdown path, so both routes agree on degenerate
//! input.

use crate::config::ParseConfig;
use crate::error::ParseError;
use crate::output::ParseOutput;
use crate::pipeline::blocks::{self, ContentBlock};
use crate::pipeline::{assign, elements, headings, metadata, sections};
use std::path::Path;
use tracing::{debug, info, warn};

/// Parse raw Markdown text into a section tree (Markdown-driven mode).
///
/// Elements are located by regex and attached to the sections whose prose
/// references them. A document with no headings yields a single level-0
/// "Document" section; this is a valid result, not an error.
pub fn parse_markdown(content: &str, config: &ParseConfig) -> ParseOutput {
    debug!(chars = content.len(), "parsing markdown source");

    // ── Step 1: Scan headings, resolve levels ────────────────────────────
    let headings = headings::scan_headings(content);

    // ── Step 2: Extract elements from the raw text ───────────────────────
    let extracted = elements::extract_from_markdown(content, config.base_path.as_deref());

    // ── Step 3: Build the section sequence ───────────────────────────────
    let mut section_list =
        sections::build_from_headings(content, &headings, &config.path_separator);

    // ── Step 4: Attach elements by textual reference ─────────────────────
    assign::assign_by_context(&mut section_list, &extracted);

    finish(section_list, extracted, config)
}

/// Parse raw Markdown text alongside its decoded content list
/// (block-driven mode).
///
/// The blocks drive section construction, and elements attach to sections
/// by exact block position — strictly preferred over textual matching
/// whenever the list is available. An empty list falls back to
/// [`parse_markdown`] on the same text.
pub fn parse_with_blocks(
    content: &str,
    content_blocks: &[ContentBlock],
    config: &ParseConfig,
) -> ParseOutput {
    if content_blocks.is_empty() {
        debug!("content list empty, using markdown source");
        return parse_markdown(content, config);
    }
    info!(blocks = content_blocks.len(), "parsing structured source");

    // ── Step 1: Load elements and their block positions ──────────────────
    let extracted = blocks::extract_from_blocks(content_blocks);

    // ── Step 2: Build sections from the block sequence ───────────────────
    let (mut section_list, start_indices) =
        sections::build_from_blocks(content_blocks, &config.path_separator);

    // ── Step 3: Attach elements by position ──────────────────────────────
    assign::assign_by_position(&mut section_list, &start_indices, &extracted);

    finish(section_list, extracted, config)
}

/// Parse raw Markdown text alongside its content list JSON.
///
/// # Errors
/// [`ParseError::MalformedContentList`] when the JSON is not an array of
/// blocks each carrying a `type` field. No partial recovery is attempted.
pub fn parse_content_list(
    content: &str,
    content_list_json: &str,
    config: &ParseConfig,
) -> Result<ParseOutput, ParseError> {
    let content_blocks = blocks::decode_content_list(content_list_json)?;
    Ok(parse_with_blocks(content, &content_blocks, config))
}

/// Parse a Markdown file from disk.
///
/// When `content_list_path` is `None`, a sibling file named
/// `*content_list.json` is auto-discovered next to the Markdown file — the
/// layout conversion pipelines produce. A configured `base_path` wins;
/// otherwise relative image links resolve against the Markdown file's
/// directory.
///
/// # Errors
/// - [`ParseError::FileNotFound`] / [`ParseError::ReadFailed`] for the
///   Markdown file itself.
/// - [`ParseError::MalformedContentList`] when a content list was found
///   but does not decode. A *missing* explicit content list only logs a
///   warning and degrades to the Markdown path.
pub fn parse_file(
    md_path: impl AsRef<Path>,
    content_list_path: Option<&Path>,
    config: &ParseConfig,
) -> Result<ParseOutput, ParseError> {
    let md_path = md_path.as_ref();
    if !md_path.exists() {
        return Err(ParseError::FileNotFound {
            path: md_path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(md_path).map_err(|source| ParseError::ReadFailed {
        path: md_path.to_path_buf(),
        source,
    })?;
    info!(path = %md_path.display(), "parsing markdown file");

    // Relative image links resolve against the file's own directory unless
    // the caller configured something else.
    let mut effective = config.clone();
    if effective.base_path.is_none() {
        effective.base_path = md_path.parent().map(Path::to_path_buf);
    }

    let json_path = match content_list_path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => {
            warn!(path = %p.display(), "content list not found, using markdown source");
            None
        }
        None => discover_content_list(md_path),
    };

    match json_path {
        Some(p) => {
            let json = std::fs::read_to_string(&p).map_err(|source| ParseError::ReadFailed {
                path: p.clone(),
                source,
            })?;
            debug!(path = %p.display(), "using discovered content list");
            parse_content_list(&content, &json, &effective)
        }
        None => Ok(parse_markdown(&content, &effective)),
    }
}

/// Find a sibling `*content_list.json` next to the Markdown file.
fn discover_content_list(md_path: &Path) -> Option<std::path::PathBuf> {
    let dir = md_path.parent()?;
    let mut candidates: Vec<_> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with("content_list.json"))
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Shared tail of both modes: size metrics, aggregation, assembly.
fn finish(
    mut section_list: Vec<crate::output::Section>,
    extracted: elements::ExtractedElements,
    config: &ParseConfig,
) -> ParseOutput {
    if config.include_sizes {
        metadata::compute_sizes(&mut section_list);
    }
    let doc_metadata = metadata::aggregate(
        &section_list,
        &extracted.figures,
        &extracted.tables,
        &extracted.equations,
    );

    info!(
        sections = doc_metadata.total_sections,
        figures = doc_metadata.total_figures,
        tables = doc_metadata.total_tables,
        formulas = doc_metadata.total_formulas,
        "parse complete"
    );

    ParseOutput {
        sections: section_list,
        figures: extracted.figures,
        tables: extracted.tables,
        equations: extracted.equations,
        metadata: doc_metadata,
    }
}
