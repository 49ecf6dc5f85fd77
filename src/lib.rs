//! # mdsect
//!
//! Extract a hierarchical section tree — with figures, tables, and
//! equations attached to the sections that own them — from Markdown
//! documents produced by PDF/OCR conversion pipelines.
//!
//! ## Why this crate?
//!
//! Converted documents are flat: a stream of text where heading depth
//! reflects *font size*, not logical structure, and where figures, tables,
//! and formulas float free of the sections that discuss them. Downstream
//! consumers (summarisation, slide generation, retrieval) need the
//! opposite: "section 4.2.1, its prose, and exactly the figures it talks
//! about". This crate rebuilds that structure deterministically, with no
//! model calls and no network.
//!
//! ## Pipeline Overview
//!
//! ```text
//! markdown (+ optional content list)
//!  │
//!  ├─ 1. Headings  scan markers, resolve levels from numeric prefixes
//!  ├─ 2. Elements  regex extraction, or typed blocks from the content list
//!  ├─ 3. Sections  ancestor-stack tree assembly with full paths
//!  ├─ 4. Assign    positional bucketing (exact) or context matching (heuristic)
//!  └─ 5. Metadata  word/char counts, per-type totals
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use mdsect::{parse_markdown, ParseConfig};
//!
//! let md = "# 1 Introduction\nAs Figure 1 shows…\n\n![overview](fig1.png)\n";
//! let output = parse_markdown(md, &ParseConfig::default());
//!
//! assert_eq!(output.sections[0].name, "1 Introduction");
//! assert_eq!(output.sections[0].figure_refs.len(), 1);
//! assert_eq!(output.metadata.total_figures, 1);
//! ```
//!
//! ## Two input paths
//!
//! | Input | Section source | Element assignment |
//! |-------|----------------|--------------------|
//! | Markdown only | `#` headings | context matching (textual references) |
//! | Markdown + content list | typed `text` blocks | positional bucketing (exact) |
//!
//! The structured path is strictly preferred when a content list is
//! available: block order is ground truth, whereas textual reference
//! matching misses elements the prose never names.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `mdsect` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! mdsect = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod parse;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ParseConfig, ParseConfigBuilder, DEFAULT_PATH_SEPARATOR};
pub use error::ParseError;
pub use output::{DocumentMetadata, Element, ParseOutput, Section};
pub use parse::{parse_content_list, parse_file, parse_markdown, parse_with_blocks};
pub use pipeline::blocks::ContentBlock;
