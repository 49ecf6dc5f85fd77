//! Error types for the mdsect library.
//!
//! The parser core itself is infallible by design: no headings, zero
//! elements, empty sections, and unresolvable image paths are all valid,
//! representable results. [`ParseError`] therefore covers only the input
//! boundary — reading files and decoding the structured content list — plus
//! configuration validation.
//!
//! A malformed content list is deliberately a hard failure rather than a
//! partial recovery: silently dropping blocks would shift every later block
//! index and corrupt positional element assignment.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the mdsect library.
#[derive(Debug, Error)]
pub enum ParseError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The Markdown file was not found at the given path.
    #[error("Markdown file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Structured-input errors ───────────────────────────────────────────
    /// The content list is not a JSON array, or a block is missing its
    /// `type` discriminator.
    #[error("Malformed content list: {detail}\nExpected a JSON array of blocks, each with a \"type\" field.")]
    MalformedContentList { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
