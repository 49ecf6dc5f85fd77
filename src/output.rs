//! Output types: the section tree, extracted elements, and document metadata.
//!
//! Everything here is plain serialisable data. A parse produces one
//! [`ParseOutput`] and never mutates it afterwards; downstream consumers
//! (outline generation, slide assembly) treat it as a read-only snapshot.
//!
//! The section *tree* is stored as a flat `Vec<Section>` in document order.
//! Hierarchy is implicit: a section is a descendant of the nearest preceding
//! section with a strictly smaller `level`. This avoids parent/child pointer
//! management entirely while `path` still records the full ancestor chain for
//! display and matching.

use serde::{Deserialize, Serialize};

/// A figure, table, or equation extracted from the document.
///
/// IDs are 1-based, sequential, and independent per variant — the third
/// image is `image 3` even if ten tables precede it. They are assigned once
/// at extraction time and used everywhere else as stable references.
///
/// Serialises internally tagged, e.g.
/// `{"type": "image", "id": 1, "path": "fig1.png", "caption": "…"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    /// An image link, from `![alt](path "title")` or an `image` content block.
    Image {
        id: u32,
        path: String,
        caption: String,
    },
    /// An HTML `<table>` block or a `table` content block.
    Table {
        id: u32,
        /// Rendered snapshot of the table, when the conversion pipeline
        /// produced one. Absent for tables found directly in Markdown.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        caption: String,
        /// The raw table markup (HTML).
        body: String,
    },
    /// A display equation (`$$ … $$`) or an `equation` content block.
    Equation {
        id: u32,
        text: String,
        /// Source format of `text`, normally `"latex"`.
        format: String,
    },
}

impl Element {
    /// The per-type sequential ID.
    pub fn id(&self) -> u32 {
        match self {
            Element::Image { id, .. } | Element::Table { id, .. } | Element::Equation { id, .. } => {
                *id
            }
        }
    }

    /// The type discriminator as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Element::Image { .. } => "image",
            Element::Table { .. } => "table",
            Element::Equation { .. } => "equation",
        }
    }

    /// Key used in the block-position index: `"image_3"`, `"table_1"`, …
    pub fn position_key(&self) -> String {
        format!("{}_{}", self.kind(), self.id())
    }
}

/// A contiguous, named span of document content.
///
/// `path` is the separator-joined chain of ancestor titles from the document
/// root down to this section, inclusive. For any section, `path` equals the
/// path of the nearest preceding section with a smaller level plus its own
/// title, so the flat list round-trips to a tree without explicit links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Full heading title, including any numeric prefix ("4.2.1 Results").
    pub name: String,
    /// Resolved nesting depth. 0 is reserved for the synthetic root section
    /// emitted when a document has no headings at all.
    pub level: u32,
    /// Ancestor chain joined by the configured separator.
    pub path: String,
    /// Section text without the heading line itself.
    pub content: String,
    /// Words in `content`: CJK characters count individually, everything
    /// else is whitespace-tokenised. See [`crate::pipeline::metadata`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    /// Characters in `content` (not bytes).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct_char_count: Option<usize>,
    /// `direct_char_count` plus the `total_char_count` of every direct child.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_char_count: Option<usize>,
    /// Images attached to this section.
    pub figure_refs: Vec<Element>,
    /// Tables attached to this section.
    pub table_refs: Vec<Element>,
    /// Equations attached to this section.
    pub equation_refs: Vec<Element>,
}

impl Section {
    /// A section with the given title, level, and path, and everything else
    /// empty. Refs and size fields are filled by later pipeline stages.
    pub(crate) fn new(name: String, level: u32, path: String, content: String) -> Self {
        Section {
            name,
            level,
            path,
            content,
            word_count: None,
            direct_char_count: None,
            total_char_count: None,
            figure_refs: Vec::new(),
            table_refs: Vec::new(),
            equation_refs: Vec::new(),
        }
    }
}

/// Document-level counts, recomputed from the finished section list.
///
/// Purely derived — never mutated independently of the sections it was
/// aggregated from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub total_sections: usize,
    pub total_figures: usize,
    pub total_tables: usize,
    pub total_formulas: usize,
    pub total_words: usize,
    /// Number of level-1 sections (top-level chapters).
    pub top_level_sections: usize,
}

/// The complete result of one parse invocation.
///
/// Besides the section tree, the flat element lists are included so callers
/// that need a document-wide inventory (e.g. "analyse every figure") do not
/// have to walk sections and deduplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutput {
    pub sections: Vec<Section>,
    pub figures: Vec<Element>,
    pub tables: Vec<Element>,
    pub equations: Vec<Element>,
    pub metadata: DocumentMetadata,
}
