//! The structured content list: block model, decoding, and element loading.
//!
//! PDF conversion services emit, alongside the Markdown, an ordered JSON
//! list of typed blocks — one entry per paragraph, heading, image, table,
//! or equation, in true document order. When that list is available it is a
//! strictly better element source than regex extraction: captions arrive
//! pre-segmented, equation LaTeX is exact, and every element carries its
//! position in the reading order, which enables exact positional assignment
//! instead of textual reference matching.
//!
//! The list is treated as already validated by its producer. Decoding only
//! checks the outer array shape and the per-block `type` discriminator;
//! anything less is a hard error because a dropped block would shift all
//! later indices and silently misassign elements.

use crate::error::ParseError;
use crate::output::Element;
use crate::pipeline::elements::ExtractedElements;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One entry in the externally supplied content list.
///
/// Only `kind` is mandatory. The remaining fields are populated per type by
/// the producing pipeline: `text`/`text_level` for text blocks, `img_path`
/// and caption lists for images and tables, `text`/`text_format` for
/// equations. Unknown block types are carried but ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Block type discriminator: `"text"`, `"image"`, `"table"`, or
    /// `"equation"`. Required.
    #[serde(rename = "type")]
    pub kind: String,

    /// Body text (text and equation blocks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Heading level of a text block. Positive for headings; zero or absent
    /// for body paragraphs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_level: Option<u32>,

    /// Image path (image and table blocks).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_path: Option<String>,

    /// Caption fragments for an image block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image_caption: Vec<String>,

    /// Caption fragments for a table block.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub table_caption: Vec<String>,

    /// Raw table markup (HTML) for a table block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_body: Option<String>,

    /// Source format of equation text. Defaults to `"latex"` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_format: Option<String>,
}

impl ContentBlock {
    /// Whether this text block opens a section (positive heading level).
    pub fn heading_level(&self) -> Option<u32> {
        if self.kind == "text" {
            self.text_level.filter(|&l| l > 0)
        } else {
            None
        }
    }
}

/// Decode a content list from its JSON source.
///
/// # Errors
/// [`ParseError::MalformedContentList`] when the document is not a JSON
/// array or any entry lacks the `type` discriminator. Partial recovery is
/// deliberately not attempted.
pub fn decode_content_list(json: &str) -> Result<Vec<ContentBlock>, ParseError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| ParseError::MalformedContentList {
            detail: e.to_string(),
        })?;

    if !value.is_array() {
        return Err(ParseError::MalformedContentList {
            detail: format!("expected a JSON array, got {}", json_kind(&value)),
        });
    }

    serde_json::from_value(value).map_err(|e| ParseError::MalformedContentList {
        detail: e.to_string(),
    })
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Walk the ordered block list and produce the typed element lists, plus
/// the `"{type}_{id}"` → block-index map needed for positional assignment.
///
/// ID assignment matches the regex path exactly: 1-based, sequential,
/// independent per type, in list order.
pub fn extract_from_blocks(blocks: &[ContentBlock]) -> ExtractedElements {
    let mut figures = Vec::new();
    let mut tables = Vec::new();
    let mut equations = Vec::new();
    let mut positions = HashMap::new();

    for (index, block) in blocks.iter().enumerate() {
        let element = match block.kind.as_str() {
            "image" => Element::Image {
                id: figures.len() as u32 + 1,
                path: block.img_path.clone().unwrap_or_default(),
                caption: block.image_caption.join(" "),
            },
            "table" => Element::Table {
                id: tables.len() as u32 + 1,
                path: block.img_path.clone(),
                caption: block.table_caption.join(" "),
                body: block.table_body.clone().unwrap_or_default(),
            },
            "equation" => Element::Equation {
                id: equations.len() as u32 + 1,
                text: block.text.clone().unwrap_or_default(),
                format: block
                    .text_format
                    .clone()
                    .unwrap_or_else(|| "latex".to_string()),
            },
            _ => continue,
        };

        positions.insert(element.position_key(), index);
        match element.kind() {
            "image" => figures.push(element),
            "table" => tables.push(element),
            _ => equations.push(element),
        }
    }

    debug!(
        figures = figures.len(),
        tables = tables.len(),
        equations = equations.len(),
        "extracted elements from content list"
    );

    ExtractedElements {
        figures,
        tables,
        equations,
        positions: Some(positions),
    }
}
