//! Section tree assembly from headings or content blocks.
//!
//! Sections come out as a flat list in document order; the tree is implicit
//! in the levels. The builder keeps an explicit ancestor stack of
//! `(title, level)` frames: a new heading at level L first closes every open
//! frame at level ≥ L (siblings and anything deeper), then pushes itself,
//! and its `path` is the stack joined top to bottom. Shallower ancestors
//! stay open, which is exactly the prefix invariant downstream consumers
//! rely on.
//!
//! Two driving modes exist, one per element source. The Markdown mode
//! slices heading spans out of the raw text; the block mode walks the
//! structured content list and additionally records each section's opening
//! block index, which the positional assignment strategy needs. Neither
//! mode can fail: a document with no headings degrades to a single root
//! section, never to an error.

use crate::output::Section;
use crate::pipeline::blocks::ContentBlock;
use crate::pipeline::headings::{resolve_level, Heading};
use tracing::debug;

/// Title of the synthetic root section used when a document has no
/// headings, and for body text preceding the first heading block.
pub const ROOT_SECTION_NAME: &str = "Document";

/// Ancestor stack shared by both driving modes.
#[derive(Debug, Default)]
struct PathStack {
    frames: Vec<(String, u32)>,
}

impl PathStack {
    /// Close frames at `level` or deeper, open a frame for the new title,
    /// and return the joined path.
    fn open(&mut self, title: &str, level: u32, separator: &str) -> String {
        while self
            .frames
            .last()
            .is_some_and(|&(_, open_level)| open_level >= level)
        {
            self.frames.pop();
        }
        self.frames.push((title.to_string(), level));
        self.frames
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Build sections from the heading list (Markdown-driven mode).
///
/// Each heading owns the text span `content[start..end]`; the first line
/// (the heading marker itself) is stripped to obtain the section content.
/// With no headings at all, the entire document becomes a single level-0
/// section named [`ROOT_SECTION_NAME`].
pub fn build_from_headings(content: &str, headings: &[Heading], separator: &str) -> Vec<Section> {
    if headings.is_empty() {
        debug!("no headings found, falling back to a single root section");
        return vec![root_section(content.trim().to_string())];
    }

    let mut stack = PathStack::default();
    headings
        .iter()
        .map(|heading| {
            let span = &content[heading.start..heading.end];
            // Drop the heading line; what remains is the section body.
            let body = span
                .split_once('\n')
                .map(|(_, rest)| rest)
                .unwrap_or("")
                .trim()
                .to_string();

            let path = stack.open(&heading.title, heading.level, separator);
            Section::new(heading.title.clone(), heading.level, path, body)
        })
        .collect()
}

/// Build sections from the ordered content-block list (block-driven mode).
///
/// A `text` block with a positive heading level opens a new section; a
/// `text` block without one appends to the current section's content,
/// creating an implicit root section first if necessary. Non-text blocks
/// contribute nothing here — they are attached later by position.
///
/// Returns the sections together with each section's opening block index,
/// which exists only to drive positional assignment and is not part of the
/// output.
pub fn build_from_blocks(blocks: &[ContentBlock], separator: &str) -> (Vec<Section>, Vec<usize>) {
    let mut sections: Vec<Section> = Vec::new();
    let mut start_indices: Vec<usize> = Vec::new();
    let mut stack = PathStack::default();

    for (index, block) in blocks.iter().enumerate() {
        if block.kind != "text" {
            continue;
        }
        let text = block.text.as_deref().unwrap_or("").trim();

        if let Some(block_level) = block.heading_level() {
            // Numeric title prefixes win over the producer's level here
            // too, for the same reason they win over marker depth.
            let level = resolve_level(block_level, text);
            let path = stack.open(text, level, separator);
            sections.push(Section::new(text.to_string(), level, path, String::new()));
            start_indices.push(index);
        } else if !text.is_empty() {
            if sections.is_empty() {
                // Body text before any heading: open an implicit root that
                // also owns every block from the start of the list, so
                // leading figures still bucket somewhere sensible.
                let path = stack.open(ROOT_SECTION_NAME, 0, separator);
                sections.push(Section::new(
                    ROOT_SECTION_NAME.to_string(),
                    0,
                    path,
                    String::new(),
                ));
                start_indices.push(0);
            }
            let section = sections
                .last_mut()
                .expect("a section is always open at this point");
            if !section.content.is_empty() {
                section.content.push_str("\n\n");
            }
            section.content.push_str(text);
        }
    }

    debug!(sections = sections.len(), "built sections from content list");
    (sections, start_indices)
}

fn root_section(content: String) -> Section {
    Section::new(
        ROOT_SECTION_NAME.to_string(),
        0,
        ROOT_SECTION_NAME.to_string(),
        content,
    )
}
