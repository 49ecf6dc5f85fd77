//! Heading scanning and nesting-level resolution.
//!
//! ## Why override the marker depth?
//!
//! PDF-to-Markdown conversion pipelines pick `#` depth from visual font
//! size, which routinely disagrees with the logical structure: a paper may
//! render "4.2.1 Results" as `##` because the subsubsection font happens to
//! match the section font. When the title carries a dotted-decimal prefix,
//! the prefix is the ground truth — "4.2.1" is a depth-3 heading no matter
//! how many `#` markers precede it. Headings without a numeric prefix keep
//! their marker depth unchanged.
//!
//! Resolution looks at one heading at a time and consults no other state,
//! so it is trivially deterministic and order-independent.

use once_cell::sync::Lazy;
use regex::Regex;

/// ATX heading: 1–6 markers, whitespace, title, at the start of a line.
static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6})\s+(.+)$").unwrap());

/// Dotted-decimal numeral prefix: "4", "4.2", "4.2.1", optionally with a
/// trailing dot before the title text.
static RE_NUMBER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+(?:\.\d+)*)\.?\s+(.*)$").unwrap());

/// One heading found in the raw text.
///
/// `start..end` is the exclusive byte span owned by this heading: from the
/// heading marker up to the next heading (or end of document). Transient —
/// consumed by the section builder, never part of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Resolved nesting level (numeric prefix wins over marker depth).
    pub level: u32,
    /// Raw `#` marker count, kept for diagnostics.
    pub marker_level: u32,
    /// Full title including any numeric prefix.
    pub title: String,
    /// Byte offset of the heading marker in the source text.
    pub start: usize,
    /// Byte offset where the next heading begins (or text length).
    pub end: usize,
}

/// Scan raw text for headings, in document order, with resolved levels and
/// span boundaries. Returns an empty list when the document has no headings;
/// the caller is responsible for the single-root-section fallback.
pub fn scan_headings(content: &str) -> Vec<Heading> {
    let mut headings: Vec<Heading> = RE_HEADING
        .captures_iter(content)
        .map(|caps| {
            let marker_level = caps[1].len() as u32;
            let title = caps[2].trim().to_string();
            let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
            Heading {
                level: resolve_level(marker_level, &title),
                marker_level,
                title,
                start,
                end: content.len(),
            }
        })
        .collect();

    // Each heading owns the span up to the next heading's start.
    for i in 0..headings.len().saturating_sub(1) {
        let next_start = headings[i + 1].start;
        headings[i].end = next_start;
    }

    headings
}

/// Resolve a heading's nesting level from its marker depth and title.
///
/// A leading dotted-decimal numeral overrides the marker depth: the level is
/// the number of dot-separated components ("4.2.1" → 3). Without a numeric
/// prefix the marker depth is used unchanged.
pub fn resolve_level(marker_level: u32, title: &str) -> u32 {
    match RE_NUMBER_PREFIX.captures(title) {
        Some(caps) => caps[1].split('.').count() as u32,
        None => marker_level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_prefix_overrides_marker_depth() {
        assert_eq!(resolve_level(2, "4.2.1 Results"), 3);
        assert_eq!(resolve_level(1, "4.2.1 Results"), 3);
        assert_eq!(resolve_level(4, "2 Related Work"), 1);
    }

    #[test]
    fn trailing_dot_tolerated() {
        assert_eq!(resolve_level(1, "4.2. Results and Analysis"), 2);
    }

    #[test]
    fn no_prefix_keeps_marker_depth() {
        assert_eq!(resolve_level(2, "Introduction"), 2);
        assert_eq!(resolve_level(3, "Abstract"), 3);
    }

    #[test]
    fn bare_number_without_title_is_not_a_prefix() {
        // "42" alone has no following title text, so the marker depth stands.
        assert_eq!(resolve_level(2, "42"), 2);
    }

    #[test]
    fn scan_finds_headings_with_spans() {
        let text = "# One\nalpha\n## Two\nbeta\n";
        let hs = scan_headings(text);
        assert_eq!(hs.len(), 2);
        assert_eq!(hs[0].title, "One");
        assert_eq!(hs[0].level, 1);
        assert_eq!(hs[0].start, 0);
        assert_eq!(hs[0].end, hs[1].start);
        assert_eq!(hs[1].end, text.len());
        assert_eq!(&text[hs[0].start..hs[0].end], "# One\nalpha\n");
    }

    #[test]
    fn scan_ignores_mid_line_hashes() {
        let text = "not a # heading\nstill not ## one\n";
        assert!(scan_headings(text).is_empty());
    }

    #[test]
    fn scan_resolves_numeric_levels() {
        let text = "## 4 Experiments\n## 4.2 Results\n## 4.2.1 CIFAR-10\n";
        let levels: Vec<u32> = scan_headings(text).iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 2, 3]);
    }

    #[test]
    fn seven_hashes_is_not_a_heading() {
        // The marker run caps at six; a seventh hash makes the line body text.
        let hs = scan_headings("####### Too deep\n");
        assert!(hs.is_empty());
    }

    #[test]
    fn no_headings_yields_empty_list() {
        assert!(scan_headings("Just plain text with no headings at all.").is_empty());
    }
}
