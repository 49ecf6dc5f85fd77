//! Size metrics and document-level aggregation.
//!
//! ## Why two counting schemes in one word count?
//!
//! CJK text has no inter-word spacing, so whitespace tokenisation
//! undercounts it to near zero. The counter therefore counts CJK-range
//! characters individually and whitespace-delimited tokens for everything
//! else, after stripping Markdown punctuation and URLs so syntax does not
//! inflate the numbers. The two counts add up to one figure that is
//! comparable across mixed-language documents.
//!
//! `total_char_count` rolls each section's own character count up through
//! its direct children (level exactly one greater). A single backward pass
//! with a stack suffices: by the time the pass reaches a section, every
//! deeper subtree to its right has already been folded into a child total.

use crate::output::{DocumentMetadata, Element, Section};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

/// Markdown syntax characters stripped before counting.
static RE_MD_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*`_\[\]()!]").unwrap());

/// Bare URLs stripped before counting.
static RE_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").unwrap());

/// CJK Unified Ideographs.
fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

/// Count words: CJK characters individually plus non-CJK whitespace tokens,
/// after stripping Markdown punctuation and URLs.
pub fn count_words(text: &str) -> usize {
    let stripped = RE_MD_PUNCT.replace_all(text, "");
    let stripped = RE_URL.replace_all(&stripped, "");

    let cjk_chars = stripped.chars().filter(|&c| is_cjk(c)).count();
    let non_cjk: String = stripped
        .chars()
        .map(|c| if is_cjk(c) { ' ' } else { c })
        .collect();

    cjk_chars + non_cjk.split_whitespace().count()
}

/// Fill in `word_count`, `direct_char_count`, and `total_char_count` for
/// every section.
///
/// Totals are computed bottom-up in one backward pass: each finished total
/// is pushed on a stack, and a section pops everything deeper than itself,
/// absorbing only the totals of direct children. Subtrees that skip a level
/// (a level-3 child directly under a level-1 parent) are deliberately not
/// absorbed — they have no direct parent in the sequence.
pub fn compute_sizes(sections: &mut [Section]) {
    for section in sections.iter_mut() {
        section.word_count = Some(count_words(&section.content));
        section.direct_char_count = Some(section.content.chars().count());
    }

    let mut stack: Vec<(u32, usize)> = Vec::new();
    for section in sections.iter_mut().rev() {
        let mut total = section.direct_char_count.unwrap_or(0);
        while let Some(&(level, subtotal)) = stack.last() {
            if level <= section.level {
                break;
            }
            stack.pop();
            if level == section.level + 1 {
                total += subtotal;
            }
        }
        section.total_char_count = Some(total);
        stack.push((section.level, total));
    }
}

/// Reduce the finished section list and element lists to document-level
/// counts. Pure derivation; call again whenever the sections change.
pub fn aggregate(
    sections: &[Section],
    figures: &[Element],
    tables: &[Element],
    equations: &[Element],
) -> DocumentMetadata {
    let total_words = sections
        .iter()
        .map(|s| s.word_count.unwrap_or_else(|| count_words(&s.content)))
        .sum();

    let metadata = DocumentMetadata {
        total_sections: sections.len(),
        total_figures: figures.len(),
        total_tables: tables.len(),
        total_formulas: equations.len(),
        total_words,
        top_level_sections: sections.iter().filter(|s| s.level == 1).count(),
    };

    debug!(
        sections = metadata.total_sections,
        words = metadata.total_words,
        "aggregated document metadata"
    );
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(level: u32, content: &str) -> Section {
        Section::new("s".into(), level, "s".into(), content.into())
    }

    #[test]
    fn english_words_counted_by_whitespace() {
        assert_eq!(count_words("three plain words"), 3);
    }

    #[test]
    fn cjk_characters_counted_individually() {
        assert_eq!(count_words("深度学习"), 4);
    }

    #[test]
    fn mixed_text_sums_both_schemes() {
        // 4 CJK characters + 2 English tokens.
        assert_eq!(count_words("深度学习 deep learning"), 6);
    }

    #[test]
    fn markdown_punctuation_ignored() {
        assert_eq!(count_words("**bold** and `code`"), 3);
    }

    #[test]
    fn urls_ignored() {
        assert_eq!(count_words("see https://example.org/paper for details"), 3);
    }

    #[test]
    fn empty_text_counts_zero() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n  "), 0);
    }

    #[test]
    fn leaf_total_equals_direct() {
        let mut sections = vec![section(1, "abcde")];
        compute_sizes(&mut sections);
        assert_eq!(sections[0].direct_char_count, Some(5));
        assert_eq!(sections[0].total_char_count, Some(5));
    }

    #[test]
    fn parent_absorbs_direct_child_total() {
        let parent_body = "x".repeat(10);
        let child_body = "y".repeat(100);
        let mut sections = vec![section(1, &parent_body), section(2, &child_body)];
        compute_sizes(&mut sections);
        assert_eq!(sections[1].total_char_count, Some(100));
        assert_eq!(sections[0].total_char_count, Some(110));
    }

    #[test]
    fn grandchildren_roll_up_through_children() {
        let mut sections = vec![
            section(1, "aaaa"),      // 4
            section(2, "bb"),        // 2 + 1 = 3
            section(3, "c"),         // 1
            section(2, "ddddd"),     // 5
        ];
        compute_sizes(&mut sections);
        assert_eq!(sections[2].total_char_count, Some(1));
        assert_eq!(sections[1].total_char_count, Some(3));
        assert_eq!(sections[3].total_char_count, Some(5));
        assert_eq!(sections[0].total_char_count, Some(4 + 3 + 5));
    }

    #[test]
    fn sibling_subtrees_do_not_leak() {
        let mut sections = vec![
            section(1, "aa"),  // first chapter
            section(2, "bbb"),
            section(1, "c"),   // second chapter, no children
        ];
        compute_sizes(&mut sections);
        assert_eq!(sections[0].total_char_count, Some(5));
        assert_eq!(sections[2].total_char_count, Some(1));
    }

    #[test]
    fn char_counts_are_characters_not_bytes() {
        let mut sections = vec![section(1, "深度学习")];
        compute_sizes(&mut sections);
        assert_eq!(sections[0].direct_char_count, Some(4));
    }

    #[test]
    fn aggregate_counts() {
        let mut sections = vec![
            section(1, "one two"),
            section(2, "three"),
            section(1, "four"),
        ];
        compute_sizes(&mut sections);
        let figure = Element::Image {
            id: 1,
            path: "f.png".into(),
            caption: String::new(),
        };
        let meta = aggregate(&sections, &[figure], &[], &[]);
        assert_eq!(meta.total_sections, 3);
        assert_eq!(meta.top_level_sections, 2);
        assert_eq!(meta.total_figures, 1);
        assert_eq!(meta.total_tables, 0);
        assert_eq!(meta.total_formulas, 0);
        assert_eq!(meta.total_words, 4);
    }

    #[test]
    fn aggregate_without_precomputed_sizes() {
        let sections = vec![section(1, "alpha beta")];
        let meta = aggregate(&sections, &[], &[], &[]);
        assert_eq!(meta.total_words, 2);
    }
}
