//! Element-to-section assignment.
//!
//! Two strategies, one per element source:
//!
//! - **Positional bucketing** (structured path): an element belongs to the
//!   section whose opening-block index range `[start, next_start)` contains
//!   the element's source block index. Exact, reflects true reading order,
//!   attaches each element to at most one section. Strictly preferred
//!   whenever the content list is available.
//!
//! - **Context matching** (Markdown path): a section gets an element only
//!   when its prose *names* it — "Figure 2", "Tab. 3", "表1" — or, for
//!   equations, reproduces a normalized snippet of its LaTeX body. Purely
//!   textual, so an element the prose never mentions is attached nowhere,
//!   and one mentioned in several sections is attached to each.
//!
//! The figure/table patterns scan the whole section content and do not
//! distinguish a genuine "Table 2" reference from the same digits inside an
//! unrelated numeral context. Known imprecision of the matching heuristic;
//! accepted rather than papered over, since any "fix" changes matching
//! behaviour unpredictably.

use crate::output::{Element, Section};
use crate::pipeline::elements::ExtractedElements;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

/// "Figure 2" / "Fig. 2" / "图2", capturing the referenced number.
static RE_FIGURE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Figure|Fig\.|图)\s*(\d+)\b").unwrap());

/// "Table 2" / "Tab. 2" / "表2", capturing the referenced number.
static RE_TABLE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:Table|Tab\.|表)\s*(\d+)\b").unwrap());

/// Length of the normalized equation snippet used for substring matching.
const EQUATION_SNIPPET_CHARS: usize = 30;

/// Attach elements to sections by searching each section's content for a
/// textual reference. Deterministic: identical input always produces
/// identical attachment sets.
pub fn assign_by_context(sections: &mut [Section], elements: &ExtractedElements) {
    let snippets: Vec<(u32, String)> = elements
        .equations
        .iter()
        .filter_map(|eq| {
            let snippet = equation_snippet(eq);
            (!snippet.is_empty()).then(|| (eq.id(), snippet))
        })
        .collect();

    for section in sections.iter_mut() {
        let figure_ids = referenced_ids(&RE_FIGURE_REF, &section.content);
        let table_ids = referenced_ids(&RE_TABLE_REF, &section.content);

        section.figure_refs = elements
            .figures
            .iter()
            .filter(|f| figure_ids.contains(&f.id()))
            .cloned()
            .collect();
        section.table_refs = elements
            .tables
            .iter()
            .filter(|t| table_ids.contains(&t.id()))
            .cloned()
            .collect();
        section.equation_refs = elements
            .equations
            .iter()
            .filter(|eq| {
                snippets
                    .iter()
                    .any(|(id, snippet)| *id == eq.id() && section.content.contains(snippet.as_str()))
            })
            .cloned()
            .collect();
    }

    let attached: usize = sections
        .iter()
        .map(|s| s.figure_refs.len() + s.table_refs.len() + s.equation_refs.len())
        .sum();
    debug!(attached, "assigned elements by context matching");
}

/// Every element ID mentioned by a reference pattern in `content`.
fn referenced_ids(pattern: &Regex, content: &str) -> HashSet<u32> {
    pattern
        .captures_iter(content)
        .filter_map(|caps| caps[1].parse().ok())
        .collect()
}

/// First [`EQUATION_SNIPPET_CHARS`] characters of the equation body with
/// `$$` delimiters stripped and newlines flattened.
fn equation_snippet(equation: &Element) -> String {
    let Element::Equation { text, .. } = equation else {
        return String::new();
    };
    text.replace("$$", "")
        .replace('\n', " ")
        .trim()
        .chars()
        .take(EQUATION_SNIPPET_CHARS)
        .collect()
}

/// Attach elements to sections by block position.
///
/// `start_indices[i]` is the opening block index of `sections[i]`, in
/// ascending document order. An element whose source block index falls in
/// `[start_indices[i], start_indices[i + 1])` belongs to section `i`; the
/// last section's range extends to the end of the list. Elements placed
/// before the first section's opening block are attached nowhere.
pub fn assign_by_position(
    sections: &mut [Section],
    start_indices: &[usize],
    elements: &ExtractedElements,
) {
    debug_assert_eq!(sections.len(), start_indices.len());
    let Some(positions) = &elements.positions else {
        // Without a position index there is nothing exact to do; the
        // caller should have routed to context matching instead.
        debug!("no position index available, skipping positional assignment");
        return;
    };

    let all = elements
        .figures
        .iter()
        .chain(&elements.tables)
        .chain(&elements.equations);

    for element in all {
        let Some(&block_index) = positions.get(&element.position_key()) else {
            continue;
        };
        let Some(section_index) = bucket_for(start_indices, block_index) else {
            continue;
        };
        let section = &mut sections[section_index];
        match element {
            Element::Image { .. } => section.figure_refs.push(element.clone()),
            Element::Table { .. } => section.table_refs.push(element.clone()),
            Element::Equation { .. } => section.equation_refs.push(element.clone()),
        }
    }

    let attached: usize = sections
        .iter()
        .map(|s| s.figure_refs.len() + s.table_refs.len() + s.equation_refs.len())
        .sum();
    debug!(attached, "assigned elements by position");
}

/// Index of the section owning `block_index`, by half-open range over the
/// ascending opening indices. `None` when the block precedes every section.
fn bucket_for(start_indices: &[usize], block_index: usize) -> Option<usize> {
    let following = start_indices.partition_point(|&start| start <= block_index);
    following.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Section;
    use std::collections::HashMap;

    fn section(name: &str, content: &str) -> Section {
        Section::new(name.into(), 1, name.into(), content.into())
    }

    fn image(id: u32) -> Element {
        Element::Image {
            id,
            path: format!("fig{id}.png"),
            caption: String::new(),
        }
    }

    fn equation(id: u32, text: &str) -> Element {
        Element::Equation {
            id,
            text: text.into(),
            format: "latex".into(),
        }
    }

    fn with_positions(
        figures: Vec<Element>,
        equations: Vec<Element>,
        entries: &[(&str, usize)],
    ) -> ExtractedElements {
        ExtractedElements {
            figures,
            tables: Vec::new(),
            equations,
            positions: Some(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), *v))
                    .collect::<HashMap<_, _>>(),
            ),
        }
    }

    #[test]
    fn figure_reference_attaches_image() {
        let mut sections = vec![
            section("Results", "...as shown in Figure 2, the accuracy improves."),
            section("Discussion", "No visual references here."),
        ];
        let elements = ExtractedElements {
            figures: vec![image(2), image(3)],
            ..Default::default()
        };
        assign_by_context(&mut sections, &elements);
        assert_eq!(sections[0].figure_refs, vec![image(2)]);
        assert!(sections[1].figure_refs.is_empty());
    }

    #[test]
    fn unreferenced_image_attached_nowhere() {
        let mut sections = vec![section("A", "Figure 1 is here."), section("B", "prose")];
        let elements = ExtractedElements {
            figures: vec![image(1), image(3)],
            ..Default::default()
        };
        assign_by_context(&mut sections, &elements);
        let total: usize = sections.iter().map(|s| s.figure_refs.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn figure_id_requires_exact_number() {
        // "Figure 23" must not count as a reference to figure 2.
        let mut sections = vec![section("A", "See Figure 23 for details.")];
        let elements = ExtractedElements {
            figures: vec![image(2)],
            ..Default::default()
        };
        assign_by_context(&mut sections, &elements);
        assert!(sections[0].figure_refs.is_empty());
    }

    #[test]
    fn chinese_reference_forms_match() {
        let mut sections = vec![section("实验", "结果见图 4 以及表2。")];
        let elements = ExtractedElements {
            figures: vec![image(4)],
            tables: vec![Element::Table {
                id: 2,
                path: None,
                caption: String::new(),
                body: String::new(),
            }],
            ..Default::default()
        };
        assign_by_context(&mut sections, &elements);
        assert_eq!(sections[0].figure_refs.len(), 1);
        assert_eq!(sections[0].table_refs.len(), 1);
    }

    #[test]
    fn equation_matched_by_snippet() {
        let eq = equation(1, "$$\n\\alpha + \\beta = \\gamma\n$$");
        let mut sections = vec![
            section("Theory", "We derive \\alpha + \\beta = \\gamma from first principles."),
            section("Unrelated", "nothing here"),
        ];
        let elements = ExtractedElements {
            equations: vec![eq.clone()],
            ..Default::default()
        };
        assign_by_context(&mut sections, &elements);
        assert_eq!(sections[0].equation_refs, vec![eq]);
        assert!(sections[1].equation_refs.is_empty());
    }

    #[test]
    fn empty_equation_body_never_matches() {
        let mut sections = vec![section("A", "any content")];
        let elements = ExtractedElements {
            equations: vec![equation(1, "$$\n\n$$")],
            ..Default::default()
        };
        assign_by_context(&mut sections, &elements);
        assert!(sections[0].equation_refs.is_empty());
    }

    #[test]
    fn context_matching_is_idempotent() {
        let build = || vec![section("R", "Figure 1 and Figure 1 again")];
        let elements = ExtractedElements {
            figures: vec![image(1)],
            ..Default::default()
        };
        let mut first = build();
        let mut second = build();
        assign_by_context(&mut first, &elements);
        assign_by_context(&mut second, &elements);
        assert_eq!(first, second);
        assert_eq!(first[0].figure_refs.len(), 1);
    }

    #[test]
    fn positional_bucketing_exact() {
        // [text(level=1,"A"), image(1), text(level=1,"B")]
        let mut sections = vec![section("A", ""), section("B", "")];
        let elements = with_positions(vec![image(1)], Vec::new(), &[("image_1", 1)]);
        assign_by_position(&mut sections, &[0, 2], &elements);
        assert_eq!(sections[0].figure_refs, vec![image(1)]);
        assert!(sections[1].figure_refs.is_empty());
    }

    #[test]
    fn element_before_first_section_unassigned() {
        let mut sections = vec![section("A", "")];
        let elements = with_positions(vec![image(1)], Vec::new(), &[("image_1", 0)]);
        assign_by_position(&mut sections, &[1], &elements);
        assert!(sections[0].figure_refs.is_empty());
    }

    #[test]
    fn last_section_owns_tail_of_list() {
        let mut sections = vec![section("A", ""), section("B", "")];
        let elements = with_positions(
            vec![image(1)],
            vec![equation(1, "$$x$$")],
            &[("image_1", 5), ("equation_1", 99)],
        );
        assign_by_position(&mut sections, &[0, 3], &elements);
        assert!(sections[0].figure_refs.is_empty());
        assert_eq!(sections[1].figure_refs.len(), 1);
        assert_eq!(sections[1].equation_refs.len(), 1);
    }

    #[test]
    fn bucket_boundaries_are_half_open() {
        assert_eq!(bucket_for(&[0, 3, 7], 0), Some(0));
        assert_eq!(bucket_for(&[0, 3, 7], 2), Some(0));
        assert_eq!(bucket_for(&[0, 3, 7], 3), Some(1));
        assert_eq!(bucket_for(&[0, 3, 7], 7), Some(2));
        assert_eq!(bucket_for(&[2, 5], 1), None);
    }
}
