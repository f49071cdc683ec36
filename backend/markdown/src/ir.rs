//! Analysis Text Block Representation
//!
//! Turns the loosely structured text an LLM returns into display blocks, one
//! line at a time. The five-section template is a convention, never a
//! schema: anything unrecognised becomes a paragraph.

use std::str::Lines;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static SECTION_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.\s*").unwrap());

/// Characters lightweight markup uses for emphasis, headers and code.
const MARKUP_CHARS: [char; 4] = ['*', '_', '#', '`'];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormattedBlock {
    SectionHeader { title: String },
    LabeledField { label: String, value: String },
    BulletItem { text: String },
    Paragraph { text: String },
}

/// Remove markup characters anywhere in the line, then trim.
pub fn clean_line(line: &str) -> String {
    line.chars()
        .filter(|c| !MARKUP_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Classify a single line. Blank lines (after cleaning) yield nothing.
pub fn format_line(line: &str) -> Option<FormattedBlock> {
    let clean = clean_line(line);
    if clean.is_empty() {
        return None;
    }

    if let Some(numbering) = SECTION_NUMBER_RE.find(&clean) {
        return Some(FormattedBlock::SectionHeader {
            title: clean[numbering.end()..].to_string(),
        });
    }

    if let Some(item) = clean.strip_prefix('-') {
        // First colon only; later colons stay in the value.
        return Some(match item.split_once(':') {
            Some((label, value)) => FormattedBlock::LabeledField {
                label: label.trim().to_string(),
                value: value.trim().to_string(),
            },
            None => FormattedBlock::BulletItem {
                text: item.trim().to_string(),
            },
        });
    }

    Some(FormattedBlock::Paragraph { text: clean })
}

/// Lazy block sequence over an analysis text.
///
/// Cloning restarts from the current position; calling [`format_analysis`]
/// again on the same text yields the same blocks.
#[derive(Debug, Clone)]
pub struct FormattedBlocks<'a> {
    lines: Lines<'a>,
}

impl Iterator for FormattedBlocks<'_> {
    type Item = FormattedBlock;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.by_ref().find_map(format_line)
    }
}

/// Format an analysis text into display blocks.
pub fn format_analysis(text: &str) -> FormattedBlocks<'_> {
    FormattedBlocks { lines: text.lines() }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(title: &str) -> FormattedBlock {
        FormattedBlock::SectionHeader { title: title.into() }
    }

    fn field(label: &str, value: &str) -> FormattedBlock {
        FormattedBlock::LabeledField { label: label.into(), value: value.into() }
    }

    #[test]
    fn numbered_line_is_a_section_header() {
        assert_eq!(format_line("1. Species Identification:"), Some(header("Species Identification:")));
        assert_eq!(format_line("12.Safety"), Some(header("Safety")));
    }

    #[test]
    fn markup_is_stripped_before_matching() {
        assert_eq!(
            format_line("## **2. Physical Characteristics:**"),
            Some(header("Physical Characteristics:"))
        );
        assert_eq!(
            format_line("- **Scales**: `smooth`"),
            Some(field("Scales", "smooth"))
        );
    }

    #[test]
    fn label_value_split_at_first_colon_only() {
        assert_eq!(format_line("- Ratio: 3:1 approx"), Some(field("Ratio", "3:1 approx")));
    }

    #[test]
    fn dash_without_colon_is_a_bullet() {
        assert_eq!(
            format_line("-   Never handle wild snakes  "),
            Some(FormattedBlock::BulletItem { text: "Never handle wild snakes".into() })
        );
    }

    #[test]
    fn unmatched_lines_become_paragraphs() {
        assert_eq!(
            format_line("This image shows a snake: probably harmless."),
            Some(FormattedBlock::Paragraph {
                text: "This image shows a snake: probably harmless.".into()
            })
        );
        // Numbers without a period are not headers.
        assert!(matches!(format_line("2024 was a good year"), Some(FormattedBlock::Paragraph { .. })));
    }

    #[test]
    fn blank_and_markup_only_lines_are_dropped() {
        let text = "\n   \n***\n``\n1. Habitat";
        let blocks: Vec<_> = format_analysis(text).collect();
        assert_eq!(blocks, vec![header("Habitat")]);
    }

    #[test]
    fn order_follows_source_lines() {
        let text = "1. Species Identification:\n- Scientific name: Pantherophis guttatus\n- Docile\nLooks calm.";
        let blocks: Vec<_> = format_analysis(text).collect();
        assert_eq!(
            blocks,
            vec![
                header("Species Identification:"),
                field("Scientific name", "Pantherophis guttatus"),
                FormattedBlock::BulletItem { text: "Docile".into() },
                FormattedBlock::Paragraph { text: "Looks calm.".into() },
            ]
        );
    }

    #[test]
    fn formatting_is_repeatable() {
        let text = "5. Safety Information:\r\n- Venomous Status: NON-VENOMOUS\r\n\r\nStay back.";
        let first: Vec<_> = format_analysis(text).collect();
        let second: Vec<_> = format_analysis(text).collect();
        assert_eq!(first, second);

        let blocks = format_analysis(text);
        let restarted: Vec<_> = blocks.clone().collect();
        assert_eq!(restarted, blocks.collect::<Vec<_>>());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(field("Family", "Colubridae")).unwrap();
        assert_eq!(json["kind"], "labeled_field");
        assert_eq!(json["label"], "Family");
    }
}
