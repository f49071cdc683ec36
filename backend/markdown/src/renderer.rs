//! Renderers for formatted analysis blocks
//!
//! Plain text for logs and pipes, ANSI for terminals, HTML for the page.

use crate::ir::FormattedBlock;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[90m";
const RESET: &str = "\x1b[0m";

pub struct Renderer;

impl Renderer {
    /// Renders blocks to plain text with light indentation.
    pub fn to_plain_text(blocks: &[FormattedBlock]) -> String {
        let mut output = String::new();
        for (i, block) in blocks.iter().enumerate() {
            match block {
                FormattedBlock::SectionHeader { title } => {
                    if i > 0 {
                        output.push('\n');
                    }
                    output.push_str(title);
                    output.push('\n');
                }
                FormattedBlock::LabeledField { label, value } => {
                    output.push_str(&format!("  {label}: {value}\n"));
                }
                FormattedBlock::BulletItem { text } => {
                    output.push_str(&format!("  • {text}\n"));
                }
                FormattedBlock::Paragraph { text } => {
                    output.push_str(text);
                    output.push('\n');
                }
            }
        }
        output
    }

    /// Renders blocks with ANSI styling: bold headers and labels, dim bullets.
    pub fn to_ansi(blocks: &[FormattedBlock]) -> String {
        let mut output = String::new();
        for (i, block) in blocks.iter().enumerate() {
            match block {
                FormattedBlock::SectionHeader { title } => {
                    if i > 0 {
                        output.push('\n');
                    }
                    output.push_str(&format!("{BOLD}{title}{RESET}\n"));
                }
                FormattedBlock::LabeledField { label, value } => {
                    output.push_str(&format!("  {BOLD}{label}:{RESET} {value}\n"));
                }
                FormattedBlock::BulletItem { text } => {
                    output.push_str(&format!("  {DIM}•{RESET} {text}\n"));
                }
                FormattedBlock::Paragraph { text } => {
                    output.push_str(text);
                    output.push('\n');
                }
            }
        }
        output
    }

    /// Renders blocks to an HTML fragment. All text is escaped.
    pub fn to_html(blocks: &[FormattedBlock]) -> String {
        let mut output = String::new();
        for block in blocks {
            let line = match block {
                FormattedBlock::SectionHeader { title } => {
                    format!("<h3 class=\"section\">{}</h3>", escape_html(title))
                }
                FormattedBlock::LabeledField { label, value } => format!(
                    "<div class=\"field\"><span class=\"label\">{}:</span> <span class=\"value\">{}</span></div>",
                    escape_html(label),
                    escape_html(value)
                ),
                FormattedBlock::BulletItem { text } => format!(
                    "<div class=\"bullet\"><span class=\"marker\">•</span> <span>{}</span></div>",
                    escape_html(text)
                ),
                FormattedBlock::Paragraph { text } => format!("<p>{}</p>", escape_html(text)),
            };
            output.push_str(&line);
            output.push('\n');
        }
        output
    }
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
