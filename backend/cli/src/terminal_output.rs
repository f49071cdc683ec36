//! Terminal output: page rendering, ANSI helpers, notes.

use clap::ValueEnum;
use markdown::{escape_html, FormattedBlock, Renderer};
use snakelens_page::{UiState, RESULTS_HEADING, SAFETY_DISCLAIMER, SAFETY_DISCLAIMER_TITLE};

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

/// Print a formatted ERROR note to stderr.
pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < KB * KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{:.1} MB", b / (KB * KB))
    }
}

// ---------------------------------------------------------------------------
// Page rendering
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Plain,
    Ansi,
    Html,
}

impl OutputFormat {
    /// ANSI on a color terminal, plain otherwise.
    pub fn detect() -> Self {
        if supports_color() { Self::Ansi } else { Self::Plain }
    }
}

/// Render only the analysis blocks.
pub fn render_blocks(blocks: &[FormattedBlock], format: OutputFormat) -> String {
    match format {
        OutputFormat::Plain => Renderer::to_plain_text(blocks),
        OutputFormat::Ansi => Renderer::to_ansi(blocks),
        OutputFormat::Html => Renderer::to_html(blocks),
    }
}

/// Render the whole page view: image, error banner, results, disclaimer.
pub fn render_page(state: &UiState, format: OutputFormat) -> String {
    let blocks: Vec<FormattedBlock> = state.blocks().collect();
    match format {
        OutputFormat::Html => render_page_html(state, &blocks),
        _ => render_page_text(state, &blocks, format == OutputFormat::Ansi),
    }
}

fn render_page_text(state: &UiState, blocks: &[FormattedBlock], ansi: bool) -> String {
    let (bold, red, green, cyan, reset) = if ansi {
        (BOLD, RED, GREEN, CYAN, RESET)
    } else {
        ("", "", "", "", "")
    };
    let mut out = String::new();

    if let Some(image) = &state.image {
        out.push_str(&format!(
            "{cyan}Image:{reset} {} ({})\n",
            image.mime_type(),
            format_size(image.decoded_len())
        ));
    }
    if state.loading {
        out.push_str("Analyzing...\n");
    }
    if let Some(error) = &state.error {
        out.push_str(&format!("{red}{bold}! {error}{reset}\n"));
    }

    if state.has_analysis() {
        out.push('\n');
        out.push_str(&format!("{green}{bold}{RESULTS_HEADING}{reset}\n\n"));
        out.push_str(&if ansi {
            Renderer::to_ansi(blocks)
        } else {
            Renderer::to_plain_text(blocks)
        });
        out.push('\n');
        out.push_str(&format!("{red}{bold}⚠ {SAFETY_DISCLAIMER_TITLE}{reset}\n"));
        out.push_str(SAFETY_DISCLAIMER);
        out.push('\n');
    }
    out
}

fn render_page_html(state: &UiState, blocks: &[FormattedBlock]) -> String {
    let mut out = String::from("<section class=\"snake-identifier\">\n");

    if let Some(error) = &state.error {
        out.push_str(&format!("<div class=\"error\">{}</div>\n", escape_html(error)));
    }
    if let Some(image) = &state.image {
        out.push_str(&format!(
            "<img src=\"{}\" alt=\"Snake preview\">\n",
            image.data_url()
        ));
    }
    if state.has_analysis() {
        out.push_str(&format!("<h2>{RESULTS_HEADING}</h2>\n"));
        out.push_str("<div class=\"analysis\">\n");
        out.push_str(&Renderer::to_html(blocks));
        out.push_str("</div>\n");
        out.push_str(&format!(
            "<div class=\"disclaimer\"><h3>{}</h3><p>{}</p></div>\n",
            escape_html(SAFETY_DISCLAIMER_TITLE),
            escape_html(SAFETY_DISCLAIMER)
        ));
    }
    out.push_str("</section>\n");
    out
}
