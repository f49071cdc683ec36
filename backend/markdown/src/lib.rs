//! Analysis text formatting and renderers
//!
//! Converts free-form analysis text returned by a vision LLM into display
//! blocks, and renders those blocks for terminals and the web.

pub mod ir;
pub mod renderer;

pub use ir::{clean_line, format_analysis, format_line, FormattedBlock, FormattedBlocks};
pub use renderer::{escape_html, Renderer};
