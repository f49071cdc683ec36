//! Page UI State
//!
//! The single state container the controller owns and renderers read.

use markdown::{FormattedBlocks, format_analysis};
use serde::Serialize;
use snakelens_core::{AnalysisText, EncodedImage};

/// Where the page is in its lifecycle. No phase is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePhase {
    Idle,
    LoadingDefault,
    Ready,
    Analyzing,
    Error,
}

impl std::fmt::Display for PagePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::LoadingDefault => "loading_default",
            Self::Ready => "ready",
            Self::Analyzing => "analyzing",
            Self::Error => "error",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub image: Option<EncodedImage>,
    pub analysis: AnalysisText,
    pub loading: bool,
    pub error: Option<String>,
}

impl UiState {
    /// Display blocks for the current analysis.
    pub fn blocks(&self) -> FormattedBlocks<'_> {
        format_analysis(self.analysis.as_str())
    }

    pub fn has_analysis(&self) -> bool {
        !self.analysis.is_empty()
    }
}
