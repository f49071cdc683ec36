//! Page controller for SnakeLens.
//!
//! Owns the one [`UiState`] of the page and moves it through
//! `Idle -> LoadingDefault -> Ready <-> Analyzing`, with `Error` as a
//! transient flag that the next good upload clears.

pub mod controller;
pub mod default_content;
pub mod state;

pub use controller::{AnalysisTicket, Completion, PageController};
pub use default_content::{DEFAULT_ANALYSIS, RESULTS_HEADING, SAFETY_DISCLAIMER, SAFETY_DISCLAIMER_TITLE};
pub use state::{PagePhase, UiState};
