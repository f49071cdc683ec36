pub mod mock;
pub mod prompt;
pub mod vision;

pub use mock::MockVision;
pub use prompt::SNAKE_ANALYSIS_PROMPT;
pub use vision::{DEFAULT_GEMINI_MODEL, DEFAULT_OPENAI_MODEL, VisionProvider};
