pub mod error;
pub mod traits;
pub mod types;

pub use error::{Result, SnakeLensError, ANALYZE_FALLBACK_MESSAGE};
pub use traits::InferenceProvider;
pub use types::{AnalysisText, EncodedImage};
