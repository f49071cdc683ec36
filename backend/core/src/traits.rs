use anyhow::Result;
use async_trait::async_trait;

use crate::types::{AnalysisText, EncodedImage};

/// Trait for multimodal inference services.
///
/// One call is one request: implementations do not retry and do not cache.
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// Send the image and instruction prompt, returning the generated text.
    async fn analyze(&self, image: &EncodedImage, prompt: &str) -> Result<AnalysisText>;
}
