use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;
use snakelens_core::{AnalysisText, EncodedImage, InferenceProvider};

/// A mock vision provider that returns a canned analysis or a canned failure.
pub struct MockVision {
    name: String,
    outcome: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl MockVision {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outcome: Ok("Mock analysis".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.outcome = Ok(response.into());
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.outcome = Err(message.into());
        self
    }

    /// How many times `analyze` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceProvider for MockVision {
    fn name(&self) -> &str {
        &self.name
    }

    async fn analyze(&self, _image: &EncodedImage, _prompt: &str) -> Result<AnalysisText> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(text) => Ok(AnalysisText::new(text.clone())),
            Err(message) => bail!("{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_images_are_not_cached() {
        let mock = MockVision::new("mock").with_response("1. Species Identification:");
        let image = EncodedImage::from_bytes("image/png", b"same bytes");

        mock.analyze(&image, "p").await.unwrap();
        mock.analyze(&image, "p").await.unwrap();
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn failing_mock_reports_message() {
        let mock = MockVision::new("mock").failing("service unavailable");
        let image = EncodedImage::from_bytes("image/png", b"x");
        let err = mock.analyze(&image, "p").await.unwrap_err();
        assert_eq!(err.to_string(), "service unavailable");
    }
}
