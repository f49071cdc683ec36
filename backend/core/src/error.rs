use thiserror::Error;

/// Generic message shown when an inference failure carries no text of its own.
pub const ANALYZE_FALLBACK_MESSAGE: &str = "Failed to analyze image. Please try again.";

/// Top-level error type for SnakeLens.
///
/// Every variant is recoverable at the page level: the controller turns it
/// into a single banner string via [`SnakeLensError::user_message`].
#[derive(Debug, Error)]
pub enum SnakeLensError {
    #[error("invalid file type: {declared}")]
    InvalidFileType { declared: String },

    #[error("file too large: {size} bytes (limit {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("failed to read image file: {0}")]
    FileReadFailure(String),

    #[error("failed to fetch default image: {0}")]
    DefaultAssetFetchFailure(String),

    #[error("{0}")]
    InferenceFailure(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnakeLensError {
    /// The one string the page shows in its error banner.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidFileType { .. } => "Please upload a valid image file".to_string(),
            Self::FileTooLarge { .. } => "Image size should be less than 20MB".to_string(),
            Self::FileReadFailure(_) => "Failed to read the image file. Please try again.".to_string(),
            Self::DefaultAssetFetchFailure(_) => "Failed to load default image".to_string(),
            Self::InferenceFailure(msg) if msg.trim().is_empty() => {
                ANALYZE_FALLBACK_MESSAGE.to_string()
            }
            Self::InferenceFailure(msg) => msg.clone(),
            Self::Config(msg) => format!("Configuration error: {msg}"),
            Self::Other(err) => err.to_string(),
        }
    }

    /// Wrap any provider error as an inference failure, keeping its text verbatim.
    pub fn inference(err: impl std::fmt::Display) -> Self {
        Self::InferenceFailure(err.to_string())
    }
}

pub type Result<T, E = SnakeLensError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_match_page_copy() {
        let err = SnakeLensError::InvalidFileType { declared: "text/plain".into() };
        assert_eq!(err.user_message(), "Please upload a valid image file");

        let err = SnakeLensError::FileTooLarge { size: 1, limit: 0 };
        assert_eq!(err.user_message(), "Image size should be less than 20MB");

        let err = SnakeLensError::DefaultAssetFetchFailure("404".into());
        assert_eq!(err.user_message(), "Failed to load default image");
    }

    #[test]
    fn inference_failure_is_verbatim() {
        let err = SnakeLensError::inference("Gemini vision error: quota exceeded");
        assert_eq!(err.user_message(), "Gemini vision error: quota exceeded");
    }

    #[test]
    fn empty_inference_failure_falls_back() {
        let err = SnakeLensError::InferenceFailure("  ".into());
        assert_eq!(err.user_message(), ANALYZE_FALLBACK_MESSAGE);
    }
}
