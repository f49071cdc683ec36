//! SnakeLens configuration schema.
//!
//! Every field is optional in the file; [`crate::defaults`] fills the gaps.

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_GEMINI_MODEL, DEFAULT_IMAGE_SOURCE, DEFAULT_LOG_DIR, DEFAULT_LOG_LEVEL,
    DEFAULT_OPENAI_MODEL, DEFAULT_PROVIDER,
};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnakeLensConfig {
    /// Which vision service analyses uploads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference: Option<InferenceConfig>,

    /// Bundled image shown on first load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_image: Option<DefaultImageConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceConfig {
    /// "gemini" | "openai" | "mock"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Override for self-hosted gateways.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultImageConfig {
    /// `bundled:<name>`, a data URL, a local path or an http(s) URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl SnakeLensConfig {
    pub fn provider(&self) -> &str {
        self.inference
            .as_ref()
            .and_then(|i| i.provider.as_deref())
            .unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.inference
            .as_ref()
            .and_then(|i| i.api_key.as_deref())
            .filter(|k| !k.is_empty())
    }

    pub fn model(&self) -> &str {
        self.inference
            .as_ref()
            .and_then(|i| i.model.as_deref())
            .unwrap_or(match self.provider() {
                "openai" => DEFAULT_OPENAI_MODEL,
                _ => DEFAULT_GEMINI_MODEL,
            })
    }

    pub fn base_url(&self) -> Option<&str> {
        self.inference.as_ref().and_then(|i| i.base_url.as_deref())
    }

    pub fn default_image_source(&self) -> &str {
        self.default_image
            .as_ref()
            .and_then(|d| d.source.as_deref())
            .unwrap_or(DEFAULT_IMAGE_SOURCE)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.dir.as_deref())
            .unwrap_or(DEFAULT_LOG_DIR)
    }
}
