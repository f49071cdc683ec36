//! Vision understanding: describe an image using a multimodal LLM.
//!
//! One request per call. No retry, no cache, no client-side timeout policy.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use snakelens_core::{AnalysisText, EncodedImage, InferenceProvider};
use tracing::{debug, info};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";

/// Supported vision providers.
#[derive(Clone)]
pub enum VisionProvider {
    OpenAi { api_key: String, model: String, base_url: String },
    Gemini { api_key: String, model: String, base_url: String },
}

impl VisionProvider {
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::OpenAi {
            api_key: api_key.into(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, new_model: impl Into<String>) -> Self {
        match &mut self {
            Self::OpenAi { model, .. } | Self::Gemini { model, .. } => *model = new_model.into(),
        }
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        match &mut self {
            Self::OpenAi { base_url, .. } | Self::Gemini { base_url, .. } => {
                *base_url = url.into().trim_end_matches('/').to_string()
            }
        }
        self
    }

    pub fn model(&self) -> &str {
        match self {
            Self::OpenAi { model, .. } | Self::Gemini { model, .. } => model,
        }
    }
}

#[async_trait]
impl InferenceProvider for VisionProvider {
    fn name(&self) -> &str {
        match self {
            Self::OpenAi { .. } => "openai",
            Self::Gemini { .. } => "gemini",
        }
    }

    async fn analyze(&self, image: &EncodedImage, prompt: &str) -> Result<AnalysisText> {
        let text = match self {
            Self::OpenAi { api_key, model, base_url } => {
                describe_via_openai(base_url, api_key, model, image, prompt).await?
            }
            Self::Gemini { api_key, model, base_url } => {
                describe_via_gemini(base_url, api_key, model, image, prompt).await?
            }
        };
        if text.trim().is_empty() {
            bail!("{} returned no text for this image", self.name());
        }
        Ok(AnalysisText::new(text))
    }
}

#[derive(Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Deserialize)]
struct OpenAiMessage {
    #[serde(default)]
    content: Option<String>,
}

async fn describe_via_openai(
    base_url: &str, api_key: &str, model: &str, image: &EncodedImage, prompt: &str,
) -> Result<String> {
    info!("[Vision] Describing image via OpenAI {}", model);
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "model": model,
        "messages": [{
            "role": "user",
            "content": [
                { "type": "text", "text": prompt },
                { "type": "image_url", "image_url": { "url": image.data_url() } }
            ]
        }],
        "max_tokens": 1024
    });
    let resp = client
        .post(format!("{base_url}/chat/completions"))
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .context("OpenAI vision request failed")?;
    let status = resp.status();
    if !status.is_success() {
        bail!("OpenAI vision error ({}): {}", status, resp.text().await.unwrap_or_default());
    }
    let parsed: OpenAiResponse = resp
        .json()
        .await
        .context("Failed to parse OpenAI vision response")?;
    debug!(choices = parsed.choices.len(), "OpenAI vision response received");
    Ok(parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

async fn describe_via_gemini(
    base_url: &str, api_key: &str, model: &str, image: &EncodedImage, prompt: &str,
) -> Result<String> {
    info!("[Vision] Describing image via Gemini {}", model);
    let client = reqwest::Client::new();
    let body = serde_json::json!({
        "contents": [{ "parts": [
            { "text": prompt },
            { "inlineData": { "mimeType": image.mime_type(), "data": image.base64() } }
        ]}]
    });
    // Key goes in a header so it never shows up in a URL inside an error message.
    let resp = client
        .post(format!("{base_url}/models/{model}:generateContent"))
        .header("x-goog-api-key", api_key)
        .json(&body)
        .send()
        .await
        .context("Gemini vision request failed")?;
    let status = resp.status();
    if !status.is_success() {
        bail!("Gemini vision error ({}): {}", status, resp.text().await.unwrap_or_default());
    }
    let parsed: GeminiResponse = resp
        .json()
        .await
        .context("Failed to parse Gemini vision response")?;
    debug!(candidates = parsed.candidates.len(), "Gemini vision response received");
    let text = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    Ok(text)
}
