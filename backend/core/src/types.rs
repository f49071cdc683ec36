use std::fmt;

use anyhow::{anyhow, bail, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// One image, carried as its mime type plus standard base64 text.
///
/// The canonical text form is a data URL (`data:<mime>;base64,<payload>`),
/// which works both as a display source and as an inference payload.
/// Fields are private: once built, an encoded image is never edited.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime_type: String,
    data: String,
}

impl EncodedImage {
    /// Encode raw bytes in one pass.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        }
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| anyhow!("not a data URL"))?;
        let (mime_type, data) = rest
            .split_once(";base64,")
            .ok_or_else(|| anyhow!("data URL is not base64 encoded"))?;
        if mime_type.is_empty() {
            bail!("data URL has no media type");
        }
        STANDARD
            .decode(data)
            .map_err(|e| anyhow!("data URL payload is not valid base64: {e}"))?;
        Ok(Self {
            mime_type: mime_type.to_string(),
            data: data.to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload without the data URL prefix.
    pub fn base64(&self) -> &str {
        &self.data
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }

    /// Size of the original bytes, computed from the padded base64 length.
    pub fn decoded_len(&self) -> usize {
        let padding = self.data.bytes().rev().take_while(|b| *b == b'=').count();
        (self.data.len() / 4 * 3).saturating_sub(padding)
    }

    pub fn decode(&self) -> Result<Vec<u8>> {
        Ok(STANDARD.decode(&self.data)?)
    }
}

// Payloads run to megabytes; keep them out of debug output and logs.
impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncodedImage")
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.decoded_len())
            .finish()
    }
}

/// Free text returned by the inference service.
///
/// Loosely follows the five-section educational template; nothing about
/// its structure is guaranteed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisText(String);

impl AnalysisText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for AnalysisText {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for AnalysisText {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for AnalysisText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
