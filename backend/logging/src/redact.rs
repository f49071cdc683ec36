//! Log Redaction Layer
//!
//! Scrubs API keys, bearer tokens, and inline image payloads from strings
//! prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9_\-]{20,})|(AIza[0-9A-Za-z_\-]{35})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});
static KEY_PARAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&](?:key|api_key)=)[^&\s)]+").unwrap());
static DATA_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(data:[a-zA-Z0-9.+/\-]+;base64,)[A-Za-z0-9+/=]{16,}").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let mut redacted = API_KEY_RE.replace_all(input, "[REDACTED_TOKEN]").to_string();
    redacted = KEY_PARAM_RE.replace_all(&redacted, "${1}[REDACTED_TOKEN]").to_string();
    redacted = DATA_URL_RE.replace_all(&redacted, "${1}[REDACTED_IMAGE]").to_string();
    redacted
}
