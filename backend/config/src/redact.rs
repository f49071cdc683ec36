//! Config redaction: a copy of the config that is safe to print or log.

use serde_json::Value;

/// Keys whose string values are secrets.
const SENSITIVE_KEYS: &[&str] = &["apiKey", "api_key", "token", "secret", "password"];

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Replace every sensitive string with a short hint (`AIza***`).
pub fn redact(value: &Value) -> Value {
    redact_under(value, "")
}

fn redact_under(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            let hint: String = s.chars().take(4).collect();
            if s.chars().count() > 8 {
                Value::String(format!("{hint}***"))
            } else {
                Value::String("***".to_string())
            }
        }
        Value::Array(items) => Value::Array(items.iter().map(|v| redact_under(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_under(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_api_key_with_hint() {
        let v = json!({"inference": {"provider": "gemini", "apiKey": "AIzaSyVerySecretValue"}});
        let out = redact(&v);
        assert_eq!(out["inference"]["apiKey"], "AIza***");
        assert_eq!(out["inference"]["provider"], "gemini");
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        let out = redact(&json!({"apiKey": "abc"}));
        assert_eq!(out["apiKey"], "***");
    }
}
