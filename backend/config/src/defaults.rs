//! Config defaults: fills every unset field so the rest of the app never guesses.

use crate::schema::{DefaultImageConfig, InferenceConfig, LoggingConfig, SnakeLensConfig};

pub const DEFAULT_PROVIDER: &str = "gemini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
/// The corn snake photo compiled into the binary.
pub const DEFAULT_IMAGE_SOURCE: &str = "bundled:default-snake.png";
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Env var consulted for a provider's key when the config sets none.
pub fn api_key_env_var(provider: &str) -> Option<&'static str> {
    match provider {
        "gemini" => Some("GEMINI_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        _ => None,
    }
}

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: SnakeLensConfig) -> SnakeLensConfig {
    apply_all_defaults_with(config, |name| std::env::var(name).ok())
}

/// Same as [`apply_all_defaults`], with an explicit env lookup (for tests).
pub fn apply_all_defaults_with(
    config: SnakeLensConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> SnakeLensConfig {
    let config = apply_inference_defaults(config, &lookup);
    let config = apply_default_image_defaults(config);
    apply_logging_defaults(config)
}

fn apply_inference_defaults(
    mut config: SnakeLensConfig,
    lookup: &impl Fn(&str) -> Option<String>,
) -> SnakeLensConfig {
    let inference = config.inference.get_or_insert_with(InferenceConfig::default);
    let provider = inference
        .provider
        .get_or_insert_with(|| DEFAULT_PROVIDER.to_string())
        .clone();

    if inference.model.is_none() {
        let model = if provider == "openai" { DEFAULT_OPENAI_MODEL } else { DEFAULT_GEMINI_MODEL };
        inference.model = Some(model.to_string());
    }

    if inference.api_key.as_deref().map(str::is_empty).unwrap_or(true) {
        inference.api_key = api_key_env_var(&provider)
            .and_then(|var| lookup(var))
            .filter(|key| !key.is_empty());
    }
    config
}

fn apply_default_image_defaults(mut config: SnakeLensConfig) -> SnakeLensConfig {
    let image = config.default_image.get_or_insert_with(DefaultImageConfig::default);
    if image.source.is_none() {
        image.source = Some(DEFAULT_IMAGE_SOURCE.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: SnakeLensConfig) -> SnakeLensConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.dir.is_none() {
        logging.dir = Some(DEFAULT_LOG_DIR.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn fills_every_section() {
        let cfg = apply_all_defaults_with(SnakeLensConfig::default(), no_env);
        let inference = cfg.inference.clone().unwrap();
        assert_eq!(inference.provider.as_deref(), Some("gemini"));
        assert_eq!(inference.model.as_deref(), Some(DEFAULT_GEMINI_MODEL));
        assert_eq!(cfg.default_image.unwrap().source.as_deref(), Some(DEFAULT_IMAGE_SOURCE));
        assert_eq!(cfg.logging.unwrap().dir.as_deref(), Some("logs"));
    }

    #[test]
    fn openai_gets_its_own_model() {
        let cfg = SnakeLensConfig {
            inference: Some(InferenceConfig {
                provider: Some("openai".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = apply_all_defaults_with(cfg, no_env);
        assert_eq!(cfg.model(), DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn api_key_falls_back_to_provider_env_var() {
        let cfg = apply_all_defaults_with(SnakeLensConfig::default(), |name| {
            (name == "GEMINI_API_KEY").then(|| "from-env".to_string())
        });
        assert_eq!(cfg.api_key(), Some("from-env"));
    }

    #[test]
    fn does_not_override_user_set_values() {
        let cfg = SnakeLensConfig {
            inference: Some(InferenceConfig {
                api_key: Some("from-file".into()),
                model: Some("gemini-1.5-pro".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let cfg = apply_all_defaults_with(cfg, |_| Some("from-env".into()));
        assert_eq!(cfg.api_key(), Some("from-file"));
        assert_eq!(cfg.model(), "gemini-1.5-pro");
    }
}
