//! Config validation with user-friendly messages.

use crate::defaults::api_key_env_var;
use crate::schema::SnakeLensConfig;
use thiserror::Error;

pub const KNOWN_PROVIDERS: &[&str] = &["gemini", "openai", "mock"];

/// A config validation finding with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError { path: path.into(), message: message.into() });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError { path: path.into(), message: message.into() });
    }
}

/// Validate a config (normally after defaults were applied).
pub fn validate(config: &SnakeLensConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_inference(config, &mut report);
    validate_default_image(config, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_inference(config: &SnakeLensConfig, report: &mut ValidationReport) {
    let provider = config.provider();
    if !KNOWN_PROVIDERS.contains(&provider) {
        report.error(
            "inference.provider",
            format!("Unknown provider '{provider}'. Use 'gemini', 'openai', or 'mock'"),
        );
        return;
    }
    if config.model().trim().is_empty() {
        report.error("inference.model", "Model cannot be empty");
    }
    if config.api_key().is_none() {
        if let Some(var) = api_key_env_var(provider) {
            report.warn(
                "inference.apiKey",
                format!("No API key configured; set {var} or inference.apiKey. Analyses will fail"),
            );
        }
    }
    if let Some(url) = config.base_url() {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("inference.baseUrl", "baseUrl must start with http:// or https://");
        }
    }
}

fn validate_default_image(config: &SnakeLensConfig, report: &mut ValidationReport) {
    if config.default_image_source().trim().is_empty() {
        report.error("defaultImage.source", "Default image source cannot be empty");
    }
}

fn validate_logging(config: &SnakeLensConfig, report: &mut ValidationReport) {
    let level = config.log_level().trim();
    let standard = matches!(
        level.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error" | "off"
    );
    if level.is_empty() {
        report.error("logging.level", "Log level cannot be empty");
    } else if !standard && !level.contains('=') {
        report.warn(
            "logging.level",
            format!("'{level}' is not a standard level; it is passed to the log filter as-is"),
        );
    }
}
