//! `snakelens-config`: SnakeLens configuration management.
//!
//! Provides:
//! - Typed config schema (inference provider, default image, logging)
//! - YAML loading from the config directory
//! - `${ENV_VAR}` substitution
//! - Default value application, including provider API keys from the env
//! - Validation and redaction for safe display

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, apply_all_defaults_with};
pub use env::{collect_referenced_vars, resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_dir, config_file_path, load_config};
pub use redact::redact;
pub use schema::{DefaultImageConfig, InferenceConfig, LoggingConfig, SnakeLensConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load, substitute env vars, apply defaults, and validate a config file.
///
/// Warnings are logged; any validation error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<SnakeLensConfig> {
    let raw = load_config(path).await?;

    let value: Value =
        serde_json::to_value(&raw).context("Failed to serialize config for processing")?;
    let referenced = collect_referenced_vars(&value);
    if !referenced.is_empty() {
        tracing::debug!(vars = ?referenced, "Config references env vars");
    }
    let value = resolve_env_vars(&value).context("Failed to resolve env vars in config")?;
    let config: SnakeLensConfig = serde_json::from_value(value)
        .context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(config);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        let count = report.errors.len();
        let first = report.errors.into_iter().next().map(|e| e.to_string()).unwrap_or_default();
        if count > 1 {
            bail!("{first} (and {} more)", count - 1);
        }
        bail!("{first}");
    }

    Ok(config)
}
