use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use snakelens_config::{config_dir, config_file_path, SnakeLensConfig};
use snakelens_core::InferenceProvider;
use snakelens_page::DEFAULT_ANALYSIS;
use snakelens_understanding::{MockVision, VisionProvider};
use tracing::info;

/// Config file to use: the `--config` flag, else the config directory's file.
pub fn resolve_config_path(flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .unwrap_or_else(|| config_file_path(&config_dir()))
}

/// Build the inference provider the config asks for.
///
/// `offline` swaps in a mock that answers with the canned corn snake text.
pub fn build_provider(config: &SnakeLensConfig, offline: bool) -> Result<Box<dyn InferenceProvider>> {
    let name = config.provider();
    if offline || name == "mock" {
        info!("Using offline mock provider");
        return Ok(Box::new(MockVision::new("mock").with_response(DEFAULT_ANALYSIS)));
    }

    let api_key = config.api_key().ok_or_else(|| {
        anyhow!("No API key configured for provider '{name}'. Set inference.apiKey or the provider's env var")
    })?;
    let provider = match name {
        "openai" => VisionProvider::openai(api_key),
        _ => VisionProvider::gemini(api_key),
    }
    .with_model(config.model());
    let provider = match config.base_url() {
        Some(url) => provider.with_base_url(url),
        None => provider,
    };
    info!(provider = name, model = provider.model(), "Using vision provider");
    Ok(Box::new(provider))
}
