//! Config file location and loading.

use crate::schema::SnakeLensConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the SnakeLens config directory.
/// Priority: `SNAKELENS_CONFIG_DIR` env > `~/.snakelens/` > `./.snakelens/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SNAKELENS_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .map(|home| home.join(".snakelens"))
        .unwrap_or_else(|| PathBuf::from(".snakelens"))
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist.
pub async fn load_config(path: &Path) -> Result<SnakeLensConfig> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(SnakeLensConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file parses as YAML null.
    if raw.trim().is_empty() {
        return Ok(SnakeLensConfig::default());
    }

    let config: SnakeLensConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}
