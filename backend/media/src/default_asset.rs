//! Bundled default image, fetched once when the page mounts.
//!
//! Sources starting with `bundled:` name an image compiled into the binary,
//! `data:` sources are inline images, `http://` or `https://` sources are
//! fetched with a single GET, and anything else is read from the local
//! filesystem.

use std::path::Path;

use snakelens_core::{EncodedImage, Result, SnakeLensError};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::mime_detect::{detect_mime_type, is_image};

/// Prefix for images compiled into the binary.
pub const BUNDLED_PREFIX: &str = "bundled:";

/// Source of the corn snake photo shipped with SnakeLens.
pub const BUNDLED_DEFAULT_SOURCE: &str = "bundled:default-snake.png";

static DEFAULT_SNAKE_PNG: &[u8] =
    include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/default-snake.png"));

fn bundled_asset(name: &str) -> Option<&'static [u8]> {
    match name {
        "default-snake.png" => Some(DEFAULT_SNAKE_PNG),
        _ => None,
    }
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn fetch_failure(source: &str, reason: impl std::fmt::Display) -> SnakeLensError {
    warn!(source = %source, reason = %reason, "Default image fetch failed");
    SnakeLensError::DefaultAssetFetchFailure(format!("{source}: {reason}"))
}

/// Fetch and encode the default image.
pub async fn fetch_default_image(source: &str) -> Result<EncodedImage> {
    debug!(source = %source, "Fetching default image");
    if source.starts_with("data:") {
        let image = EncodedImage::from_data_url(source).map_err(|e| fetch_failure("data URL", e))?;
        if !is_image(image.mime_type()) {
            return Err(fetch_failure("data URL", format!("not an image ({})", image.mime_type())));
        }
        return Ok(image);
    }

    let (bytes, header_mime) = if let Some(name) = source.strip_prefix(BUNDLED_PREFIX) {
        let bytes = bundled_asset(name)
            .ok_or_else(|| fetch_failure(source, "no such bundled image"))?;
        (bytes.to_vec(), None)
    } else if is_remote(source) {
        fetch_remote(source).await?
    } else {
        let bytes = fs::read(source)
            .await
            .map_err(|e| fetch_failure(source, e))?;
        (bytes, None)
    };

    let mime = match header_mime {
        Some(mime) if is_image(&mime) => mime,
        _ => {
            let path_part = source.split(['?', '#']).next().unwrap_or(source);
            detect_mime_type(Path::new(path_part)).to_string()
        }
    };
    if !is_image(&mime) {
        return Err(fetch_failure(source, format!("not an image ({mime})")));
    }

    info!(source = %source, mime = %mime, bytes = bytes.len(), "Loaded default image");
    Ok(EncodedImage::from_bytes(mime, &bytes))
}

async fn fetch_remote(url: &str) -> Result<(Vec<u8>, Option<String>)> {
    let resp = reqwest::get(url).await.map_err(|e| fetch_failure(url, e))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(fetch_failure(url, format!("HTTP {status}")));
    }
    let mime = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string());
    let bytes = resp.bytes().await.map_err(|e| fetch_failure(url, e))?;
    Ok((bytes.to_vec(), mime))
}
