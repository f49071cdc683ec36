//! Image acquisition from a user-picked file.
//!
//! Validates the declared type and size, reads the whole file, and encodes it
//! into a single [`EncodedImage`]. No streaming, no chunking.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use snakelens_core::{EncodedImage, Result, SnakeLensError};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::mime_detect::{detect_mime_type, is_accepted_upload_type, is_image};

/// Upload ceiling: 20 MiB. A file of exactly this size is accepted.
pub const MAX_UPLOAD_BYTES: u64 = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
enum FileContent {
    Path(PathBuf),
    Memory(Bytes),
}

/// A file as handed over by the picker: name, declared type, size, content.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub declared_type: String,
    pub size: u64,
    content: FileContent,
}

impl SelectedFile {
    /// Describe a file on disk. The declared type comes from its extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).await.map_err(|e| {
            SnakeLensError::FileReadFailure(format!("{}: {e}", path.display()))
        })?;
        if !metadata.is_file() {
            return Err(SnakeLensError::FileReadFailure(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            declared_type: detect_mime_type(path).to_string(),
            size: metadata.len(),
            content: FileContent::Path(path.to_path_buf()),
        })
    }

    /// Describe a file whose bytes are already in memory.
    pub fn from_bytes(
        name: impl Into<String>,
        declared_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            size: bytes.len() as u64,
            content: FileContent::Memory(bytes),
        }
    }

    /// Read the full content.
    pub async fn read(&self) -> Result<Bytes> {
        match &self.content {
            FileContent::Memory(bytes) => Ok(bytes.clone()),
            FileContent::Path(path) => fs::read(path).await.map(Bytes::from).map_err(|e| {
                SnakeLensError::FileReadFailure(format!("{}: {e}", path.display()))
            }),
        }
    }
}

/// Check declared type, then size. Nothing is read.
pub fn validate_selection(file: &SelectedFile) -> Result<()> {
    if !is_image(&file.declared_type) {
        warn!(file = %file.name, declared = %file.declared_type, "Rejected non-image upload");
        return Err(SnakeLensError::InvalidFileType {
            declared: file.declared_type.clone(),
        });
    }
    check_size(&file.name, file.size)
}

fn check_size(name: &str, size: u64) -> Result<()> {
    if size > MAX_UPLOAD_BYTES {
        warn!(file = %name, size, limit = MAX_UPLOAD_BYTES, "Rejected oversized upload");
        return Err(SnakeLensError::FileTooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(())
}

/// Validate, read, and encode a picked file.
pub async fn acquire_file(file: &SelectedFile) -> Result<EncodedImage> {
    validate_selection(file)?;
    if !is_accepted_upload_type(&file.declared_type) {
        warn!(
            file = %file.name,
            declared = %file.declared_type,
            "Image type is not one the picker advertises; the model may not support it"
        );
    }

    let bytes = file.read().await?;
    // The file may have grown between the metadata call and the read.
    check_size(&file.name, bytes.len() as u64)?;

    debug!(file = %file.name, bytes = bytes.len(), "Encoding picked image");
    let image = EncodedImage::from_bytes(file.declared_type.clone(), &bytes);
    info!(file = %file.name, mime = %image.mime_type(), bytes = bytes.len(), "Acquired image");
    Ok(image)
}
