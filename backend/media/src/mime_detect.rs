//! MIME type detection for picked and bundled files.
//!
//! A file picker reports a declared media type; on disk we only have the
//! extension, so that is what the declared type is derived from.

use std::path::Path;

/// Media types the upload control advertises.
pub const ACCEPTED_UPLOAD_TYPES: &[&str] = &["image/jpeg", "image/png", "image/jpg"];

/// Detect MIME type by file extension.
pub fn detect_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png"          => "image/png",
        "gif"          => "image/gif",
        "webp"         => "image/webp",
        "svg"          => "image/svg+xml",
        "avif"         => "image/avif",
        "bmp"          => "image/bmp",
        "heic"         => "image/heic",
        "tiff" | "tif" => "image/tiff",

        // Common things people pick by mistake
        "pdf"          => "application/pdf",
        "txt"          => "text/plain",
        "md"           => "text/markdown",
        "json"         => "application/json",
        "mp4"          => "video/mp4",

        _              => "application/octet-stream",
    }
}

/// Whether a MIME type is for an image.
pub fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Whether a MIME type is one the upload control lists.
pub fn is_accepted_upload_type(mime: &str) -> bool {
    ACCEPTED_UPLOAD_TYPES.contains(&mime)
}
