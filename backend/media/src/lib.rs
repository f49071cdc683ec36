//! Image acquisition: picked files and the bundled default image.

pub mod default_asset;
pub mod image;
pub mod mime_detect;

pub use default_asset::{fetch_default_image, BUNDLED_DEFAULT_SOURCE, BUNDLED_PREFIX};
pub use image::{acquire_file, validate_selection, SelectedFile, MAX_UPLOAD_BYTES};
pub use mime_detect::{
    detect_mime_type, is_accepted_upload_type, is_image, ACCEPTED_UPLOAD_TYPES,
};
