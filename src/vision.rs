//! Image helpers for the live call and the cache key.
//!
//! Uses img_hash's re-exported image crate for compatibility.

use std::path::Path;

use base64::Engine;
use img_hash::image::{DynamicImage, ImageOutputFormat};
use thiserror::Error;

const DATA_URL_PREFIX: &str = "data:image/png;base64,";

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Failed to open image {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("Failed to encode image: {0}")]
    Encode(String),
}

/// Decode an image file (PNG or JPEG).
pub fn load_image(path: &Path) -> Result<DynamicImage, VisionError> {
    img_hash::image::open(path).map_err(|e| VisionError::Open {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Encode as PNG and wrap in a base64 `data:` URL.
pub fn png_data_url(image: &DynamicImage) -> Result<String, VisionError> {
    let mut png = Vec::new();
    image
        .write_to(&mut png, ImageOutputFormat::Png)
        .map_err(|e| VisionError::Encode(e.to_string()))?;
    Ok(format!(
        "{DATA_URL_PREFIX}{}",
        base64::engine::general_purpose::STANDARD.encode(&png)
    ))
}

/// Data URL for the provider, or `None` without an image or on failure.
pub fn encode_data_url(image: Option<&DynamicImage>) -> Option<String> {
    let image = image?;
    match png_data_url(image) {
        Ok(url) => Some(url),
        Err(e) => {
            tracing::debug!(error = %e, "Image encoding failed, continuing without image");
            None
        }
    }
}

/// 8x8 mean hash as 16 lowercase hex chars. Empty without an image.
pub fn vision_hash(image: Option<&DynamicImage>) -> String {
    let Some(image) = image else {
        return String::new();
    };
    let hasher = img_hash::HasherConfig::new()
        .hash_alg(img_hash::HashAlg::Mean)
        .hash_size(8, 8)
        .to_hasher();
    hasher
        .hash_image(image)
        .as_bytes()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
