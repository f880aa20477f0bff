//! Reading and writing image files.

use std::path::Path;

use anyhow::{Context, Result};
use elacrop_core::{decode_image, encode_png, DecodedImage};

/// Read and decode an image file, honoring EXIF orientation.
pub fn load_image(path: &Path) -> Result<DecodedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read: {}", path.display()))?;
    let image =
        decode_image(&bytes).with_context(|| format!("Failed to decode: {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        width = image.width,
        height = image.height,
        "loaded image"
    );
    Ok(image)
}

/// Encode `image` as PNG and write it to `path`.
pub fn save_png(path: &Path, image: &DecodedImage) -> Result<()> {
    let bytes = encode_png(image).with_context(|| format!("Failed to encode: {}", path.display()))?;
    write_bytes(path, &bytes)
}

pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to save: {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}
