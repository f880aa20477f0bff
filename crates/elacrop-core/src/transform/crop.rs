//! Center cropping.
//!
//! [`crop_center`] cuts a pixel-sized window around the image center; the
//! rotate-crop pipeline feeds it the inscribed rectangle. Sizes are clamped
//! instead of failing, and never drop below 1x1 pixels.

use super::TransformError;
use crate::decode::{DecodedImage, CHANNELS};

/// Crop a `target_width` x `target_height` window around the image center.
///
/// Targets larger than the image are clamped to the image size, and zero
/// targets are raised to one pixel. The window starts at
/// `(source - target) / 2` on each axis, so cropping an image to its own size
/// returns it unchanged.
///
/// # Errors
///
/// `TransformError::EmptyImage` if the source has no pixels.
pub fn crop_center(
    image: &DecodedImage,
    target_height: u32,
    target_width: u32,
) -> Result<DecodedImage, TransformError> {
    if image.is_empty() {
        return Err(TransformError::EmptyImage);
    }

    let width = target_width.clamp(1, image.width);
    let height = target_height.clamp(1, image.height);
    let left = (image.width - width) / 2;
    let top = (image.height - height) / 2;

    tracing::debug!(left, top, width, height, "center crop");
    Ok(copy_region(image, left, top, width, height))
}

/// Copy a region that is already known to lie inside the image.
fn copy_region(image: &DecodedImage, left: u32, top: u32, width: u32, height: u32) -> DecodedImage {
    let src_stride = image.width as usize * CHANNELS;
    let row_len = width as usize * CHANNELS;
    let mut pixels = Vec::with_capacity(row_len * height as usize);

    for y in top..top + height {
        let start = y as usize * src_stride + left as usize * CHANNELS;
        pixels.extend_from_slice(&image.pixels[start..start + row_len]);
    }

    DecodedImage::new(width, height, pixels)
}
