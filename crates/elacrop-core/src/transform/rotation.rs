//! Rotation onto an expanded canvas.
//!
//! The forward transform is built the way OpenCV users usually do it: a
//! rotation matrix about the image center, widened to homogeneous form,
//! followed by a translation that recenters the result on a canvas large
//! enough for all four rotated corners. The warp then walks the destination
//! and samples the source through the inverse matrix.
//!
//! # Coordinates
//!
//! Pixel `(x, y)` is sampled at its center. The pivot is the middle of the
//! pixel grid, `((w - 1) / 2, (h - 1) / 2)`, so quarter turns move every
//! pixel onto another pixel and lose nothing.

use super::affine::AffineTransform;
use crate::decode::{DecodedImage, CHANNELS};

/// Interpolation filter for warp operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InterpolationFilter {
    /// Nearest source pixel, no blending.
    Nearest,
    /// Weighted blend of the four surrounding pixels.
    #[default]
    Bilinear,
}

/// Canvas size needed to hold a rotated image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotatedBounds {
    pub width: u32,
    pub height: u32,
}

/// Build the source-to-canvas transform for rotating a `width` x `height`
/// image by `angle_degrees` (positive = counter-clockwise).
///
/// The canvas spans the rotated corner offsets along each axis. Taking the
/// full span of all four corners, rather than the largest positive minus the
/// smallest negative offset, keeps axis-aligned angles well defined.
pub fn rotation_affine(
    width: u32,
    height: u32,
    angle_degrees: f64,
) -> (AffineTransform, RotatedBounds) {
    let (w, h) = (width as f64, height as f64);
    let (half_w, half_h) = (w * 0.5, h * 0.5);

    let rotation = AffineTransform::rotation((w - 1.0) * 0.5, (h - 1.0) * 0.5, angle_degrees, 1.0);

    let corners = [
        (-half_w, half_h),
        (half_w, half_h),
        (-half_w, -half_h),
        (half_w, -half_h),
    ]
    .map(|(x, y)| rotation.apply_linear(x, y));

    let span = |values: [f64; 4]| {
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        (max - min).abs()
    };
    let bounds = RotatedBounds {
        width: canvas_extent(span(corners.map(|c| c.0)), width),
        height: canvas_extent(span(corners.map(|c| c.1)), height),
    };

    let recenter = AffineTransform::translation(
        bounds.width as f64 * 0.5 - half_w,
        bounds.height as f64 * 0.5 - half_h,
    );

    (rotation.then(&recenter), bounds)
}

fn canvas_extent(span: f64, source_extent: u32) -> u32 {
    if source_extent == 0 {
        return 0;
    }
    (span.round() as u32).max(1)
}

/// Compute the dimensions of the bounding box for a rotated image.
///
/// # Returns
///
/// Tuple of (new_width, new_height).
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let (_, bounds) = rotation_affine(width, height, angle_degrees);
    (bounds.width, bounds.height)
}

/// Rotate an image about its center.
///
/// The output canvas is expanded to fit the entire rotated image; the area
/// outside the rotated footprint is black.
pub fn apply_rotation(
    image: &DecodedImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> DecodedImage {
    if image.is_empty() {
        return image.clone();
    }

    let (transform, bounds) = rotation_affine(image.width, image.height, angle_degrees);
    tracing::debug!(
        angle_degrees,
        src_width = image.width,
        src_height = image.height,
        dst_width = bounds.width,
        dst_height = bounds.height,
        "rotating image"
    );

    warp_affine(image, &transform, bounds.width, bounds.height, filter)
}

/// Warp `image` through a forward affine transform onto an
/// `out_width` x `out_height` canvas.
///
/// Neighbours that fall outside the source contribute black, so edges fade
/// into the background instead of being cut hard.
pub fn warp_affine(
    image: &DecodedImage,
    transform: &AffineTransform,
    out_width: u32,
    out_height: u32,
    filter: InterpolationFilter,
) -> DecodedImage {
    let mut output = DecodedImage::blank(out_width, out_height);
    if image.is_empty() || output.is_empty() {
        return output;
    }

    let Some(inverse) = transform.inverse() else {
        tracing::warn!(?transform, "singular warp matrix, output left black");
        return output;
    };

    let row_len = out_width as usize * CHANNELS;
    for (dst_y, row) in output.pixels.chunks_exact_mut(row_len).enumerate() {
        for (dst_x, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let (src_x, src_y) = inverse.apply(dst_x as f64, dst_y as f64);

            let pixel = match filter {
                InterpolationFilter::Nearest => sample_nearest(image, src_x, src_y),
                InterpolationFilter::Bilinear => sample_bilinear(image, src_x, src_y),
            };
            out.copy_from_slice(&pixel);
        }
    }

    output
}

/// Source pixel as floats, or `None` outside the image.
#[inline]
fn texel(image: &DecodedImage, x: i64, y: i64) -> Option<[f64; 3]> {
    if x < 0 || y < 0 || x >= image.width as i64 || y >= image.height as i64 {
        return None;
    }
    let idx = (y as usize * image.width as usize + x as usize) * CHANNELS;
    Some([
        image.pixels[idx] as f64,
        image.pixels[idx + 1] as f64,
        image.pixels[idx + 2] as f64,
    ])
}

fn sample_nearest(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    if !x.is_finite() || !y.is_finite() {
        return [0, 0, 0];
    }
    match texel(image, x.round() as i64, y.round() as i64) {
        Some(p) => [p[0] as u8, p[1] as u8, p[2] as u8],
        None => [0, 0, 0],
    }
}

fn sample_bilinear(image: &DecodedImage, x: f64, y: f64) -> [u8; 3] {
    if !x.is_finite() || !y.is_finite() {
        return [0, 0, 0];
    }

    let (x0, y0) = (x.floor(), y.floor());
    let (fx, fy) = (x - x0, y - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);

    let taps = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];

    let mut acc = [0.0f64; 3];
    for (px, py, weight) in taps {
        if weight == 0.0 {
            continue;
        }
        if let Some(p) = texel(image, px, py) {
            for (a, v) in acc.iter_mut().zip(p) {
                *a += v * weight;
            }
        }
    }

    acc.map(|v| v.round().clamp(0.0, 255.0) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Gradient test image, every channel the same.
    fn test_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                let v = ((x + y) * 8 % 256) as u8;
                pixels.extend_from_slice(&[v, v, v]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    /// Image whose pixels all differ, so position mix-ups show up.
    fn labelled_image(width: u32, height: u32) -> DecodedImage {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[x as u8, y as u8, 200]);
            }
        }
        DecodedImage::new(width, height, pixels)
    }

    #[test]
    fn test_no_rotation_is_exact_copy() {
        let img = test_image(100, 50);
        let result = apply_rotation(&img, 0.0, InterpolationFilter::Bilinear);
        assert_eq!(result, img);
    }

    #[test]
    fn test_tiny_negative_angle_keeps_bounds() {
        assert_eq!(compute_rotated_bounds(60, 40, -1e-16), (60, 40));
        assert_eq!(compute_rotated_bounds(60, 40, -0.9 + 3.0 * 0.3), (60, 40));

        let img = test_image(60, 40);
        assert_eq!(apply_rotation(&img, -1e-16, InterpolationFilter::Bilinear), img);
    }

    #[test]
    fn test_quarter_turn_bounds() {
        assert_eq!(compute_rotated_bounds(100, 50, 0.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 90.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, 180.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 270.0), (50, 100));
        assert_eq!(compute_rotated_bounds(100, 50, -90.0), (50, 100));
    }

    #[test]
    fn test_large_rotation_angles() {
        assert_eq!(compute_rotated_bounds(100, 50, 720.0), (100, 50));
        assert_eq!(compute_rotated_bounds(100, 50, 450.0), (50, 100));
    }

    #[test]
    fn test_45_degree_rotation_bounds() {
        let (w, h) = compute_rotated_bounds(100, 100, 45.0);
        // Diagonal of 100x100 square is ~141.4
        assert_eq!((w, h), (141, 141));
    }

    #[test]
    fn test_45_degree_rectangle_is_strictly_larger() {
        let img = test_image(200, 100);
        let result = apply_rotation(&img, 45.0, InterpolationFilter::Bilinear);

        // (200 + 100) / sqrt(2) ~ 212.1 on both axes
        assert!(result.width > 200 && result.height > 100);
        assert_eq!((result.width, result.height), (212, 212));
    }

    #[test]
    fn test_opposite_rotations_same_bounds() {
        assert_eq!(
            compute_rotated_bounds(100, 80, 30.0),
            compute_rotated_bounds(100, 80, -30.0)
        );
    }

    #[test]
    fn test_complementary_rotations_same_bounds() {
        assert_eq!(
            compute_rotated_bounds(100, 50, 30.0),
            compute_rotated_bounds(100, 50, 150.0)
        );
    }

    #[test]
    fn test_bounds_never_zero() {
        for angle in [0.5, 15.0, 45.0, 89.5, 90.0, 135.0, 179.5, 180.0, 270.0, 359.5] {
            let (w, h) = compute_rotated_bounds(10, 10, angle);
            assert!(w > 0 && h > 0, "zero canvas at {}", angle);
        }
    }

    #[test]
    fn test_empty_image_stays_empty() {
        let img = DecodedImage::blank(0, 0);
        assert_eq!(compute_rotated_bounds(0, 0, 30.0), (0, 0));
        assert!(apply_rotation(&img, 30.0, InterpolationFilter::Bilinear).is_empty());
    }

    #[test]
    fn test_90_degree_rotation_moves_pixels_exactly() {
        // 4x2 source, counter-clockwise quarter turn -> 2x4
        let img = labelled_image(4, 2);
        let result = apply_rotation(&img, 90.0, InterpolationFilter::Bilinear);

        assert_eq!((result.width, result.height), (2, 4));
        // Top-right source pixel lands top-left, bottom-left lands bottom-right.
        assert_eq!(result.pixel(0, 0), img.pixel(3, 0));
        assert_eq!(result.pixel(1, 3), img.pixel(0, 1));
        // Nothing is lost: every output pixel is opaque source content.
        assert!(result.pixels.chunks(3).all(|p| p[2] == 200));
    }

    #[test]
    fn test_180_degree_rotation_reverses_pixels() {
        let img = labelled_image(5, 3);
        let result = apply_rotation(&img, 180.0, InterpolationFilter::Nearest);

        assert_eq!((result.width, result.height), (5, 3));
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(result.pixel(x, y), img.pixel(4 - x, 2 - y));
            }
        }
    }

    #[test]
    fn test_rotation_leaves_black_corners() {
        let img = DecodedImage::new(40, 40, vec![255u8; 40 * 40 * 3]);
        let result = apply_rotation(&img, 45.0, InterpolationFilter::Bilinear);

        assert_eq!(result.pixel(0, 0), Some([0, 0, 0]));
        let (cx, cy) = (result.width / 2, result.height / 2);
        assert_eq!(result.pixel(cx, cy), Some([255, 255, 255]));
    }

    #[test]
    fn test_bilinear_vs_nearest_same_dimensions() {
        let img = test_image(50, 50);
        let bilinear = apply_rotation(&img, 15.0, InterpolationFilter::Bilinear);
        let nearest = apply_rotation(&img, 15.0, InterpolationFilter::Nearest);

        assert_eq!(bilinear.width, nearest.width);
        assert_eq!(bilinear.height, nearest.height);
    }

    #[test]
    fn test_small_and_thin_images() {
        for (w, h) in [(1, 1), (4, 4), (100, 1), (1, 100)] {
            let img = test_image(w, h);
            let result = apply_rotation(&img, 45.0, InterpolationFilter::Bilinear);
            assert!(result.width > 0 && result.height > 0, "{}x{}", w, h);
            assert_eq!(result.byte_size(), result.pixel_count() * 3);
        }
    }

    #[test]
    fn test_rotation_center_preservation() {
        let size = 21;
        let mut img = DecodedImage::blank(size, size);
        let center = size / 2;
        for dy in 0..3 {
            for dx in 0..3 {
                let idx = (((center - 1 + dy) * size + center - 1 + dx) * 3) as usize;
                img.pixels[idx..idx + 3].copy_from_slice(&[255, 255, 255]);
            }
        }

        let result = apply_rotation(&img, 33.0, InterpolationFilter::Bilinear);
        let bright = result
            .pixel(result.width / 2, result.height / 2)
            .unwrap();
        assert!(bright[0] > 200, "center was {:?}", bright);
    }

    #[test]
    fn test_warp_with_singular_matrix_is_black() {
        let img = test_image(8, 8);
        let singular = AffineTransform::rotation(0.0, 0.0, 10.0, 0.0);
        let result = warp_affine(&img, &singular, 8, 8, InterpolationFilter::Bilinear);
        assert!(result.pixels.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_warp_translation_shifts_content() {
        let img = labelled_image(4, 4);
        let shift = AffineTransform::translation(1.0, 2.0);
        let result = warp_affine(&img, &shift, 4, 4, InterpolationFilter::Bilinear);

        assert_eq!(result.pixel(1, 2), img.pixel(0, 0));
        assert_eq!(result.pixel(0, 0), Some([0, 0, 0]));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The canvas is at least as large as the source footprint, and the
        /// output buffer matches its declared size.
        #[test]
        fn prop_canvas_covers_source(
            (width, height) in (1u32..=40, 1u32..=40),
            angle in 0.0f64..90.0,
        ) {
            let img = DecodedImage::new(width, height, vec![77u8; (width * height * 3) as usize]);
            let result = apply_rotation(&img, angle, InterpolationFilter::Bilinear);

            let (w, h) = compute_rotated_bounds(width, height, angle);
            prop_assert_eq!((result.width, result.height), (w, h));
            prop_assert_eq!(result.byte_size(), (w * h * 3) as usize);
            prop_assert!((w + 1) * (h + 1) >= width * height);
        }

        /// Bounds depend only on the angle modulo 180 and its sign.
        #[test]
        fn prop_bounds_symmetry(
            (width, height) in (1u32..=500, 1u32..=500),
            angle in -360.0f64..360.0,
        ) {
            let base = compute_rotated_bounds(width, height, angle);
            prop_assert_eq!(base, compute_rotated_bounds(width, height, -angle));
            prop_assert_eq!(base, compute_rotated_bounds(width, height, angle + 180.0));
        }
    }
}
