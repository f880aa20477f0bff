//! Largest axis-aligned rectangle inside a rotated rectangle.
//!
//! After rotating a `w` x `h` image the canvas has black wedges in every
//! corner. The rectangle computed here is the biggest upright box, centered
//! on the canvas, that avoids all of them.
//!
//! The main path is the closed form by Andri and Magnus Hoff (Stack Overflow
//! 16702966), which puts the crop corners on the diagonals of the rotated
//! bounding box:
//!
//! ```text
//! bb     = rotated bounding box of w x h at alpha
//! gamma  = atan2(bb_w, bb_h) if w < h else atan2(bb_h, bb_w)
//! delta  = pi - alpha - gamma
//! d      = max(w, h) * cos(alpha)
//! a      = d * sin(alpha) / sin(delta)
//! y      = a * cos(gamma)
//! x      = y * tan(gamma)
//! result = (bb_w - 2x, bb_h - 2y)
//! ```
//!
//! For long thin rectangles that construction overshoots and goes negative.
//! Those cases use the maximum-area solution from the same thread, where the
//! crop touches either both long sides (half constrained) or all four sides.

use std::f64::consts::{FRAC_PI_2, PI};

/// Angles closer than this to an axis are treated as axis-aligned.
const AXIS_EPSILON: f64 = 1e-9;

/// Width and height of an inscribed rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InscribedRect {
    pub width: f64,
    pub height: f64,
}

impl InscribedRect {
    /// Whole-pixel size, truncated toward zero.
    pub fn to_pixels(self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Size of the largest axis-aligned rectangle inside a `width` x `height`
/// rectangle rotated by `angle_radians`.
///
/// Arguments come in (height, width) order; the result is (width, height).
/// Axis-aligned angles return the original size, swapped at quarter and
/// three-quarter turns.
pub fn largest_inscribed_rect(height: u32, width: u32, angle_radians: f64) -> InscribedRect {
    if width == 0 || height == 0 || !angle_radians.is_finite() {
        return InscribedRect {
            width: 0.0,
            height: 0.0,
        };
    }

    let (w, h) = (width as f64, height as f64);
    let alpha = reduce_angle(angle_radians);

    if alpha < AXIS_EPSILON || alpha > PI - AXIS_EPSILON {
        return InscribedRect {
            width: w,
            height: h,
        };
    }
    if (alpha - FRAC_PI_2).abs() < AXIS_EPSILON {
        return InscribedRect {
            width: h,
            height: w,
        };
    }

    let (sin_a, cos_a) = alpha.sin_cos();
    let bb_w = w * cos_a + h * sin_a;
    let bb_h = w * sin_a + h * cos_a;

    let rect = diagonal_crop(w, h, alpha, bb_w, bb_h)
        .filter(|r| r.width >= 0.0 && r.height >= 0.0)
        .unwrap_or_else(|| {
            tracing::debug!(width, height, alpha, "diagonal crop overshoots, using max-area crop");
            max_area_crop(w, h, sin_a, cos_a)
        });

    InscribedRect {
        width: rect.width.clamp(0.0, bb_w),
        height: rect.height.clamp(0.0, bb_h),
    }
}

/// Hoff's construction. `None` when `sin(delta)` vanishes.
fn diagonal_crop(w: f64, h: f64, alpha: f64, bb_w: f64, bb_h: f64) -> Option<InscribedRect> {
    let gamma = if w < h {
        bb_w.atan2(bb_h)
    } else {
        bb_h.atan2(bb_w)
    };
    let delta = PI - alpha - gamma;

    let sin_delta = delta.sin();
    if sin_delta.abs() < 1e-12 {
        return None;
    }

    let d = w.max(h) * alpha.cos();
    let a = d * alpha.sin() / sin_delta;
    let y = a * gamma.cos();
    let x = y * gamma.tan();

    Some(InscribedRect {
        width: bb_w - 2.0 * x,
        height: bb_h - 2.0 * y,
    })
}

fn max_area_crop(w: f64, h: f64, sin_a: f64, cos_a: f64) -> InscribedRect {
    let width_is_longer = w >= h;
    let (long, short) = if width_is_longer { (w, h) } else { (h, w) };

    if short <= 2.0 * sin_a * cos_a * long || (sin_a - cos_a).abs() < 1e-10 {
        let x = 0.5 * short;
        let (width, height) = if width_is_longer {
            (x / sin_a, x / cos_a)
        } else {
            (x / cos_a, x / sin_a)
        };
        return InscribedRect { width, height };
    }

    let cos_2a = cos_a * cos_a - sin_a * sin_a;
    InscribedRect {
        width: (w * cos_a - h * sin_a) / cos_2a,
        height: (h * cos_a - w * sin_a) / cos_2a,
    }
}

/// Fold any angle into `[0, pi/2]` so that the bounding box formula holds.
///
/// Angles in odd quadrants are mirrored through `pi - angle`, which leaves
/// the rotated footprint unchanged.
fn reduce_angle(angle: f64) -> f64 {
    let quadrant = (angle / FRAC_PI_2).floor().rem_euclid(4.0) as u8;
    let sign_alpha = if quadrant % 2 == 0 { angle } else { PI - angle };
    ((sign_alpha % PI) + PI) % PI
}
