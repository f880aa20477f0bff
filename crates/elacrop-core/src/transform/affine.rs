//! 2x3 affine matrices in the OpenCV layout.
//!
//! A transform maps source pixel coordinates to destination coordinates:
//!
//! ```text
//! | x' |   | a  b  tx |   | x |
//! | y' | = | c  d  ty | * | y |
//!                          | 1 |
//! ```

/// Row-major 2x3 affine coefficients `[[a, b, tx], [c, d, ty]]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub m: [[f64; 3]; 2],
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub const fn identity() -> Self {
        Self {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        }
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self {
            m: [[1.0, 0.0, tx], [0.0, 1.0, ty]],
        }
    }

    /// Rotation about `(cx, cy)` with uniform `scale`.
    ///
    /// Positive angles turn the picture counter-clockwise as it appears on
    /// screen (y grows downward), matching `cv::getRotationMatrix2D`.
    pub fn rotation(cx: f64, cy: f64, angle_degrees: f64, scale: f64) -> Self {
        let (sin, cos) = sin_cos_degrees(angle_degrees);
        let alpha = scale * cos;
        let beta = scale * sin;

        Self {
            m: [
                [alpha, beta, (1.0 - alpha) * cx - beta * cy],
                [-beta, alpha, beta * cx + (1.0 - alpha) * cy],
            ],
        }
    }

    /// Extend to a 3x3 homogeneous matrix by appending `(0, 0, 1)`.
    pub fn to_homogeneous(&self) -> [[f64; 3]; 3] {
        [self.m[0], self.m[1], [0.0, 0.0, 1.0]]
    }

    /// Keep the first two rows of a homogeneous matrix.
    pub fn from_homogeneous(h: &[[f64; 3]; 3]) -> Self {
        Self { m: [h[0], h[1]] }
    }

    /// Apply `self` first, then `next`.
    ///
    /// Computed as the homogeneous product `next * self` truncated to 2x3.
    pub fn then(&self, next: &AffineTransform) -> AffineTransform {
        let a = next.to_homogeneous();
        let b = self.to_homogeneous();
        let mut out = [[0.0; 3]; 3];

        for (row, out_row) in out.iter_mut().enumerate() {
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| a[row][k] * b[k][col]).sum();
            }
        }

        Self::from_homogeneous(&out)
    }

    /// The 2x2 block without translation.
    pub fn linear(&self) -> [[f64; 2]; 2] {
        [[self.m[0][0], self.m[0][1]], [self.m[1][0], self.m[1][1]]]
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let (lx, ly) = self.apply_linear(x, y);
        (lx + self.m[0][2], ly + self.m[1][2])
    }

    #[inline]
    pub fn apply_linear(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.m[0][0] * x + self.m[0][1] * y,
            self.m[1][0] * x + self.m[1][1] * y,
        )
    }

    pub fn determinant(&self) -> f64 {
        self.m[0][0] * self.m[1][1] - self.m[0][1] * self.m[1][0]
    }

    /// Destination-to-source mapping. `None` for a singular matrix.
    pub fn inverse(&self) -> Option<AffineTransform> {
        let det = self.determinant();
        if det.abs() < 1e-12 || !det.is_finite() {
            return None;
        }

        let [[a, b, tx], [c, d, ty]] = self.m;
        let ia = d / det;
        let ib = -b / det;
        let ic = -c / det;
        let id = a / det;

        Some(Self {
            m: [
                [ia, ib, -(ia * tx + ib * ty)],
                [ic, id, -(ic * tx + id * ty)],
            ],
        })
    }
}

/// Sine and cosine of an angle in degrees, exact at multiples of 90.
pub(crate) fn sin_cos_degrees(angle_degrees: f64) -> (f64, f64) {
    // rem_euclid can round tiny negative angles up to exactly 360.
    let turned = angle_degrees.rem_euclid(360.0);
    if turned % 90.0 == 0.0 {
        return match (turned / 90.0) as u32 % 4 {
            0 => (0.0, 1.0),
            1 => (1.0, 0.0),
            2 => (0.0, -1.0),
            _ => (-1.0, 0.0),
        };
    }
    angle_degrees.to_radians().sin_cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
        assert!(
            (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_identity_maps_points_to_themselves() {
        let t = AffineTransform::identity();
        assert_close(t.apply(3.5, -2.0), (3.5, -2.0));
    }

    #[test]
    fn test_rotation_keeps_center_fixed() {
        let t = AffineTransform::rotation(10.0, 5.0, 33.0, 1.0);
        assert_close(t.apply(10.0, 5.0), (10.0, 5.0));
    }

    #[test]
    fn test_rotation_90_turns_counter_clockwise_on_screen() {
        // A point to the right of the center ends up above it (smaller y).
        let t = AffineTransform::rotation(0.0, 0.0, 90.0, 1.0);
        assert_close(t.apply(1.0, 0.0), (0.0, -1.0));
    }

    #[test]
    fn test_exact_quarter_turns() {
        assert_eq!(sin_cos_degrees(0.0), (0.0, 1.0));
        assert_eq!(sin_cos_degrees(90.0), (1.0, 0.0));
        assert_eq!(sin_cos_degrees(-90.0), (-1.0, 0.0));
        assert_eq!(sin_cos_degrees(540.0), (0.0, -1.0));
        assert_eq!(sin_cos_degrees(270.0), (-1.0, 0.0));
        assert_eq!(sin_cos_degrees(-360.0), (0.0, 1.0));
    }

    #[test]
    fn test_tiny_negative_angle_is_identity() {
        assert_eq!((-1e-16f64).rem_euclid(360.0), 360.0);
        assert_eq!(sin_cos_degrees(-1e-16), (0.0, 1.0));
        assert_close(sin_cos_degrees(-0.9 + 3.0 * 0.3), (0.0, 1.0));
        assert_close(sin_cos_degrees(720.0 - 1e-13), (0.0, 1.0));
    }

    #[test]
    fn test_homogeneous_round_trip() {
        let t = AffineTransform::rotation(4.0, 2.0, 17.0, 1.0);
        let h = t.to_homogeneous();
        assert_eq!(h[2], [0.0, 0.0, 1.0]);
        assert_eq!(AffineTransform::from_homogeneous(&h), t);
    }

    #[test]
    fn test_then_applies_in_order() {
        let rotate = AffineTransform::rotation(0.0, 0.0, 90.0, 1.0);
        let shift = AffineTransform::translation(5.0, 0.0);

        // rotate (1, 0) -> (0, -1), then shift -> (5, -1)
        assert_close(rotate.then(&shift).apply(1.0, 0.0), (5.0, -1.0));
        // shift (1, 0) -> (6, 0), then rotate -> (0, -6)
        assert_close(shift.then(&rotate).apply(1.0, 0.0), (0.0, -6.0));
    }

    #[test]
    fn test_linear_block_ignores_translation() {
        let t = AffineTransform::rotation(7.0, 3.0, 90.0, 1.0);
        assert_eq!(t.linear(), [[0.0, 1.0], [-1.0, 0.0]]);
        assert_close(t.apply_linear(1.0, 0.0), (0.0, -1.0));
    }

    #[test]
    fn test_inverse_undoes_transform() {
        let t = AffineTransform::rotation(8.0, 6.0, 27.0, 1.0)
            .then(&AffineTransform::translation(3.0, -4.0));
        let inv = t.inverse().unwrap();

        let (x, y) = t.apply(2.0, 9.0);
        assert_close(inv.apply(x, y), (2.0, 9.0));
    }

    #[test]
    fn test_singular_has_no_inverse() {
        let t = AffineTransform::rotation(0.0, 0.0, 45.0, 0.0);
        assert!(t.inverse().is_none());
    }
}
