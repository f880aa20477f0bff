//! Per-sample absolute difference with amplification.

use serde::{Deserialize, Serialize};

use super::ElaError;
use crate::decode::DecodedImage;

/// What to do when `|a - b| * scale` does not fit in a byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AmplifyMode {
    /// Clamp to 255.
    #[default]
    Saturate,
    /// Keep the low 8 bits, like storing an int into an 8-bit sample.
    Wrap,
}

/// Summary of the raw (unscaled) differences.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElaStats {
    /// Largest absolute difference of any sample.
    pub max_difference: u8,
    /// Mean absolute difference over all samples.
    pub mean_difference: f64,
}

/// Amplified absolute difference of two equally sized buffers.
///
/// Every output sample is `|original - recompressed| * scale`, reduced to a
/// byte according to `mode`.
///
/// # Errors
///
/// `ElaError::DimensionMismatch` if the buffers differ in size.
pub fn diff_amplify(
    original: &DecodedImage,
    recompressed: &DecodedImage,
    scale: u32,
    mode: AmplifyMode,
) -> Result<DecodedImage, ElaError> {
    ensure_same_size(original, recompressed)?;

    let mut output = DecodedImage::blank(original.width, original.height);
    for ((out, &a), &b) in output
        .pixels
        .iter_mut()
        .zip(&original.pixels)
        .zip(&recompressed.pixels)
    {
        let amplified = a.abs_diff(b) as u32 * scale;
        *out = match mode {
            AmplifyMode::Saturate => amplified.min(u8::MAX as u32) as u8,
            AmplifyMode::Wrap => amplified as u8,
        };
    }

    Ok(output)
}

/// Statistics of `|original - recompressed|` before amplification.
pub fn difference_stats(
    original: &DecodedImage,
    recompressed: &DecodedImage,
) -> Result<ElaStats, ElaError> {
    ensure_same_size(original, recompressed)?;

    if original.pixels.is_empty() {
        return Ok(ElaStats::default());
    }

    let (max, sum) = original
        .pixels
        .iter()
        .zip(&recompressed.pixels)
        .map(|(&a, &b)| a.abs_diff(b))
        .fold((0u8, 0u64), |(max, sum), d| (max.max(d), sum + d as u64));

    Ok(ElaStats {
        max_difference: max,
        mean_difference: sum as f64 / original.pixels.len() as f64,
    })
}

fn ensure_same_size(a: &DecodedImage, b: &DecodedImage) -> Result<(), ElaError> {
    if a.same_dimensions(b) && a.pixels.len() == b.pixels.len() {
        return Ok(());
    }
    Err(ElaError::DimensionMismatch {
        original: (a.width, a.height),
        recompressed: (b.width, b.height),
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Saturated output is monotonic in scale and zero at scale 0.
        #[test]
        fn prop_saturate_monotonic(
            a in prop::collection::vec(any::<u8>(), 12),
            b in prop::collection::vec(any::<u8>(), 12),
            scale in 0u32..100,
        ) {
            let a = DecodedImage::new(2, 2, a);
            let b = DecodedImage::new(2, 2, b);

            let low = diff_amplify(&a, &b, scale, AmplifyMode::Saturate).unwrap();
            let high = diff_amplify(&a, &b, scale + 1, AmplifyMode::Saturate).unwrap();
            prop_assert!(low.pixels.iter().zip(&high.pixels).all(|(l, h)| l <= h));

            let zero = diff_amplify(&a, &b, 0, AmplifyMode::Saturate).unwrap();
            prop_assert!(zero.pixels.iter().all(|&v| v == 0));
        }

        /// Wrap and saturate agree whenever nothing overflows.
        #[test]
        fn prop_modes_agree_without_overflow(
            a in prop::collection::vec(0u8..=25, 12),
            b in prop::collection::vec(0u8..=25, 12),
            scale in 0u32..=10,
        ) {
            let a = DecodedImage::new(2, 2, a);
            let b = DecodedImage::new(2, 2, b);

            prop_assert_eq!(
                diff_amplify(&a, &b, scale, AmplifyMode::Saturate).unwrap(),
                diff_amplify(&a, &b, scale, AmplifyMode::Wrap).unwrap()
            );
        }
    }
}
