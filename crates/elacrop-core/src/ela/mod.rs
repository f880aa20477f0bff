//! Error Level Analysis.
//!
//! A JPEG that has been edited after its last save tends to recompress
//! unevenly: untouched regions are already "settled" at the quantization the
//! file was saved with, while pasted or retouched regions lose more detail.
//! ELA makes that visible by recompressing at a known quality and amplifying
//! the per-sample difference.
//!
//! # Pipeline
//!
//! 1. [`recompress_jpeg`] - encode at `quality`, decode the result back
//! 2. [`diff_amplify`] - `|original - recompressed| * scale`
//!
//! [`ElaSession`] holds the source image and the two slider values, and
//! re-runs the pipeline whenever a value changes.

mod diff;
mod session;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::{decode_image_no_orientation, DecodeError, DecodedImage};
use crate::encode::{encode_jpeg_image, EncodeError};

pub use diff::{diff_amplify, difference_stats, AmplifyMode, ElaStats};
pub use session::ElaSession;

/// Upper bound of both sliders.
pub const MAX_PARAM: u8 = 100;

/// Default amplification.
pub const DEFAULT_SCALE: u8 = 15;

/// Default recompression quality.
pub const DEFAULT_QUALITY: u8 = 75;

/// Errors from error level analysis.
#[derive(Debug, Error)]
pub enum ElaError {
    #[error("Image sizes differ: original {original:?}, recompressed {recompressed:?}")]
    DimensionMismatch {
        original: (u32, u32),
        recompressed: (u32, u32),
    },

    #[error("{name} must be between 0 and {max}, got {value}")]
    ParamOutOfRange {
        name: &'static str,
        value: u8,
        max: u8,
    },

    #[error("Cannot analyze an empty image")]
    EmptyImage,

    #[error("JPEG recompression failed: {0}")]
    Encode(#[from] EncodeError),

    /// The recompressed JPEG could not be read back.
    #[error("Failed to decode recompressed image: {0}")]
    Recompression(#[source] DecodeError),
}

/// Slider values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElaParams {
    /// Amplification factor (0-100).
    pub scale: u8,
    /// JPEG quality used for recompression (0-100).
    pub quality: u8,
}

impl Default for ElaParams {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            quality: DEFAULT_QUALITY,
        }
    }
}

impl ElaParams {
    pub fn new(scale: u8, quality: u8) -> Result<Self, ElaError> {
        let params = Self { scale, quality };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ElaError> {
        check_range("scale", self.scale)?;
        check_range("quality", self.quality)
    }
}

fn check_range(name: &'static str, value: u8) -> Result<(), ElaError> {
    if value > MAX_PARAM {
        return Err(ElaError::ParamOutOfRange {
            name,
            value,
            max: MAX_PARAM,
        });
    }
    Ok(())
}

/// Result of one analysis run.
#[derive(Debug, Clone)]
pub struct ElaOutput {
    /// The amplified difference image.
    pub image: DecodedImage,
    /// Statistics of the unscaled difference.
    pub stats: ElaStats,
    /// The JPEG bytes the source was recompressed to.
    pub recompressed_jpeg: Vec<u8>,
}

/// Encode `image` as JPEG at `quality` and decode it again.
///
/// Returns the encoded bytes together with the decoded buffer.
pub fn recompress_jpeg(
    image: &DecodedImage,
    quality: u8,
) -> Result<(Vec<u8>, DecodedImage), ElaError> {
    let jpeg = encode_jpeg_image(image, quality)?;
    let decoded = decode_image_no_orientation(&jpeg).map_err(ElaError::Recompression)?;
    tracing::debug!(quality, bytes = jpeg.len(), "recompressed source");
    Ok((jpeg, decoded))
}

/// Run the full analysis for one set of parameters.
pub fn error_level_analysis(
    source: &DecodedImage,
    params: ElaParams,
    mode: AmplifyMode,
) -> Result<ElaOutput, ElaError> {
    params.validate()?;
    if source.is_empty() {
        return Err(ElaError::EmptyImage);
    }

    let (recompressed_jpeg, recompressed) = recompress_jpeg(source, params.quality)?;
    let image = diff_amplify(source, &recompressed, params.scale as u32, mode)?;
    let stats = difference_stats(source, &recompressed)?;

    tracing::info!(
        scale = params.scale,
        quality = params.quality,
        max_difference = stats.max_difference,
        mean_difference = stats.mean_difference,
        "error level analysis"
    );

    Ok(ElaOutput {
        image,
        stats,
        recompressed_jpeg,
    })
}
