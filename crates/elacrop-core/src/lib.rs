//! Elacrop Core - image forensics and geometry library
//!
//! This crate provides the image processing behind the `rotate-crop` and
//! `ela` tools: decoding and encoding, rotation onto an expanded canvas,
//! largest-inscribed-rectangle cropping, and Error Level Analysis.

pub mod decode;
pub mod ela;
pub mod encode;
pub mod sweep;
pub mod transform;

pub use decode::{decode_image, DecodeError, DecodedImage};
pub use ela::{error_level_analysis, AmplifyMode, ElaError, ElaOutput, ElaParams, ElaSession};
pub use encode::{encode_jpeg, encode_png, EncodeError};
pub use sweep::{rotate_and_crop, run_sweep, AngleSweep, FrameSink, RotateCropFrame, Surface};
pub use transform::{
    apply_rotation, compute_rotated_bounds, crop_center, largest_inscribed_rect,
    InterpolationFilter, TransformError,
};
