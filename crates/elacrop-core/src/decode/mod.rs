//! Image decoding.
//!
//! Turns encoded bytes (JPEG or PNG) into the RGB8 [`DecodedImage`] buffer
//! that every other module in this crate operates on. Reading files is left
//! to the caller.

mod reader;
mod types;

pub use reader::{decode_image, decode_image_no_orientation, get_orientation};
pub use types::{DecodeError, DecodedImage, Orientation, CHANNELS};
