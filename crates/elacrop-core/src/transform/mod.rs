//! Geometric transforms: rotation, inscribed-rectangle sizing and cropping.
//!
//! The rotate-crop pipeline runs these in order:
//! 1. [`apply_rotation`] onto a canvas that holds every rotated corner
//! 2. [`largest_inscribed_rect`] for the size of the border-free area
//! 3. [`crop_center`] to cut that area out
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees at the API surface, positive =
//!   counter-clockwise; [`largest_inscribed_rect`] takes radians
//! - Sizes are always written width then height, except where a function
//!   documents (height, width) argument order
//! - Origin is top-left corner, y grows downward

mod affine;
mod crop;
mod inscribed;
mod rotation;

use thiserror::Error;

pub use affine::AffineTransform;
pub use crop::crop_center;
pub use inscribed::{degrees_to_radians, largest_inscribed_rect, InscribedRect};
pub use rotation::{
    apply_rotation, compute_rotated_bounds, rotation_affine, warp_affine, InterpolationFilter,
    RotatedBounds,
};

/// Errors from geometric transforms.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransformError {
    /// The source buffer has zero width or height.
    #[error("Cannot transform an empty image")]
    EmptyImage,
}
