//! Rotate-and-crop over a range of angles.
//!
//! Drives the transform pipeline one angle at a time and hands each stage
//! to a [`FrameSink`]. The sink plays the part of the display: it can show
//! or save the images, and it can stop the sweep early.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;
use crate::transform::{
    apply_rotation, crop_center, degrees_to_radians, largest_inscribed_rect, InterpolationFilter,
    TransformError,
};

/// Degrees between frames when nothing else is configured.
pub const DEFAULT_STEP_DEGREES: f64 = 0.5;

/// Angles visited by a sweep: `start`, `start + step`, ... while `< end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AngleSweep {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl Default for AngleSweep {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 360.0,
            step: DEFAULT_STEP_DEGREES,
        }
    }
}

impl AngleSweep {
    pub fn new(start: f64, end: f64, step: f64) -> Self {
        Self { start, end, step }
    }

    /// Iterate over the angles. A step that is not positive and finite
    /// yields nothing.
    pub fn angles(&self) -> impl Iterator<Item = f64> + '_ {
        let count = self.len();
        (0..count).map(move |i| self.start + i as f64 * self.step)
    }

    /// Number of frames in the sweep.
    pub fn len(&self) -> usize {
        if !(self.step.is_finite() && self.step > 0.0) || !(self.end > self.start) {
            return 0;
        }
        ((self.end - self.start) / self.step).ceil() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Original,
    Rotated,
    Cropped,
}

impl Surface {
    pub const ALL: [Surface; 3] = [Surface::Original, Surface::Rotated, Surface::Cropped];

    /// Window title.
    pub fn title(self) -> &'static str {
        match self {
            Surface::Original => "Original Image",
            Surface::Rotated => "Rotated Image",
            Surface::Cropped => "Cropped image",
        }
    }

    /// Short name usable in file names.
    pub fn stem(self) -> &'static str {
        match self {
            Surface::Original => "original",
            Surface::Rotated => "rotated",
            Surface::Cropped => "cropped",
        }
    }
}

/// The two derived images for one angle.
#[derive(Debug, Clone)]
pub struct RotateCropFrame {
    pub angle_degrees: f64,
    pub rotated: DecodedImage,
    pub cropped: DecodedImage,
}

/// Rotate `image` and cut out the largest border-free rectangle.
pub fn rotate_and_crop(
    image: &DecodedImage,
    angle_degrees: f64,
    filter: InterpolationFilter,
) -> Result<RotateCropFrame, TransformError> {
    if image.is_empty() {
        return Err(TransformError::EmptyImage);
    }

    let rotated = apply_rotation(image, angle_degrees, filter);
    let rect = largest_inscribed_rect(image.height, image.width, degrees_to_radians(angle_degrees));
    let (crop_width, crop_height) = rect.to_pixels();
    let cropped = crop_center(&rotated, crop_height, crop_width)?;

    Ok(RotateCropFrame {
        angle_degrees,
        rotated,
        cropped,
    })
}

/// Receives the images of a sweep.
pub trait FrameSink {
    /// Show one surface. Returning `ControlFlow::Break` ends the sweep
    /// after the current frame.
    fn present(&mut self, surface: Surface, angle_degrees: f64, image: &DecodedImage)
        -> ControlFlow<()>;
}

/// How a sweep ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSummary {
    pub frames: usize,
    pub aborted: bool,
}

/// Run the rotate-crop pipeline for every angle of `sweep`, presenting the
/// original, rotated and cropped surfaces of each frame in that order.
pub fn run_sweep<S: FrameSink + ?Sized>(
    image: &DecodedImage,
    sweep: &AngleSweep,
    filter: InterpolationFilter,
    sink: &mut S,
) -> Result<SweepSummary, TransformError> {
    let total = sweep.len();
    let mut frames = 0;

    for angle in sweep.angles() {
        let frame = rotate_and_crop(image, angle, filter)?;
        frames += 1;

        let flow = [
            (Surface::Original, image),
            (Surface::Rotated, &frame.rotated),
            (Surface::Cropped, &frame.cropped),
        ]
        .into_iter()
        .try_for_each(|(surface, img)| sink.present(surface, angle, img));

        if flow.is_break() {
            tracing::info!(angle, frames, total, "sweep stopped");
            return Ok(SweepSummary {
                frames,
                aborted: true,
            });
        }
        tracing::trace!(angle, frames, total, "frame presented");
    }

    tracing::info!(frames, "sweep finished");
    Ok(SweepSummary {
        frames,
        aborted: false,
    })
}
