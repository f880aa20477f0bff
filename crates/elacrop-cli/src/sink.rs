//! A [`FrameSink`] that writes sweep surfaces as PNG files.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use elacrop_core::sweep::{FrameSink, Surface};
use elacrop_core::DecodedImage;

use crate::io::save_png;

/// Writes `original.png` once, then the rotated and cropped surfaces of
/// every `every`-th frame as `<surface>_<frame>_<angle>.png`.
///
/// A write failure stops the sweep; collect it with [`DirectorySink::finish`].
pub struct DirectorySink {
    dir: PathBuf,
    every: usize,
    frame: usize,
    saved: usize,
    original_written: bool,
    error: Option<anyhow::Error>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>, every: usize) -> Self {
        Self {
            dir: dir.into(),
            every: every.max(1),
            frame: 0,
            saved: 0,
            original_written: false,
            error: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of files written so far, or the first write error.
    pub fn finish(self) -> anyhow::Result<usize> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.saved),
        }
    }

    fn wants(&self, surface: Surface) -> bool {
        match surface {
            Surface::Original => !self.original_written,
            Surface::Rotated | Surface::Cropped => self.frame % self.every == 0,
        }
    }

    fn write(&mut self, surface: Surface, angle_degrees: f64, image: &DecodedImage) -> anyhow::Result<()> {
        let name = match surface {
            Surface::Original => format!("{}.png", surface.stem()),
            _ => frame_file_name(surface, self.frame, angle_degrees),
        };
        save_png(&self.dir.join(name), image)?;
        self.saved += 1;
        Ok(())
    }
}

impl FrameSink for DirectorySink {
    fn present(
        &mut self,
        surface: Surface,
        angle_degrees: f64,
        image: &DecodedImage,
    ) -> ControlFlow<()> {
        if self.wants(surface) {
            if let Err(err) = self.write(surface, angle_degrees, image) {
                self.error = Some(err);
                return ControlFlow::Break(());
            }
            if surface == Surface::Original {
                self.original_written = true;
            }
        }
        if surface == Surface::Cropped {
            self.frame += 1;
        }
        ControlFlow::Continue(())
    }
}

/// `rotated_00025_12.500.png`
///
/// The frame index keeps names unique for steps finer than the printed angle.
pub fn frame_file_name(surface: Surface, frame: usize, angle_degrees: f64) -> String {
    format!("{}_{:05}_{:.3}.png", surface.stem(), frame, angle_degrees)
}
