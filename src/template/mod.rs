//! Template storage and planning utilities.

use crate::image::io::load_planar_image;
use crate::image::{ColorMode, OwnedImage, PlanarImage};
use crate::util::FrameMatchResult;
use std::path::Path;

pub(crate) mod plan;

pub use plan::TemplatePlan;

/// Owned template image, one plane per decoded channel.
#[derive(Clone, Debug)]
pub struct Template {
    planes: PlanarImage,
}

impl Template {
    /// Creates a single-plane template from a contiguous grayscale buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> FrameMatchResult<Self> {
        let img = OwnedImage::new(data, width, height)?;
        Ok(Self::from(img))
    }

    /// Decodes a template image from disk into the planes of `mode`.
    pub fn load<P: AsRef<Path>>(path: P, mode: ColorMode) -> FrameMatchResult<Self> {
        Ok(Self {
            planes: load_planar_image(path, mode)?,
        })
    }

    /// Returns the template planes.
    pub fn planes(&self) -> &PlanarImage {
        &self.planes
    }

    /// Returns the number of channels.
    pub fn channels(&self) -> usize {
        self.planes.channels()
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.planes.width()
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.planes.height()
    }
}

impl From<OwnedImage> for Template {
    fn from(img: OwnedImage) -> Self {
        Self {
            planes: PlanarImage::from_gray(img),
        }
    }
}

impl From<PlanarImage> for Template {
    fn from(planes: PlanarImage) -> Self {
        Self { planes }
    }
}
