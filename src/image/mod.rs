//! Grayscale image views and owned buffers.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows.

use crate::util::{FrameMatchError, FrameMatchResult};

pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> FrameMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(
        data: &'a [T],
        width: usize,
        height: usize,
        stride: usize,
    ) -> FrameMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(FrameMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Returns true if a `width` x `height` patch fits inside this view.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        width <= self.width && height <= self.height
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> FrameMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(FrameMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(FrameMatchError::InvalidStride { width, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(FrameMatchError::InvalidDimensions { width, height })?;
    Ok(needed)
}

/// Owned contiguous grayscale image buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Creates an owned image from a contiguous row-major buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> FrameMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(FrameMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(FrameMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(FrameMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(FrameMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Copies a possibly strided view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, u8>) -> FrameMatchResult<Self> {
        let width = view.width();
        let height = view.height();
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            let row = view.row(y).ok_or(FrameMatchError::BufferTooSmall {
                needed: y * view.stride() + width,
                got: view.as_slice().len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, width, height)
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Channels decoded from image files before matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// Separate red, green and blue planes; scores are summed over channels.
    #[default]
    Rgb,
    /// One 8-bit luma plane.
    Luma,
}

impl ColorMode {
    /// Number of planes this mode decodes into.
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Luma => 1,
        }
    }
}

/// Same-sized 8-bit planes, one per colour channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanarImage {
    planes: Vec<OwnedImage>,
}

impl PlanarImage {
    /// Stacks planes that all share one size.
    pub fn from_planes(planes: Vec<OwnedImage>) -> FrameMatchResult<Self> {
        let (width, height) = match planes.first() {
            Some(first) => (first.width(), first.height()),
            None => return Err(FrameMatchError::InvalidDimensions { width: 0, height: 0 }),
        };
        if let Some(plane) = planes
            .iter()
            .find(|plane| plane.width() != width || plane.height() != height)
        {
            return Err(FrameMatchError::PlaneMismatch {
                expected: (width, height),
                got: (plane.width(), plane.height()),
            });
        }
        Ok(Self { planes })
    }

    /// Wraps a single grayscale plane.
    pub fn from_gray(img: OwnedImage) -> Self {
        Self { planes: vec![img] }
    }

    /// Returns the number of planes.
    pub fn channels(&self) -> usize {
        self.planes.len()
    }

    /// Returns the width in pixels.
    pub fn width(&self) -> usize {
        self.planes[0].width()
    }

    /// Returns the height in pixels.
    pub fn height(&self) -> usize {
        self.planes[0].height()
    }

    /// Returns plane `channel`, if present.
    pub fn plane(&self, channel: usize) -> Option<ImageView<'_, u8>> {
        self.planes.get(channel).map(OwnedImage::view)
    }

    /// Returns views of every plane in channel order.
    pub fn views(&self) -> Vec<ImageView<'_, u8>> {
        self.planes.iter().map(OwnedImage::view).collect()
    }
}
