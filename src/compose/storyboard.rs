//! Side-by-side storyboard strips.

use crate::image::io::load_rgba_image;
use crate::util::{FrameMatchError, FrameMatchResult};
use image::{imageops, Rgba, RgbaImage};
use std::path::Path;

/// Spacing and colour of a storyboard strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StoryboardLayout {
    /// Horizontal gap between consecutive frames.
    pub separation: u32,
    /// Margin around the whole strip.
    pub padding: u32,
    /// Canvas colour.
    pub background: Rgba<u8>,
}

impl Default for StoryboardLayout {
    fn default() -> Self {
        Self {
            separation: 100,
            padding: 200,
            background: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Lays frames out left to right on one canvas, each vertically centred.
pub fn combine_horizontally<P: AsRef<Path>>(
    paths: &[P],
    layout: StoryboardLayout,
) -> FrameMatchResult<RgbaImage> {
    if paths.is_empty() {
        return Err(FrameMatchError::EmptyStoryboard);
    }
    let frames = paths
        .iter()
        .map(load_rgba_image)
        .collect::<FrameMatchResult<Vec<_>>>()?;

    let gaps = layout.separation * (frames.len() as u32 - 1);
    let frames_width: u32 = frames.iter().map(RgbaImage::width).sum::<u32>() + gaps;
    let max_height = frames.iter().map(RgbaImage::height).max().unwrap_or(0);

    let width = frames_width + 2 * layout.padding;
    let height = max_height + 2 * layout.padding;
    let mut canvas = RgbaImage::from_pixel(width, height, layout.background);

    let mut x = i64::from(layout.padding);
    for frame in &frames {
        let y = i64::from((height - frame.height()) / 2);
        imageops::replace(&mut canvas, frame, x, y);
        x += i64::from(frame.width() + layout.separation);
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::{combine_horizontally, StoryboardLayout};
    use crate::FrameMatchError;
    use image::{Rgba, RgbaImage};

    #[test]
    fn frames_are_laid_out_with_padding_and_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let red = dir.path().join("red.png");
        let blue = dir.path().join("blue.png");
        RgbaImage::from_pixel(4, 6, Rgba([255, 0, 0, 255]))
            .save(&red)
            .unwrap();
        RgbaImage::from_pixel(3, 2, Rgba([0, 0, 255, 255]))
            .save(&blue)
            .unwrap();

        let layout = StoryboardLayout {
            separation: 2,
            padding: 1,
            background: Rgba([255, 255, 255, 255]),
        };
        let strip = combine_horizontally(&[&red, &blue], layout).unwrap();
        assert_eq!(strip.dimensions(), (4 + 2 + 3 + 2, 6 + 2));
        assert_eq!(*strip.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*strip.get_pixel(7, 3), Rgba([0, 0, 255, 255]));
        assert_eq!(*strip.get_pixel(7, 1), Rgba([255, 255, 255, 255]));
        assert_eq!(*strip.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn empty_input_is_rejected() {
        let none: [&str; 0] = [];
        assert_eq!(
            combine_horizontally(&none, StoryboardLayout::default()).unwrap_err(),
            FrameMatchError::EmptyStoryboard
        );
    }
}
