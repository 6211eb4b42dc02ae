//! Frame composition from generated assets.
//!
//! An upstream agent describes where each generated element goes on the
//! background canvas. Those descriptions arrive as JSON tool-call arguments
//! and are validated into [`ElementPlacement`] records before any pixel is
//! touched.

mod storyboard;

pub use storyboard::{combine_horizontally, StoryboardLayout};

use crate::image::io::{image_error, load_rgba_image};
use crate::trace::{trace_event, trace_span};
use crate::util::{FrameMatchError, FrameMatchResult};
use image::imageops::{self, FilterType};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

/// Largest target box, as a multiple of the canvas size on each axis.
pub const MAX_TARGET_SCALE: u32 = 8;

/// Where and how large one element is drawn on the background.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ElementPlacement {
    /// Element image on disk.
    pub image_path: PathBuf,
    /// Left edge of the target box.
    #[serde(deserialize_with = "int_or_string")]
    pub start_position_x: i64,
    /// Top edge of the target box.
    #[serde(deserialize_with = "int_or_string")]
    pub start_position_y: i64,
    /// Target box width; the element is scaled to fit inside it.
    #[serde(deserialize_with = "int_or_string")]
    pub target_width: i64,
    /// Target box height.
    #[serde(deserialize_with = "int_or_string")]
    pub target_height: i64,
}

impl ElementPlacement {
    /// Parses and validates a JSON array of placements.
    pub fn parse_list(json: &str) -> FrameMatchResult<Vec<Self>> {
        let elements: Vec<Self> =
            serde_json::from_str(json).map_err(|err| FrameMatchError::InvalidPlacement {
                reason: err.to_string(),
            })?;
        for element in &elements {
            element.validate()?;
        }
        Ok(elements)
    }

    /// Checks that the path is set and the target box is non-empty.
    pub fn validate(&self) -> FrameMatchResult<()> {
        if self.image_path.as_os_str().is_empty() {
            return Err(FrameMatchError::InvalidPlacement {
                reason: "image_path is empty".to_owned(),
            });
        }
        if self.target_width <= 0 || self.target_height <= 0 {
            return Err(FrameMatchError::InvalidPlacement {
                reason: format!(
                    "target size {}x{} for {} must be positive",
                    self.target_width,
                    self.target_height,
                    self.image_path.display()
                ),
            });
        }
        if self.target_width > i64::from(u32::MAX) || self.target_height > i64::from(u32::MAX) {
            return Err(FrameMatchError::InvalidPlacement {
                reason: "target size exceeds u32".to_owned(),
            });
        }
        Ok(())
    }

    /// Checks that the target box is no larger than [`MAX_TARGET_SCALE`]
    /// times the canvas on either axis.
    pub fn validate_against(&self, canvas_width: u32, canvas_height: u32) -> FrameMatchResult<()> {
        self.validate()?;
        let max_width = u64::from(canvas_width) * u64::from(MAX_TARGET_SCALE);
        let max_height = u64::from(canvas_height) * u64::from(MAX_TARGET_SCALE);
        if self.target_width as u64 > max_width || self.target_height as u64 > max_height {
            return Err(FrameMatchError::InvalidPlacement {
                reason: format!(
                    "target size {}x{} for {} exceeds {}x the {}x{} canvas",
                    self.target_width,
                    self.target_height,
                    self.image_path.display(),
                    MAX_TARGET_SCALE,
                    canvas_width,
                    canvas_height
                ),
            });
        }
        Ok(())
    }
}

/// Agents frequently send numbers as strings; accept both.
fn int_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Float(f64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(v) => Ok(v),
        IntOrString::Float(v) if v.is_finite() => Ok(v.trunc() as i64),
        IntOrString::Float(v) => Err(serde::de::Error::custom(format!("non-finite number {v}"))),
        IntOrString::Str(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got {s:?}"))),
    }
}

/// Scales `(width, height)` to fit inside `(target_width, target_height)`
/// while keeping the aspect ratio. Sizes are truncated, never below 1.
pub fn fit_within(width: u32, height: u32, target_width: u32, target_height: u32) -> (u32, u32) {
    let ratio = (f64::from(target_width) / f64::from(width))
        .min(f64::from(target_height) / f64::from(height));
    let fitted_width = (f64::from(width) * ratio) as u32;
    let fitted_height = (f64::from(height) * ratio) as u32;
    (fitted_width.max(1), fitted_height.max(1))
}

/// Returns the top-left corner that centres a `size` box inside the target
/// box of `element`.
pub fn centered_offset(element: &ElementPlacement, size: (u32, u32)) -> (i64, i64) {
    let (width, height) = size;
    (
        element.start_position_x + (element.target_width - i64::from(width)) / 2,
        element.start_position_y + (element.target_height - i64::from(height)) / 2,
    )
}

/// Draws every element onto the background and saves the result to `output`.
///
/// Each element is resized to fit its target box, centred in it and
/// alpha-blended over the canvas. Element files are never modified.
pub fn compose_frame<P: AsRef<Path>, Q: AsRef<Path>>(
    background: P,
    elements: &[ElementPlacement],
    output: Q,
) -> FrameMatchResult<PathBuf> {
    let background = background.as_ref();
    let output = output.as_ref();
    let _span = trace_span!("compose_frame", elements = elements.len()).entered();

    let mut canvas = load_rgba_image(background)?;
    for element in elements {
        element.validate_against(canvas.width(), canvas.height())?;
        let img = load_rgba_image(&element.image_path)?;
        let (fit_w, fit_h) = fit_within(
            img.width(),
            img.height(),
            element.target_width as u32,
            element.target_height as u32,
        );
        let resized = imageops::resize(&img, fit_w, fit_h, FilterType::Lanczos3);
        let (x, y) = centered_offset(element, (fit_w, fit_h));
        imageops::overlay(&mut canvas, &resized, x, y);
        trace_event!("element_placed", x = x, y = y, width = fit_w, height = fit_h);
    }

    canvas
        .save(output)
        .map_err(|err| match image_error(output, err) {
            FrameMatchError::ImageDecode { path, reason } => {
                FrameMatchError::ImageEncode { path, reason }
            }
            other => other,
        })?;
    Ok(output.to_path_buf())
}
