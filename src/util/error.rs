//! Error types for framematch.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for framematch operations.
pub type FrameMatchResult<T> = std::result::Result<T, FrameMatchError>;

/// Errors that can occur while matching templates or building feature tables.
///
/// Expected absence (a missing preview or template file) and a template that
/// cannot fit inside its scene are not errors; they are reported as
/// zero rows and [`crate::MatchOutcome::DoesNotFit`] respectively.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FrameMatchError {
    /// Image or template dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is too small for the requested view.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A low-level scan was asked to slide a template that does not fit.
    #[error(
        "template {template_width}x{template_height} does not fit in scene {scene_width}x{scene_height}"
    )]
    TemplateTooLarge {
        template_width: usize,
        template_height: usize,
        scene_width: usize,
        scene_height: usize,
    },
    /// Template and scene were decoded into different channel counts, or
    /// more channels than a scan supports.
    #[error("template has {template} channel(s) but scene has {scene}")]
    ChannelMismatch { template: usize, scene: usize },
    /// Planes of one multi-channel image differ in size.
    #[error("plane size {got:?} differs from {expected:?}")]
    PlaneMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// Image data could not be decoded.
    #[error("failed to decode image {}: {reason}", .path.display())]
    ImageDecode { path: PathBuf, reason: String },
    /// Image data could not be encoded or saved.
    #[error("failed to save image {}: {reason}", .path.display())]
    ImageEncode { path: PathBuf, reason: String },
    /// Filesystem access failed.
    #[error("i/o error at {}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
    /// The folder glob pattern is malformed.
    #[error("invalid glob pattern {pattern:?}: {reason}")]
    Pattern { pattern: String, reason: String },
    /// A feature table could not be written or read.
    #[error("feature table {}: {reason}", .path.display())]
    Csv { path: PathBuf, reason: String },
    /// An element placement record failed validation.
    #[error("invalid element placement: {reason}")]
    InvalidPlacement { reason: String },
    /// A storyboard strip was requested with no frames.
    #[error("storyboard needs at least one image")]
    EmptyStoryboard,
}

impl FrameMatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            reason: err.to_string(),
        }
    }
}
