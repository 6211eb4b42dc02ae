//! FrameMatch locates overlay elements in rendered advertisement frames.
//!
//! The core is an exhaustive template matcher with six squared-difference and
//! correlation metrics. A batch pipeline drives it over an asset corpus and
//! writes one CSV feature table per overlay segment. Frame composition helpers
//! place generated assets onto a background canvas.
//!
//! Optional features: `rayon` (parallel scans and folder processing), `simd`
//! (vectorized window accumulation) and `tracing` (spans and events).

pub mod analysis;
pub mod compose;
pub mod features;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod search;
pub mod template;
mod trace;
pub mod util;

pub use crate::image::{ColorMode, ImageView, OwnedImage, PlanarImage};
pub use features::{
    ExtractionReport, ExtractorConfig, ExtractorPipeline, FeatureRow, FeatureTable, Segment,
};
pub use search::{
    Extremum, MatchConfig, MatchOutcome, Matcher, Metric, Point, ResponseMap, TemplateMatch,
};
pub use template::Template;
pub use util::{FrameMatchError, FrameMatchResult};

/// Image loading helpers.
pub mod io {
    pub use crate::image::io::*;
}
