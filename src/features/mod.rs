//! Feature tables: where each overlay segment sits in each preview frame.
//!
//! The pipeline enumerates asset folders, matches `<segment>.png` against
//! `_preview.png` in each one, and writes one CSV per segment with exactly one
//! row per folder.

mod enumerate;
mod pipeline;
mod segment;
mod table;

pub use enumerate::{enumerate_folders, AssetFolder};
pub use pipeline::{
    default_output_dir, ExtractionReport, ExtractorConfig, ExtractorPipeline, FolderFailure,
    FEATURES_DIR, PREVIEW_FILE,
};
pub use segment::Segment;
pub use table::{FeatureRow, FeatureTable};
