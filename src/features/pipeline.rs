//! Batch extraction of segment placements over an asset corpus.

use crate::features::enumerate::{enumerate_folders, AssetFolder};
use crate::features::segment::Segment;
use crate::features::table::{FeatureRow, FeatureTable};
use crate::search::{MatchConfig, MatchOutcome, Matcher};
use crate::trace::{trace_error, trace_event, trace_span};
use crate::util::{FrameMatchError, FrameMatchResult};
use std::path::{Path, PathBuf};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Scene image expected in every asset folder.
pub const PREVIEW_FILE: &str = "_preview.png";

/// Name of the directory that receives the feature tables.
pub const FEATURES_DIR: &str = "extracted_features";

/// Configuration for an extraction run.
#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    /// Glob pattern selecting asset folders, e.g. `data/assets/*`.
    pub assets_pattern: String,
    /// Output directory; defaults to [`default_output_dir`] of the pattern.
    pub output_dir: Option<PathBuf>,
    /// Segments processed by [`ExtractorPipeline::extract_all`].
    pub segments: Vec<Segment>,
    /// Matcher settings.
    pub match_cfg: MatchConfig,
    /// Process folders in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            assets_pattern: String::new(),
            output_dir: None,
            segments: Segment::builtin(),
            match_cfg: MatchConfig::default(),
            parallel: false,
        }
    }
}

/// Returns `<parent of assets root>/extracted_features`, where the assets
/// root is the directory part of the glob pattern.
pub fn default_output_dir(assets_pattern: &str) -> PathBuf {
    let root = Path::new(assets_pattern).parent().unwrap_or(Path::new(""));
    root.parent().unwrap_or(Path::new("")).join(FEATURES_DIR)
}

/// A folder whose row degraded to zeros because processing failed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderFailure {
    /// Folder id.
    pub id: String,
    /// The error that was isolated.
    pub error: FrameMatchError,
}

/// Outcome of extracting one segment.
#[derive(Clone, Debug)]
pub struct ExtractionReport {
    /// The segment that was extracted.
    pub segment: Segment,
    /// One row per folder, in enumeration order.
    pub table: FeatureTable,
    /// Where the table was written.
    pub output_path: PathBuf,
    /// Folders with a populated row.
    pub matched: usize,
    /// Folders lacking the preview or the template.
    pub missing_inputs: usize,
    /// Folders whose template was larger than the preview.
    pub infeasible: usize,
    /// Folders whose processing failed.
    pub failures: Vec<FolderFailure>,
}

enum FolderStatus {
    Matched,
    MissingInputs,
    Infeasible,
    Failed(FrameMatchError),
}

/// Builds one feature table per segment from an asset corpus.
pub struct ExtractorPipeline {
    cfg: ExtractorConfig,
    output_dir: PathBuf,
    matcher: Matcher,
}

impl ExtractorPipeline {
    /// Creates a pipeline; nothing touches the filesystem until extraction.
    pub fn new(cfg: ExtractorConfig) -> Self {
        let output_dir = cfg
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(&cfg.assets_pattern));
        let matcher = Matcher::new(cfg.match_cfg.clone());
        Self {
            cfg,
            output_dir,
            matcher,
        }
    }

    /// Returns the directory receiving the tables.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.cfg
    }

    /// Extracts every configured segment, writing one table each.
    pub fn extract_all(&self) -> FrameMatchResult<Vec<ExtractionReport>> {
        self.cfg
            .segments
            .iter()
            .map(|segment| self.extract_segment(segment))
            .collect()
    }

    /// Extracts one segment over every enumerated folder and writes its table.
    ///
    /// Every folder yields exactly one row. Missing inputs, an oversized
    /// template, or a per-folder failure all produce the zero row; failures
    /// are listed in the report instead of aborting the run.
    pub fn extract_segment(&self, segment: &Segment) -> FrameMatchResult<ExtractionReport> {
        let _span = trace_span!("extract_segment", segment = segment.prefix()).entered();

        std::fs::create_dir_all(&self.output_dir)
            .map_err(|err| FrameMatchError::io(&self.output_dir, &err))?;
        let folders = enumerate_folders(&self.cfg.assets_pattern)?;

        let results = self.process_folders(&folders, segment);

        let mut rows = Vec::with_capacity(results.len());
        let mut matched = 0;
        let mut missing_inputs = 0;
        let mut infeasible = 0;
        let mut failures = Vec::new();
        for (folder, (row, status)) in folders.iter().zip(results) {
            match status {
                FolderStatus::Matched => matched += 1,
                FolderStatus::MissingInputs => missing_inputs += 1,
                FolderStatus::Infeasible => infeasible += 1,
                FolderStatus::Failed(error) => {
                    trace_error!("folder {} ({}): {}", folder.id(), segment.prefix(), error);
                    failures.push(FolderFailure {
                        id: folder.id().to_owned(),
                        error,
                    });
                }
            }
            rows.push(row);
        }

        let table = FeatureTable::new(segment.prefix(), rows);
        let output_path = self.output_dir.join(segment.output_file());
        table.write_csv(&output_path)?;

        trace_event!(
            "segment_extracted",
            folders = folders.len(),
            matched = matched,
            missing_inputs = missing_inputs,
            infeasible = infeasible,
            failed = failures.len()
        );

        Ok(ExtractionReport {
            segment: segment.clone(),
            table,
            output_path,
            matched,
            missing_inputs,
            infeasible,
            failures,
        })
    }

    #[cfg(feature = "rayon")]
    fn process_folders(
        &self,
        folders: &[AssetFolder],
        segment: &Segment,
    ) -> Vec<(FeatureRow, FolderStatus)> {
        if self.cfg.parallel {
            folders
                .par_iter()
                .map(|folder| self.process_folder(folder, segment))
                .collect()
        } else {
            folders
                .iter()
                .map(|folder| self.process_folder(folder, segment))
                .collect()
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn process_folders(
        &self,
        folders: &[AssetFolder],
        segment: &Segment,
    ) -> Vec<(FeatureRow, FolderStatus)> {
        folders
            .iter()
            .map(|folder| self.process_folder(folder, segment))
            .collect()
    }

    fn process_folder(
        &self,
        folder: &AssetFolder,
        segment: &Segment,
    ) -> (FeatureRow, FolderStatus) {
        let scene = folder.file(PREVIEW_FILE);
        let template = folder.file(segment.template_file());
        if !scene.is_file() || !template.is_file() {
            return (FeatureRow::zero(folder.id()), FolderStatus::MissingInputs);
        }

        match self.matcher.match_files(&template, &scene) {
            Ok(MatchOutcome::Matched(found)) => {
                (FeatureRow::from_match(folder.id(), &found), FolderStatus::Matched)
            }
            Ok(MatchOutcome::DoesNotFit { .. }) => {
                (FeatureRow::zero(folder.id()), FolderStatus::Infeasible)
            }
            Err(err) => (FeatureRow::zero(folder.id()), FolderStatus::Failed(err)),
        }
    }
}
