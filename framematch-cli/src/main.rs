use clap::{Parser, Subcommand, ValueEnum};
use framematch::compose::{
    combine_horizontally, compose_frame, ElementPlacement, StoryboardLayout,
};
use framematch::{
    ColorMode, ExtractionReport, ExtractorConfig, ExtractorPipeline, MatchConfig, MatchOutcome,
    Matcher, Metric, Point, Segment,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "FrameMatch CLI (overlay feature extraction and frame composition)"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Print the extraction config JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example extraction config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long, global = true)]
    trace: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build one feature table per segment over an asset corpus.
    Extract {
        /// Path to the JSON configuration file.
        #[arg(short, long, value_name = "FILE", default_value = "config.json")]
        config: PathBuf,
    },
    /// Locate one template inside one scene and print the placement.
    Match {
        /// Template image.
        #[arg(long, value_name = "FILE")]
        template: PathBuf,
        /// Scene image.
        #[arg(long, value_name = "FILE")]
        scene: PathBuf,
        /// Scoring metric.
        #[arg(long, value_enum, default_value_t = MetricConfig::CcoeffNormed)]
        metric: MetricConfig,
        /// Channels compared when scoring.
        #[arg(long, value_enum, default_value_t = ColorConfig::Rgb)]
        color: ColorConfig,
        /// Scan response rows in parallel.
        #[arg(long)]
        parallel: bool,
    },
    /// Place generated elements onto a background frame.
    Compose {
        /// Background image.
        #[arg(long, value_name = "FILE")]
        background: PathBuf,
        /// JSON array of element placements.
        #[arg(long, value_name = "FILE")]
        elements: PathBuf,
        /// Output image (defaults to overwriting the background).
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Lay frames side by side into one storyboard image.
    Storyboard {
        /// Output image.
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
        /// Gap between frames in pixels.
        #[arg(long, default_value_t = 100)]
        separation: u32,
        /// Margin around the strip in pixels.
        #[arg(long, default_value_t = 200)]
        padding: u32,
        /// Frames in display order.
        #[arg(required = true)]
        frames: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
enum MetricConfig {
    Sqdiff,
    SqdiffNormed,
    Ccorr,
    CcorrNormed,
    Ccoeff,
    #[default]
    CcoeffNormed,
}

impl From<MetricConfig> for Metric {
    fn from(value: MetricConfig) -> Self {
        match value {
            MetricConfig::Sqdiff => Metric::SqDiff,
            MetricConfig::SqdiffNormed => Metric::SqDiffNormed,
            MetricConfig::Ccorr => Metric::CCorr,
            MetricConfig::CcorrNormed => Metric::CCorrNormed,
            MetricConfig::Ccoeff => Metric::CCoeff,
            MetricConfig::CcoeffNormed => Metric::CCoeffNormed,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
enum ColorConfig {
    #[default]
    Rgb,
    Luma,
}

impl From<ColorConfig> for ColorMode {
    fn from(value: ColorConfig) -> Self {
        match value {
            ColorConfig::Rgb => ColorMode::Rgb,
            ColorConfig::Luma => ColorMode::Luma,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MatchConfigJson {
    metric: MetricConfig,
    parallel: bool,
    color: ColorConfig,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            metric: MetricConfig::CcoeffNormed,
            parallel: cfg.parallel,
            color: ColorConfig::Rgb,
        }
    }
}

impl From<MatchConfigJson> for MatchConfig {
    fn from(value: MatchConfigJson) -> Self {
        Self {
            metric: value.metric.into(),
            parallel: value.parallel,
            color: value.color.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    assets_pattern: String,
    output_dir: Option<String>,
    segments: Vec<String>,
    parallel: bool,
    #[serde(rename = "match")]
    match_cfg: MatchConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        let cfg = ExtractorConfig::default();
        Self {
            assets_pattern: String::new(),
            output_dir: None,
            segments: cfg
                .segments
                .iter()
                .map(|segment| segment.prefix().to_owned())
                .collect(),
            parallel: cfg.parallel,
            match_cfg: MatchConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct FailureRecord {
    id: String,
    error: String,
}

#[derive(Debug, Serialize)]
struct ReportRecord {
    segment: String,
    output_path: String,
    rows: usize,
    matched: usize,
    missing_inputs: usize,
    infeasible: usize,
    failures: Vec<FailureRecord>,
}

impl From<ExtractionReport> for ReportRecord {
    fn from(value: ExtractionReport) -> Self {
        Self {
            segment: value.segment.prefix().to_owned(),
            output_path: value.output_path.display().to_string(),
            rows: value.table.rows().len(),
            matched: value.matched,
            missing_inputs: value.missing_inputs,
            infeasible: value.infeasible,
            failures: value
                .failures
                .into_iter()
                .map(|failure| FailureRecord {
                    id: failure.id,
                    error: failure.error.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PointRecord {
    x: usize,
    y: usize,
}

impl From<Point> for PointRecord {
    fn from(value: Point) -> Self {
        Self {
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    template_width: usize,
    template_height: usize,
    top_left: Option<PointRecord>,
    bottom_right: Option<PointRecord>,
    score: Option<f32>,
    metric: Option<String>,
}

impl From<MatchOutcome> for MatchRecord {
    fn from(value: MatchOutcome) -> Self {
        match value {
            MatchOutcome::Matched(found) => Self {
                template_width: found.template_width(),
                template_height: found.template_height(),
                top_left: Some(found.top_left().into()),
                bottom_right: Some(found.bottom_right().into()),
                score: Some(found.score()),
                metric: Some(format!("{:?}", found.metric())),
            },
            MatchOutcome::DoesNotFit { template, .. } => Self {
                template_width: template.0,
                template_height: template.1,
                top_left: None,
                bottom_right: None,
                score: None,
                metric: None,
            },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("framematch=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    match cli.command {
        Some(Command::Extract { config }) => run_extract(config),
        Some(Command::Match {
            template,
            scene,
            metric,
            color,
            parallel,
        }) => {
            let matcher = Matcher::new(MatchConfig {
                metric: metric.into(),
                parallel,
                color: color.into(),
            });
            let outcome = matcher.match_files(&template, &scene)?;
            let record = MatchRecord::from(outcome);
            println!("{}", serde_json::to_string_pretty(&record)?);
            Ok(())
        }
        Some(Command::Compose {
            background,
            elements,
            output,
        }) => {
            let elements = ElementPlacement::parse_list(&fs::read_to_string(&elements)?)?;
            let output = output.unwrap_or_else(|| background.clone());
            let written = compose_frame(&background, &elements, &output)?;
            println!("{}", written.display());
            Ok(())
        }
        Some(Command::Storyboard {
            output,
            separation,
            padding,
            frames,
        }) => {
            let layout = StoryboardLayout {
                separation,
                padding,
                ..StoryboardLayout::default()
            };
            combine_horizontally(&frames, layout)?.save(&output)?;
            println!("{}", output.display());
            Ok(())
        }
        None => Err("a subcommand is required (see --help)".into()),
    }
}

fn run_extract(config_path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config_text = fs::read_to_string(&config_path)?;
    let pipeline = ExtractorPipeline::new(parse_config(&config_text)?);

    let reports: Vec<ReportRecord> = pipeline
        .extract_all()?
        .into_iter()
        .map(ReportRecord::from)
        .collect();
    println!("{}", serde_json::to_string_pretty(&reports)?);
    Ok(())
}

fn parse_config(text: &str) -> Result<ExtractorConfig, Box<dyn std::error::Error>> {
    let config: Config = serde_json::from_str(text)?;
    if config.assets_pattern.is_empty() {
        return Err("assets_pattern must be set in the config".into());
    }
    if config.segments.is_empty() {
        return Err("segments must name at least one segment".into());
    }

    Ok(ExtractorConfig {
        assets_pattern: config.assets_pattern,
        output_dir: config.output_dir.map(PathBuf::from),
        segments: config.segments.iter().map(|name| Segment::from_name(name)).collect(),
        match_cfg: config.match_cfg.into(),
        parallel: config.parallel,
    })
}
