//! Template search: locate a template inside a larger scene.
//!
//! The matcher slides the template over every integer offset of the scene,
//! scores each placement with the configured [`Metric`] and keeps the global
//! extremum. A template that does not fit inside its scene is not an error;
//! it yields [`MatchOutcome::DoesNotFit`].

mod metric;
mod response;
pub(crate) mod scan;

pub use metric::{Extremum, Metric};
pub use response::{MinMaxLoc, ResponseMap};

use crate::image::io::load_planar_image;
use crate::image::{ColorMode, ImageView, PlanarImage};
use crate::kernel::DefaultKernel;
use crate::template::{Template, TemplatePlan};
use crate::trace::{trace_event, trace_span, trace_warn};
use crate::util::{FrameMatchError, FrameMatchResult};
use std::path::Path;

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
}

impl Point {
    /// Creates a point.
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    pub const fn offset(self, dx: usize, dy: usize) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Configuration for template matching.
#[derive(Clone, Debug)]
pub struct MatchConfig {
    /// Scoring metric.
    pub metric: Metric,
    /// Scan response rows in parallel (requires the `rayon` feature).
    pub parallel: bool,
    /// Channels decoded by [`Matcher::match_files`].
    pub color: ColorMode,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            metric: Metric::CCoeffNormed,
            parallel: false,
            color: ColorMode::Rgb,
        }
    }
}

/// Best placement of a template inside a scene.
///
/// `bottom_right` is always `top_left + (template_width, template_height)`;
/// the fields are private so the two corners cannot drift apart.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateMatch {
    template_width: usize,
    template_height: usize,
    top_left: Point,
    bottom_right: Point,
    score: f32,
    metric: Metric,
    response: ResponseMap,
}

impl TemplateMatch {
    /// Derives the best placement from a response surface.
    ///
    /// This is the only constructor, shared by the matcher and by callers
    /// re-deriving a location from a cached surface.
    pub fn from_response(
        response: ResponseMap,
        metric: Metric,
        template_width: usize,
        template_height: usize,
    ) -> Self {
        let (top_left, score) = response.best_location(metric);
        Self {
            template_width,
            template_height,
            top_left,
            bottom_right: top_left.offset(template_width, template_height),
            score,
            metric,
            response,
        }
    }

    /// Returns the template width in pixels.
    pub fn template_width(&self) -> usize {
        self.template_width
    }

    /// Returns the template height in pixels.
    pub fn template_height(&self) -> usize {
        self.template_height
    }

    /// Returns the top-left corner of the best placement.
    pub fn top_left(&self) -> Point {
        self.top_left
    }

    /// Returns the exclusive bottom-right corner of the best placement.
    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    /// Returns the score at the best placement.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Returns the metric that produced the response surface.
    ///
    /// This differs from the configured metric when the template was
    /// degenerate for it (see [`Metric::degenerate_for`]).
    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Returns the full response surface.
    pub fn response(&self) -> &ResponseMap {
        &self.response
    }

    /// Consumes the match and returns its response surface.
    pub fn into_response(self) -> ResponseMap {
        self.response
    }
}

/// Result of matching one template against one scene.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchOutcome {
    /// The template fits and its best placement was found.
    Matched(TemplateMatch),
    /// The template is wider or taller than the scene; no scan was run.
    DoesNotFit {
        /// Template `(width, height)`.
        template: (usize, usize),
        /// Scene `(width, height)`.
        scene: (usize, usize),
    },
}

impl MatchOutcome {
    /// Returns the match, if any.
    pub fn matched(&self) -> Option<&TemplateMatch> {
        match self {
            MatchOutcome::Matched(m) => Some(m),
            MatchOutcome::DoesNotFit { .. } => None,
        }
    }

    /// Consumes the outcome and returns the match, if any.
    pub fn into_matched(self) -> Option<TemplateMatch> {
        match self {
            MatchOutcome::Matched(m) => Some(m),
            MatchOutcome::DoesNotFit { .. } => None,
        }
    }
}

/// Exhaustive template matcher.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    /// Creates a matcher with the given configuration.
    pub fn new(cfg: MatchConfig) -> Self {
        Self { cfg }
    }

    /// Returns the matcher configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Locates a single-plane `template` inside a single-plane `scene`.
    pub fn match_views(
        &self,
        template: ImageView<'_, u8>,
        scene: ImageView<'_, u8>,
    ) -> FrameMatchResult<MatchOutcome> {
        self.match_planes(std::slice::from_ref(&template), std::slice::from_ref(&scene))
    }

    /// Locates a decoded template inside a decoded scene.
    pub fn match_images(
        &self,
        template: &PlanarImage,
        scene: &PlanarImage,
    ) -> FrameMatchResult<MatchOutcome> {
        self.match_planes(&template.views(), &scene.views())
    }

    /// Locates a multi-channel template inside a scene with the same channels.
    ///
    /// Channel terms are summed per placement, so a template that differs
    /// from its surroundings only in hue is still found.
    pub fn match_planes(
        &self,
        template: &[ImageView<'_, u8>],
        scene: &[ImageView<'_, u8>],
    ) -> FrameMatchResult<MatchOutcome> {
        let (Some(first_tpl), Some(first_scene)) = (template.first(), scene.first()) else {
            return Err(FrameMatchError::ChannelMismatch {
                template: template.len(),
                scene: scene.len(),
            });
        };
        let tpl_width = first_tpl.width();
        let tpl_height = first_tpl.height();
        if !first_scene.fits(tpl_width, tpl_height) {
            return Ok(MatchOutcome::DoesNotFit {
                template: (tpl_width, tpl_height),
                scene: (first_scene.width(), first_scene.height()),
            });
        }

        let _span = trace_span!(
            "match_template",
            tpl_width = tpl_width,
            tpl_height = tpl_height,
            scene_width = first_scene.width(),
            scene_height = first_scene.height(),
            channels = template.len()
        )
        .entered();

        let plans = template
            .iter()
            .map(|&plane| TemplatePlan::from_view(plane))
            .collect::<FrameMatchResult<Vec<_>>>()?;
        let mut metric = self.cfg.metric;
        if metric.degenerate_for_planes(&plans) {
            trace_warn!(
                "template {}x{} is degenerate for {:?}; scoring with SqDiff",
                tpl_width,
                tpl_height,
                metric
            );
            metric = Metric::SqDiff;
        }

        let response = self.scan(scene, &plans, metric)?;
        let found = TemplateMatch::from_response(response, metric, tpl_width, tpl_height);
        trace_event!(
            "best_match",
            x = found.top_left().x,
            y = found.top_left().y,
            score = found.score()
        );
        Ok(MatchOutcome::Matched(found))
    }

    /// Decodes both images from disk in the configured [`ColorMode`] and
    /// locates the template in the scene.
    ///
    /// Decode and I/O failures are returned as errors; they never collapse
    /// into [`MatchOutcome::DoesNotFit`].
    pub fn match_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        template_path: P,
        scene_path: Q,
    ) -> FrameMatchResult<MatchOutcome> {
        let template = Template::load(template_path, self.cfg.color)?;
        let scene = load_planar_image(scene_path, self.cfg.color)?;
        self.match_images(template.planes(), &scene)
    }

    #[cfg(feature = "rayon")]
    fn scan(
        &self,
        scene: &[ImageView<'_, u8>],
        plans: &[TemplatePlan],
        metric: Metric,
    ) -> FrameMatchResult<ResponseMap> {
        if self.cfg.parallel {
            crate::kernel::rayon::scan_planes_par::<DefaultKernel>(scene, plans, metric)
        } else {
            scan::scan_planes::<DefaultKernel>(scene, plans, metric)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn scan(
        &self,
        scene: &[ImageView<'_, u8>],
        plans: &[TemplatePlan],
        metric: Metric,
    ) -> FrameMatchResult<ResponseMap> {
        scan::scan_planes::<DefaultKernel>(scene, plans, metric)
    }
}
