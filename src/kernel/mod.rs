//! Per-window accumulation kernels.
//!
//! A kernel only produces raw sums for one template placement; turning sums
//! into a score is the metric's job (see [`crate::Metric::score`]).

use crate::search::Metric;
use crate::template::TemplatePlan;
use crate::ImageView;

/// Raw sums over one template-sized scene window.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WindowSums {
    /// Sum of template * scene products.
    pub cross: f64,
    /// Sum of scene intensities.
    pub sum_i: f64,
    /// Sum of squared scene intensities.
    pub sum_i2: f64,
}

/// Kernel trait for window accumulation.
pub trait Kernel {
    /// Accumulates sums for the placement with top-left corner `(x, y)`.
    ///
    /// The caller guarantees the placement lies inside `image`.
    fn window_sums(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize)
        -> WindowSums;

    /// Scores a single placement, or `None` if it falls outside the scene.
    fn score_at(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        metric: Metric,
        x: usize,
        y: usize,
    ) -> Option<f32> {
        if !image.fits(plan.width(), plan.height()) {
            return None;
        }
        if x > image.width() - plan.width() || y > image.height() - plan.height() {
            return None;
        }
        Some(metric.score(plan, Self::window_sums(image, plan, x, y)))
    }
}

/// Returns the scene row segment under template row `ty` at placement `(x, y)`.
#[inline]
pub(crate) fn window_row<'a>(
    image: ImageView<'a, u8>,
    x: usize,
    y: usize,
    ty: usize,
    width: usize,
) -> &'a [u8] {
    let start = (y + ty) * image.stride() + x;
    &image.as_slice()[start..start + width]
}

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

/// Kernel used by the matcher: SIMD when the `simd` feature is enabled.
#[cfg(not(feature = "simd"))]
pub type DefaultKernel = scalar::Scalar;

/// Kernel used by the matcher: SIMD when the `simd` feature is enabled.
#[cfg(feature = "simd")]
pub type DefaultKernel = simd::Simd;
