//! Similarity and difference metrics for template placement.
//!
//! Every metric is computed from the same per-window sums (see
//! [`WindowSums`]) plus the template plan. Difference metrics are minimized,
//! similarity metrics are maximized; [`Metric::extremum`] is the single place
//! that decides which.

use crate::kernel::WindowSums;
use crate::template::plan::FLAT_EPS;
use crate::template::TemplatePlan;

/// Which extremum of the response surface marks the best placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extremum {
    /// Lower scores are better.
    Min,
    /// Higher scores are better.
    Max,
}

/// Scoring metric used to compare the template against a scene window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Sum of squared differences.
    SqDiff,
    /// Sum of squared differences over the geometric mean of both energies.
    SqDiffNormed,
    /// Raw cross-correlation.
    CCorr,
    /// Cross-correlation over the geometric mean of both energies.
    CCorrNormed,
    /// Cross-correlation of mean-subtracted template and window.
    CCoeff,
    /// Zero-mean normalized cross-correlation, in `[-1, 1]`.
    #[default]
    CCoeffNormed,
}

impl Metric {
    /// All metrics, difference metrics first.
    pub const ALL: [Metric; 6] = [
        Metric::SqDiff,
        Metric::SqDiffNormed,
        Metric::CCorr,
        Metric::CCorrNormed,
        Metric::CCoeff,
        Metric::CCoeffNormed,
    ];

    /// Returns the extremum that marks the best placement for this metric.
    pub fn extremum(self) -> Extremum {
        match self {
            Metric::SqDiff | Metric::SqDiffNormed => Extremum::Min,
            Metric::CCorr | Metric::CCorrNormed | Metric::CCoeff | Metric::CCoeffNormed => {
                Extremum::Max
            }
        }
    }

    /// Returns true if `candidate` is strictly better than `current`.
    pub fn is_better(self, candidate: f32, current: f32) -> bool {
        match self.extremum() {
            Extremum::Min => candidate < current,
            Extremum::Max => candidate > current,
        }
    }

    /// Returns true if this metric cannot discriminate placements for `plan`.
    ///
    /// Coefficient metrics are undefined for a flat template; plain
    /// correlation is undefined for an all-black one.
    pub fn degenerate_for(self, plan: &TemplatePlan) -> bool {
        self.degenerate_for_planes(std::slice::from_ref(plan))
    }

    /// Multi-channel form of [`Metric::degenerate_for`]: a template is only
    /// flat if every channel is.
    pub fn degenerate_for_planes(self, plans: &[TemplatePlan]) -> bool {
        match self {
            Metric::CCoeff | Metric::CCoeffNormed => {
                plans.iter().map(TemplatePlan::centered_energy).sum::<f64>() <= FLAT_EPS
            }
            Metric::CCorr | Metric::CCorrNormed => {
                plans.iter().map(TemplatePlan::sum_sq).sum::<f64>() <= FLAT_EPS
            }
            Metric::SqDiff | Metric::SqDiffNormed => false,
        }
    }

    /// Turns per-window sums into this metric's score.
    ///
    /// Windows whose normalizer vanishes score the neutral value: `0` for
    /// correlation metrics and `1` for `SqDiffNormed`, except an exact match
    /// which scores `0`.
    pub fn score(self, plan: &TemplatePlan, sums: WindowSums) -> f32 {
        self.score_planes(std::slice::from_ref(plan), std::slice::from_ref(&sums))
    }

    /// Scores one placement from per-channel plans and sums.
    ///
    /// Every term is summed over channels; coefficient metrics centre each
    /// channel on its own mean before summing.
    pub fn score_planes(self, plans: &[TemplatePlan], sums: &[WindowSums]) -> f32 {
        let totals = ChannelTotals::accumulate(plans, sums);
        let value = match self {
            Metric::SqDiff => totals.sq_diff,
            Metric::SqDiffNormed => {
                let denom = (totals.energy_t * totals.energy_i).sqrt();
                if totals.sq_diff <= FLAT_EPS {
                    0.0
                } else if denom <= FLAT_EPS {
                    1.0
                } else {
                    totals.sq_diff / denom
                }
            }
            Metric::CCorr => totals.cross,
            Metric::CCorrNormed => {
                let denom = (totals.energy_t * totals.energy_i).sqrt();
                if denom <= FLAT_EPS {
                    0.0
                } else {
                    (totals.cross / denom).clamp(-1.0, 1.0)
                }
            }
            Metric::CCoeff => totals.centred_cross,
            Metric::CCoeffNormed => {
                if totals.var_i <= FLAT_EPS || totals.var_t <= FLAT_EPS {
                    0.0
                } else {
                    (totals.centred_cross / (totals.var_t * totals.var_i).sqrt()).clamp(-1.0, 1.0)
                }
            }
        };
        value as f32
    }
}

/// Per-placement terms summed over channels.
#[derive(Default)]
struct ChannelTotals {
    sq_diff: f64,
    cross: f64,
    energy_t: f64,
    energy_i: f64,
    centred_cross: f64,
    var_t: f64,
    var_i: f64,
}

impl ChannelTotals {
    fn accumulate(plans: &[TemplatePlan], sums: &[WindowSums]) -> Self {
        let mut totals = Self::default();
        for (plan, &window) in plans.iter().zip(sums) {
            let n = plan.len() as f64;
            totals.sq_diff += sq_diff(plan, window);
            totals.cross += window.cross;
            totals.energy_t += plan.sum_sq();
            totals.energy_i += window.sum_i2;
            totals.centred_cross += window.cross - plan.mean() * window.sum_i;
            totals.var_t += plan.centered_energy();
            totals.var_i += (window.sum_i2 - window.sum_i * window.sum_i / n).max(0.0);
        }
        totals
    }
}

fn sq_diff(plan: &TemplatePlan, sums: WindowSums) -> f64 {
    (sums.sum_i2 - 2.0 * sums.cross + plan.sum_sq()).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::{Extremum, Metric};
    use crate::kernel::WindowSums;
    use crate::template::TemplatePlan;
    use crate::ImageView;

    fn plan(data: &[u8], width: usize, height: usize) -> TemplatePlan {
        TemplatePlan::from_view(ImageView::from_slice(data, width, height).unwrap()).unwrap()
    }

    fn sums(window: &[u8], tpl: &[u8]) -> WindowSums {
        let mut out = WindowSums::default();
        for (&i, &t) in window.iter().zip(tpl) {
            let (i, t) = (f64::from(i), f64::from(t));
            out.cross += i * t;
            out.sum_i += i;
            out.sum_i2 += i * i;
        }
        out
    }

    #[test]
    fn difference_metrics_minimize() {
        assert_eq!(Metric::SqDiff.extremum(), Extremum::Min);
        assert_eq!(Metric::SqDiffNormed.extremum(), Extremum::Min);
        assert!(Metric::SqDiff.is_better(1.0, 2.0));
        assert!(!Metric::SqDiffNormed.is_better(2.0, 1.0));
    }

    #[test]
    fn similarity_metrics_maximize() {
        for metric in [
            Metric::CCorr,
            Metric::CCorrNormed,
            Metric::CCoeff,
            Metric::CCoeffNormed,
        ] {
            assert_eq!(metric.extremum(), Extremum::Max, "{metric:?}");
            assert!(metric.is_better(2.0, 1.0));
            assert!(!metric.is_better(1.0, 1.0));
        }
    }

    #[test]
    fn identical_window_scores_perfectly() {
        let tpl = [10u8, 50, 90, 130];
        let p = plan(&tpl, 2, 2);
        let s = sums(&tpl, &tpl);
        assert_eq!(Metric::SqDiff.score(&p, s), 0.0);
        assert_eq!(Metric::SqDiffNormed.score(&p, s), 0.0);
        assert!((Metric::CCorrNormed.score(&p, s) - 1.0).abs() < 1e-6);
        assert!((Metric::CCoeffNormed.score(&p, s) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn inverted_window_is_anticorrelated() {
        let tpl = [0u8, 255, 0, 255];
        let window = [255u8, 0, 255, 0];
        let p = plan(&tpl, 2, 2);
        let s = sums(&window, &tpl);
        assert!((Metric::CCoeffNormed.score(&p, s) + 1.0).abs() < 1e-6);
        assert_eq!(Metric::CCorrNormed.score(&p, s), 0.0);
    }

    #[test]
    fn flat_window_scores_neutral() {
        let tpl = [0u8, 255, 0, 255];
        let window = [7u8; 4];
        let p = plan(&tpl, 2, 2);
        let s = sums(&window, &tpl);
        assert_eq!(Metric::CCoeffNormed.score(&p, s), 0.0);
    }

    #[test]
    fn degenerate_templates_are_detected() {
        let black = plan(&[0u8; 4], 2, 2);
        let grey = plan(&[128u8; 4], 2, 2);
        assert!(Metric::CCoeffNormed.degenerate_for(&black));
        assert!(Metric::CCoeff.degenerate_for(&grey));
        assert!(Metric::CCorrNormed.degenerate_for(&black));
        assert!(!Metric::CCorrNormed.degenerate_for(&grey));
        assert!(!Metric::SqDiff.degenerate_for(&black));
    }

    #[test]
    fn hue_only_template_is_not_flat_across_channels() {
        // Red and green squares of equal luma.
        let red = plan(&[198, 0, 198, 0], 2, 2);
        let green = plan(&[0, 59, 0, 59], 2, 2);
        let blue = plan(&[0; 4], 2, 2);
        let planes = [red, green, blue];
        assert!(!Metric::CCoeffNormed.degenerate_for_planes(&planes));
        assert!(!Metric::CCorrNormed.degenerate_for_planes(&planes));

        let luma = plan(&[42; 4], 2, 2);
        assert!(Metric::CCoeffNormed.degenerate_for(&luma));
    }

    #[test]
    fn channel_terms_are_summed_before_normalizing() {
        let tpl = [10u8, 50, 90, 130];
        let window = [20u8, 40, 100, 120];
        let p = plan(&tpl, 2, 2);
        let s = sums(&window, &tpl);
        let three = [plan(&tpl, 2, 2), plan(&tpl, 2, 2), plan(&tpl, 2, 2)];
        let sums3 = [s, s, s];

        for metric in [Metric::SqDiffNormed, Metric::CCorrNormed, Metric::CCoeffNormed] {
            let single = metric.score(&p, s);
            let stacked = metric.score_planes(&three, &sums3);
            assert!((single - stacked).abs() < 1e-6, "{metric:?}");
        }
        for metric in [Metric::SqDiff, Metric::CCorr, Metric::CCoeff] {
            let single = metric.score(&p, s);
            let stacked = metric.score_planes(&three, &sums3);
            assert!((3.0 * single - stacked).abs() < 1e-2, "{metric:?}");
        }
    }

    #[test]
    fn each_channel_is_centred_on_its_own_mean() {
        // Channel means differ; the window matches the template exactly, so
        // the per-channel centred correlation is perfect.
        let bright = [200u8, 220, 240, 210];
        let dark = [0u8, 30, 10, 20];
        let planes = [plan(&bright, 2, 2), plan(&dark, 2, 2)];
        let windows = [sums(&bright, &bright), sums(&dark, &dark)];
        let score = Metric::CCoeffNormed.score_planes(&planes, &windows);
        assert!((score - 1.0).abs() < 1e-6);
    }
}
