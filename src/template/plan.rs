//! Template plan precomputation shared by every metric.

use crate::image::ImageView;
use crate::util::{FrameMatchError, FrameMatchResult};

/// Variance (sum of squared deviations) at or below which a template or
/// window is treated as flat.
pub(crate) const FLAT_EPS: f64 = 1e-8;

/// Precomputed statistics and pixel buffer for template matching.
pub struct TemplatePlan {
    width: usize,
    height: usize,
    data: Vec<f32>,
    sum: f64,
    sum_sq: f64,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    pub fn from_view(tpl: ImageView<'_, u8>) -> FrameMatchResult<Self> {
        let width = tpl.width();
        let height = tpl.height();
        let count = width
            .checked_mul(height)
            .ok_or(FrameMatchError::InvalidDimensions { width, height })?;

        let mut data = Vec::with_capacity(count);
        let mut sum = 0.0f64;
        let mut sum_sq = 0.0f64;
        for y in 0..height {
            let row = tpl.row(y).ok_or(FrameMatchError::BufferTooSmall {
                needed: y * tpl.stride() + width,
                got: tpl.as_slice().len(),
            })?;
            for &value in row {
                let v = f64::from(value);
                sum += v;
                sum_sq += v * v;
                data.push(f32::from(value));
            }
        }

        Ok(Self {
            width,
            height,
            data,
            sum,
            sum_sq,
        })
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the pixel count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the plan holds no pixels (never the case for a valid view).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the template pixels in row-major order.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the sum of template intensities.
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Returns the sum of squared template intensities.
    pub fn sum_sq(&self) -> f64 {
        self.sum_sq
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f64 {
        self.sum / self.data.len() as f64
    }

    /// Returns the sum of squared deviations from the mean.
    pub fn centered_energy(&self) -> f64 {
        (self.sum_sq - self.sum * self.sum / self.data.len() as f64).max(0.0)
    }

    /// Returns true if every template pixel has the same intensity.
    pub fn is_flat(&self) -> bool {
        self.centered_energy() <= FLAT_EPS
    }
}

#[cfg(test)]
mod tests {
    use super::TemplatePlan;
    use crate::ImageView;

    #[test]
    fn statistics_match_hand_computation() {
        let data = [10u8, 20, 30, 40];
        let view = ImageView::from_slice(&data, 2, 2).unwrap();
        let plan = TemplatePlan::from_view(view).unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.sum(), 100.0);
        assert_eq!(plan.sum_sq(), 3000.0);
        assert!((plan.mean() - 25.0).abs() < 1e-12);
        assert!((plan.centered_energy() - 500.0).abs() < 1e-9);
        assert!(!plan.is_flat());
    }

    #[test]
    fn solid_template_is_flat() {
        let data = [0u8; 9];
        let view = ImageView::from_slice(&data, 3, 3).unwrap();
        let plan = TemplatePlan::from_view(view).unwrap();
        assert!(plan.is_flat());
        assert_eq!(plan.sum_sq(), 0.0);
    }
}
