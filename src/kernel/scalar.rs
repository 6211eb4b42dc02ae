//! Scalar reference kernel.

use crate::kernel::{window_row, Kernel, WindowSums};
use crate::template::TemplatePlan;
use crate::ImageView;

/// Scalar window accumulation, usable for every metric.
pub struct Scalar;

impl Kernel for Scalar {
    fn window_sums(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
    ) -> WindowSums {
        let tpl_width = plan.width();
        let tpl = plan.data();

        let mut sums = WindowSums::default();
        for ty in 0..plan.height() {
            let img_row = window_row(image, x, y, ty, tpl_width);
            let tpl_row = &tpl[ty * tpl_width..(ty + 1) * tpl_width];
            for (&value, &t) in img_row.iter().zip(tpl_row) {
                let v = f64::from(value);
                sums.cross += f64::from(t) * v;
                sums.sum_i += v;
                sums.sum_i2 += v * v;
            }
        }
        sums
    }
}
