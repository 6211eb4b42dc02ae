//! SIMD-accelerated window accumulation using the `wide` crate.
//!
//! The inner template row loop is vectorized to process 8 pixels at a time
//! using `f32x8`. Lane accumulators are flushed into `f64` after every row,
//! which keeps integer intensity sums exact for rows up to ~2000 pixels.

use crate::kernel::{window_row, Kernel, WindowSums};
use crate::template::TemplatePlan;
use crate::ImageView;
use wide::f32x8;

const LANES: usize = 8;

/// Load 8 u8 values and convert to f32x8.
#[inline]
fn load_u8x8_as_f32x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}

/// Load 8 f32 values into f32x8.
#[inline]
fn load_f32x8(slice: &[f32]) -> f32x8 {
    f32x8::from([
        slice[0], slice[1], slice[2], slice[3], slice[4], slice[5], slice[6], slice[7],
    ])
}

/// Horizontal sum of f32x8.
#[inline]
fn hsum(v: f32x8) -> f64 {
    v.to_array().iter().map(|&lane| f64::from(lane)).sum()
}

/// SIMD window accumulation.
pub struct Simd;

impl Kernel for Simd {
    fn window_sums(
        image: ImageView<'_, u8>,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
    ) -> WindowSums {
        let tpl_width = plan.width();
        let tpl = plan.data();
        let simd_end = tpl_width / LANES * LANES;

        let mut sums = WindowSums::default();
        for ty in 0..plan.height() {
            let img_row = window_row(image, x, y, ty, tpl_width);
            let tpl_row = &tpl[ty * tpl_width..(ty + 1) * tpl_width];

            let mut cross_vec = f32x8::ZERO;
            let mut sum_i_vec = f32x8::ZERO;
            let mut sum_i2_vec = f32x8::ZERO;

            let mut tx = 0;
            while tx < simd_end {
                let img_vals = load_u8x8_as_f32x8(&img_row[tx..]);
                let tpl_vals = load_f32x8(&tpl_row[tx..]);
                cross_vec += tpl_vals * img_vals;
                sum_i_vec += img_vals;
                sum_i2_vec += img_vals * img_vals;
                tx += LANES;
            }

            sums.cross += hsum(cross_vec);
            sums.sum_i += hsum(sum_i_vec);
            sums.sum_i2 += hsum(sum_i2_vec);

            // Scalar remainder
            while tx < tpl_width {
                let v = f64::from(img_row[tx]);
                sums.cross += f64::from(tpl_row[tx]) * v;
                sums.sum_i += v;
                sums.sum_i2 += v * v;
                tx += 1;
            }
        }
        sums
    }
}
