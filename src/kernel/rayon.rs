//! Rayon-parallel scan (feature-gated).
//!
//! Rows of the response surface are independent, so each thread fills whole
//! rows and the output is identical to the sequential scan.

use crate::kernel::Kernel;
use crate::search::scan::{check_planes, response_dims, score_placement};
use crate::search::{Metric, ResponseMap};
use crate::template::TemplatePlan;
use crate::util::FrameMatchResult;
use crate::ImageView;
use rayon::prelude::*;

/// Row-parallel full scan with kernel `K`.
pub fn scan_full_par<K: Kernel>(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    metric: Metric,
) -> FrameMatchResult<ResponseMap> {
    scan_planes_par::<K>(std::slice::from_ref(&image), std::slice::from_ref(tpl), metric)
}

/// Row-parallel multi-channel scan with kernel `K`.
pub fn scan_planes_par<K: Kernel>(
    images: &[ImageView<'_, u8>],
    plans: &[TemplatePlan],
    metric: Metric,
) -> FrameMatchResult<ResponseMap> {
    check_planes(images, plans)?;
    let (out_width, out_height) = response_dims(images[0], &plans[0])?;

    let mut data = vec![0.0f32; out_width * out_height];
    data.par_chunks_mut(out_width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, slot) in row.iter_mut().enumerate() {
                *slot = score_placement::<K>(images, plans, metric, x, y);
            }
        });

    Ok(ResponseMap::from_vec(data, out_width, out_height))
}
