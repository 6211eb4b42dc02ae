//! Dense scan over every template placement.

use crate::kernel::{Kernel, WindowSums};
use crate::search::{Metric, ResponseMap};
use crate::template::TemplatePlan;
use crate::util::{FrameMatchError, FrameMatchResult};
use crate::ImageView;

/// Returns the response surface size for a template inside a scene.
pub(crate) fn response_dims(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
) -> FrameMatchResult<(usize, usize)> {
    let img_width = image.width();
    let img_height = image.height();
    let tpl_width = tpl.width();
    let tpl_height = tpl.height();
    if !image.fits(tpl_width, tpl_height) {
        return Err(FrameMatchError::TemplateTooLarge {
            template_width: tpl_width,
            template_height: tpl_height,
            scene_width: img_width,
            scene_height: img_height,
        });
    }
    Ok((img_width - tpl_width + 1, img_height - tpl_height + 1))
}

/// Most channels a single scan accepts.
pub(crate) const MAX_CHANNELS: usize = 4;

/// Checks that scene planes and template plans pair up and agree in size.
pub(crate) fn check_planes(
    images: &[ImageView<'_, u8>],
    plans: &[TemplatePlan],
) -> FrameMatchResult<()> {
    if images.is_empty() || images.len() != plans.len() || images.len() > MAX_CHANNELS {
        return Err(FrameMatchError::ChannelMismatch {
            template: plans.len(),
            scene: images.len(),
        });
    }
    let scene_dims = (images[0].width(), images[0].height());
    if let Some(image) = images
        .iter()
        .find(|image| (image.width(), image.height()) != scene_dims)
    {
        return Err(FrameMatchError::PlaneMismatch {
            expected: scene_dims,
            got: (image.width(), image.height()),
        });
    }
    let tpl_dims = (plans[0].width(), plans[0].height());
    if let Some(plan) = plans
        .iter()
        .find(|plan| (plan.width(), plan.height()) != tpl_dims)
    {
        return Err(FrameMatchError::PlaneMismatch {
            expected: tpl_dims,
            got: (plan.width(), plan.height()),
        });
    }
    Ok(())
}

/// Scores the placement `(x, y)` over every channel.
#[inline]
pub(crate) fn score_placement<K: Kernel>(
    images: &[ImageView<'_, u8>],
    plans: &[TemplatePlan],
    metric: Metric,
    x: usize,
    y: usize,
) -> f32 {
    let mut sums = [WindowSums::default(); MAX_CHANNELS];
    for ((slot, &image), plan) in sums.iter_mut().zip(images).zip(plans) {
        *slot = K::window_sums(image, plan, x, y);
    }
    metric.score_planes(plans, &sums[..plans.len()])
}

/// Scores every placement of `tpl` inside `image` with kernel `K`.
pub fn scan_full<K: Kernel>(
    image: ImageView<'_, u8>,
    tpl: &TemplatePlan,
    metric: Metric,
) -> FrameMatchResult<ResponseMap> {
    scan_planes::<K>(std::slice::from_ref(&image), std::slice::from_ref(tpl), metric)
}

/// Scores every placement of a multi-channel template, one plan per scene
/// plane, summing the channel terms.
pub fn scan_planes<K: Kernel>(
    images: &[ImageView<'_, u8>],
    plans: &[TemplatePlan],
    metric: Metric,
) -> FrameMatchResult<ResponseMap> {
    check_planes(images, plans)?;
    let (out_width, out_height) = response_dims(images[0], &plans[0])?;

    let mut data = Vec::with_capacity(out_width * out_height);
    for y in 0..out_height {
        for x in 0..out_width {
            data.push(score_placement::<K>(images, plans, metric, x, y));
        }
    }

    Ok(ResponseMap::from_vec(data, out_width, out_height))
}

#[cfg(test)]
mod tests {
    use super::{scan_full, scan_planes};
    use crate::kernel::scalar::Scalar;
    use crate::template::TemplatePlan;
    use crate::{FrameMatchError, ImageView, Metric};

    #[test]
    fn response_has_one_score_per_placement() {
        let image = [0u8; 7 * 5];
        let tpl = [1u8, 2, 3, 4, 5, 6];
        let view = ImageView::from_slice(&image, 7, 5).unwrap();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 3, 2).unwrap()).unwrap();
        let map = scan_full::<Scalar>(view, &plan, Metric::SqDiff).unwrap();
        assert_eq!((map.width(), map.height()), (5, 4));
        assert_eq!(map.data().len(), 20);
    }

    #[test]
    fn oversized_template_is_rejected() {
        let image = [0u8; 4];
        let tpl = [0u8; 6];
        let view = ImageView::from_slice(&image, 2, 2).unwrap();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 3, 2).unwrap()).unwrap();
        let err = scan_full::<Scalar>(view, &plan, Metric::CCoeffNormed).unwrap_err();
        assert_eq!(
            err,
            FrameMatchError::TemplateTooLarge {
                template_width: 3,
                template_height: 2,
                scene_width: 2,
                scene_height: 2,
            }
        );
    }

    #[test]
    fn plane_counts_must_agree() {
        let image = [0u8; 16];
        let tpl = [1u8, 2, 3, 4];
        let view = ImageView::from_slice(&image, 4, 4).unwrap();
        let plan = TemplatePlan::from_view(ImageView::from_slice(&tpl, 2, 2).unwrap()).unwrap();
        let err = scan_planes::<Scalar>(&[view, view], &[plan], Metric::SqDiff).unwrap_err();
        assert_eq!(
            err,
            FrameMatchError::ChannelMismatch {
                template: 1,
                scene: 2
            }
        );
    }
}
