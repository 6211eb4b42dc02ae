use criterion::{criterion_group, criterion_main, Criterion};
use framematch::lowlevel::{scan_full, scan_planes, Scalar, TemplatePlan};
use framematch::{ImageView, MatchConfig, Matcher, Metric};
use std::hint::black_box;

fn make_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 13) ^ (y * 7) ^ (x * y)) & 0xFF;
            data.push(value as u8);
        }
    }
    data
}

fn extract_patch(
    image: &[u8],
    img_width: usize,
    x0: usize,
    y0: usize,
    width: usize,
    height: usize,
) -> Vec<u8> {
    let mut out = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = (y0 + y) * img_width;
        out.extend_from_slice(&image[row + x0..row + x0 + width]);
    }
    out
}

fn bench_matcher(c: &mut Criterion) {
    let img_width = 256;
    let img_height = 256;
    let image = make_image(img_width, img_height);
    let image_view = ImageView::from_slice(&image, img_width, img_height).unwrap();

    let tpl_width = 32;
    let tpl_height = 32;
    let tpl_data = extract_patch(&image, img_width, 120, 100, tpl_width, tpl_height);
    let tpl_view = ImageView::from_slice(&tpl_data, tpl_width, tpl_height).unwrap();

    for (name, metric) in [
        ("ccoeff_normed_full_scan", Metric::CCoeffNormed),
        ("sqdiff_full_scan", Metric::SqDiff),
        ("ccorr_normed_full_scan", Metric::CCorrNormed),
    ] {
        let matcher = Matcher::new(MatchConfig {
            metric,
            ..MatchConfig::default()
        });
        c.bench_function(name, |b| {
            b.iter(|| black_box(matcher.match_views(tpl_view, image_view).unwrap()));
        });
    }

    if cfg!(feature = "rayon") {
        let matcher_par = Matcher::new(MatchConfig {
            metric: Metric::CCoeffNormed,
            parallel: true,
            ..MatchConfig::default()
        });
        c.bench_function("ccoeff_normed_full_scan_parallel", |b| {
            b.iter(|| black_box(matcher_par.match_views(tpl_view, image_view).unwrap()));
        });
    }

    let plan = TemplatePlan::from_view(tpl_view).unwrap();
    c.bench_function("scalar_kernel_scan", |b| {
        b.iter(|| {
            black_box(scan_full::<Scalar>(image_view, &plan, Metric::CCoeffNormed).unwrap())
        });
    });

    let planes = [image_view, image_view, image_view];
    let plans: Vec<TemplatePlan> = (0..3)
        .map(|_| TemplatePlan::from_view(tpl_view).unwrap())
        .collect();
    c.bench_function("scalar_kernel_scan_rgb", |b| {
        b.iter(|| {
            black_box(scan_planes::<Scalar>(&planes, &plans, Metric::CCoeffNormed).unwrap())
        });
    });

    #[cfg(feature = "simd")]
    c.bench_function("simd_kernel_scan", |b| {
        b.iter(|| {
            black_box(
                scan_full::<framematch::lowlevel::Simd>(image_view, &plan, Metric::CCoeffNormed)
                    .unwrap(),
            )
        });
    });
}

criterion_group!(benches, bench_matcher);
criterion_main!(benches);
