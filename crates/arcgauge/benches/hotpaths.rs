use std::f64::consts::PI;

use arcgauge::{
    estimate_best_circle, extract_samples, fit_circle, CannyConfig, CannyEdges, EdgeExtractor,
    MeasureConfig, MeasurementPipeline, Point2D, RansacConfig, RegionOfInterest, SideConfig,
    DEFAULT_SAMPLE_STRIDE,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Left-arc fixture: 220×400 window with a bright disk of radius 90 whose
/// center sits at (110, 200).
fn make_arc_roi() -> GrayImage {
    let mut img = GrayImage::from_pixel(220, 400, Luma([40]));
    for y in 0..400u32 {
        for x in 0..220u32 {
            let dx = x as f64 - 110.0;
            let dy = y as f64 - 200.0;
            if (dx * dx + dy * dy).sqrt() <= 90.0 {
                img.put_pixel(x, y, Luma([210]));
            }
        }
    }
    img
}

/// Half arc with jitter plus uniform clutter, ~25% outliers.
fn make_arc_samples(n_arc: usize, n_clutter: usize) -> Vec<Point2D> {
    let mut rng = StdRng::seed_from_u64(12345);
    let mut pts = Vec::with_capacity(n_arc + n_clutter);
    for i in 0..n_arc {
        let t = 0.5 * PI + PI * (i as f64) / (n_arc as f64);
        pts.push(Point2D::new(
            110.0 + 90.0 * t.cos() + rng.gen_range(-0.4..0.4),
            200.0 + 90.0 * t.sin() + rng.gen_range(-0.4..0.4),
        ));
    }
    for _ in 0..n_clutter {
        pts.push(Point2D::new(
            rng.gen_range(0.0..220.0),
            rng.gen_range(0.0..400.0),
        ));
    }
    pts
}

fn bench_fit(c: &mut Criterion) {
    let p = [
        Point2D::new(20.0, 200.0),
        Point2D::new(110.0, 110.0),
        Point2D::new(110.0, 290.0),
    ];
    c.bench_function("fit_circle_3pt", |b| {
        b.iter(|| black_box(fit_circle(black_box(p[0]), black_box(p[1]), black_box(p[2]))))
    });
}

fn bench_ransac(c: &mut Criterion) {
    let samples = make_arc_samples(60, 20);
    let cfg = RansacConfig::default();
    c.bench_function("ransac_80pts_100it", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let best = estimate_best_circle(black_box(&samples), black_box(&cfg), &mut rng);
            black_box(best.map(|b| b.inlier_ratio).unwrap_or(0.0))
        })
    });
}

fn bench_sampling(c: &mut Criterion) {
    let roi = make_arc_roi();
    let mask = CannyEdges::new(CannyConfig::default()).extract(&roi);
    c.bench_function("extract_samples_220x400", |b| {
        b.iter(|| black_box(extract_samples(black_box(&mask), DEFAULT_SAMPLE_STRIDE).len()))
    });
    c.bench_function("canny_edges_220x400", |b| {
        let edges = CannyEdges::new(CannyConfig::default());
        b.iter(|| black_box(edges.extract(black_box(&roi))))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut img = GrayImage::from_pixel(600, 400, Luma([40]));
    let roi = make_arc_roi();
    image::imageops::replace(&mut img, &roi, 0, 0);
    image::imageops::replace(&mut img, &image::imageops::flip_horizontal(&roi), 380, 0);
    let images = vec![img; 4];

    let config = MeasureConfig {
        left: SideConfig {
            roi: RegionOfInterest::new(0, 0, 220, 400),
            ..SideConfig::default_left()
        },
        right: SideConfig {
            roi: RegionOfInterest::new(380, 0, 220, 400),
            ..SideConfig::default_right()
        },
        seed: Some(1),
        ..MeasureConfig::default()
    };
    let pipeline = match MeasurementPipeline::new(config) {
        Ok(p) => p,
        Err(e) => panic!("bench config invalid: {e}"),
    };
    c.bench_function("pipeline_4_images", |b| {
        b.iter(|| {
            let batch = pipeline.measure(black_box(&images));
            black_box(batch.map(|b| b.left.n_measured()).unwrap_or(0))
        })
    });
}

criterion_group!(
    hotpaths,
    bench_fit,
    bench_ransac,
    bench_sampling,
    bench_pipeline
);
criterion_main!(hotpaths);
