//! RANSAC driver for outlier-robust circle estimation.

use rand::Rng;

use super::fit::fit_circle;
use super::score::count_inliers;
use super::types::{BestCircle, Improvement, NoCircle, RansacConfig, RansacTrace};
use crate::geometry::Point2D;

/// Estimate the circle best supported by `samples`.
///
/// Runs exactly `config.iterations` trials. Each trial draws three indices
/// independently and uniformly; trials with coinciding indices or collinear
/// points are discarded without a re-draw. A hypothesis replaces the current
/// best only if its ratio reaches `config.min_inlier_ratio` and is strictly
/// greater than the best so far, so the first of equally scored hypotheses
/// wins.
///
/// The random source is owned by the caller; seed it for reproducible runs.
pub fn estimate_best_circle<R: Rng + ?Sized>(
    samples: &[Point2D],
    config: &RansacConfig,
    rng: &mut R,
) -> Result<BestCircle, NoCircle> {
    run(samples, config, rng, None)
}

/// Same as [`estimate_best_circle`], additionally recording every
/// improvement of the best hypothesis and the discarded-trial counts.
///
/// Consumes the random source identically, so both entry points agree for
/// the same RNG state.
pub fn estimate_best_circle_traced<R: Rng + ?Sized>(
    samples: &[Point2D],
    config: &RansacConfig,
    rng: &mut R,
) -> (Result<BestCircle, NoCircle>, RansacTrace) {
    let mut trace = RansacTrace::default();
    let outcome = run(samples, config, rng, Some(&mut trace));
    (outcome, trace)
}

fn run<R: Rng + ?Sized>(
    samples: &[Point2D],
    config: &RansacConfig,
    rng: &mut R,
    mut trace: Option<&mut RansacTrace>,
) -> Result<BestCircle, NoCircle> {
    let n = samples.len();
    if n == 0 {
        return Err(NoCircle::EmptySampleSet);
    }

    let mut best: Option<BestCircle> = None;
    // Ratios must beat this strictly, so a zero-support hypothesis is never kept.
    let mut best_ratio = 0.0f32;
    let mut best_rejected_ratio = 0.0f32;

    for iteration in 0..config.iterations {
        let i1 = rng.gen_range(0..n);
        let i2 = rng.gen_range(0..n);
        let i3 = rng.gen_range(0..n);
        if i1 == i2 || i1 == i3 || i2 == i3 {
            if let Some(t) = trace.as_deref_mut() {
                t.index_collisions += 1;
            }
            continue;
        }

        let triple = [samples[i1], samples[i2], samples[i3]];
        let Ok(circle) = fit_circle(triple[0], triple[1], triple[2]) else {
            if let Some(t) = trace.as_deref_mut() {
                t.degenerate_fits += 1;
            }
            continue;
        };

        let inlier_count = count_inliers(samples, &circle, config.inlier_tolerance_px);
        let ratio = inlier_count as f32 / n as f32;

        if ratio < config.min_inlier_ratio {
            best_rejected_ratio = best_rejected_ratio.max(ratio);
            if let Some(t) = trace.as_deref_mut() {
                t.below_threshold += 1;
            }
            continue;
        }

        if ratio > best_ratio {
            best_ratio = ratio;
            best = Some(BestCircle {
                circle,
                inlier_ratio: ratio,
                inlier_count,
                iteration,
            });
            tracing::trace!(
                "iteration {}: new best r={:.2} at ({:.2}, {:.2}), ratio={:.3}",
                iteration,
                circle.radius,
                circle.center.x,
                circle.center.y,
                ratio
            );
            if let Some(t) = trace.as_deref_mut() {
                t.improvements.push(Improvement {
                    iteration,
                    sample_points: triple,
                    circle,
                    inlier_ratio: ratio,
                });
            }
        }
    }

    best.ok_or(NoCircle::NoQualifyingCircle {
        best_rejected_ratio,
    })
}
