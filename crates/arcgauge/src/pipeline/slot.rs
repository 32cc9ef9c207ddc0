//! Measurement of one (image, side) slot: crop → edges → mask → sample → estimate.

use image::GrayImage;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::result::{MeasurementResult, SlotOutcome, SlotTrace};
use crate::circle::{estimate_best_circle, estimate_best_circle_traced};
use crate::config::MeasureConfig;
use crate::edges::EdgeExtractor;
use crate::sampling::extract_samples;
use crate::side::Side;

/// Derive the RNG seed of one slot from the batch seed.
///
/// Depends only on `(batch_seed, image_index, side)`, so slot results do not
/// depend on scheduling order.
pub(crate) fn slot_seed(batch_seed: u64, image_index: usize, side: Side) -> u64 {
    let slot = ((image_index as u64) << 1) | side.index() as u64;
    batch_seed ^ slot.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

pub(crate) struct SlotContext<'a> {
    pub config: &'a MeasureConfig,
    pub edges: &'a dyn EdgeExtractor,
    pub batch_seed: u64,
}

/// Edge mask of one side's ROI with the opposite-side band cleared.
pub(crate) fn masked_edges(
    image: &GrayImage,
    side: Side,
    config: &MeasureConfig,
    edges: &dyn EdgeExtractor,
) -> GrayImage {
    let crop = config.side(side).roi.crop(image);
    let mut mask = edges.extract(&crop);
    let (cols, rows) = mask.dimensions();
    side.mask_band(cols, rows).apply(&mut mask);
    mask
}

pub(crate) fn measure_slot(
    image: &GrayImage,
    image_index: usize,
    side: Side,
    ctx: &SlotContext<'_>,
    collect_trace: bool,
) -> (SlotOutcome, Option<SlotTrace>) {
    let mask = masked_edges(image, side, ctx.config, ctx.edges);
    let samples = extract_samples(&mask, ctx.config.sampling.stride);
    let ransac_cfg = &ctx.config.side(side).ransac;
    let mut rng = StdRng::seed_from_u64(slot_seed(ctx.batch_seed, image_index, side));

    let (estimate, trace) = if collect_trace {
        let (estimate, ransac) = estimate_best_circle_traced(&samples, ransac_cfg, &mut rng);
        let trace = SlotTrace {
            image_index,
            side,
            sample_count: samples.len(),
            ransac,
        };
        (estimate, Some(trace))
    } else {
        (estimate_best_circle(&samples, ransac_cfg, &mut rng), None)
    };

    let outcome = match estimate {
        Ok(best) => {
            tracing::debug!(
                "image {} {}: r={:.2} center=({:.2}, {:.2}) ratio={:.3} from {} samples",
                image_index,
                side,
                best.circle.radius,
                best.circle.center.x,
                best.circle.center.y,
                best.inlier_ratio,
                samples.len()
            );
            SlotOutcome::Measured(MeasurementResult::from_best(&best, samples.len()))
        }
        Err(reason) => {
            tracing::warn!(
                "image {} {}: unmeasured, {} ({} samples)",
                image_index,
                side,
                reason,
                samples.len()
            );
            SlotOutcome::Unmeasured { reason }
        }
    };

    (outcome, trace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_seeds_are_distinct() {
        let mut seeds = std::collections::HashSet::new();
        for image_index in 0..64 {
            for side in Side::ALL {
                assert!(seeds.insert(slot_seed(42, image_index, side)));
            }
        }
    }

    #[test]
    fn slot_seed_depends_on_batch_seed() {
        assert_ne!(slot_seed(1, 0, Side::Left), slot_seed(2, 0, Side::Left));
        assert_eq!(slot_seed(7, 3, Side::Right), slot_seed(7, 3, Side::Right));
    }
}
