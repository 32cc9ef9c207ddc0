//! Batch orchestrator: validate → fan out (image, side) slots → collect per side.

use image::GrayImage;
use rayon::prelude::*;

use super::result::{BatchMeasurements, SideMeasurements, SlotOutcome, SlotTrace};
use super::slot::{masked_edges, measure_slot, SlotContext};
use crate::config::{ConfigError, MeasureConfig};
use crate::edges::EdgeExtractor;
use crate::side::Side;

/// Semicircle measurement over batches of grayscale images.
///
/// Configuration is validated on construction; ROI bounds are validated
/// against every image of a batch before any image is processed.
///
/// # Examples
///
/// ```no_run
/// use arcgauge::{MeasureConfig, MeasurementPipeline, Side};
/// use image::GrayImage;
///
/// let config = MeasureConfig { seed: Some(7), ..MeasureConfig::default() };
/// let pipeline = MeasurementPipeline::new(config).unwrap();
/// let images = vec![GrayImage::new(2592, 1944)];
/// let batch = pipeline.measure(&images).unwrap();
/// if let Some(m) = batch.outcome(0, Side::Left).and_then(|o| o.measured()) {
///     println!("left radius {:.2}", m.radius);
/// }
/// ```
pub struct MeasurementPipeline {
    config: MeasureConfig,
    edges: Box<dyn EdgeExtractor>,
}

impl MeasurementPipeline {
    /// Create a pipeline using the edge extractor named in `config.edges`.
    pub fn new(config: MeasureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let edges = config.edges.build();
        Ok(Self { config, edges })
    }

    /// Create a pipeline with a caller-provided edge extractor.
    ///
    /// `config.edges` is still validated but otherwise unused.
    pub fn with_edge_extractor(
        config: MeasureConfig,
        edges: Box<dyn EdgeExtractor>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, edges })
    }

    pub fn config(&self) -> &MeasureConfig {
        &self.config
    }

    /// One side's ROI as the edge extractor smooths it before detection, in
    /// ROI-local coordinates. The caller checks that the side's ROI fits
    /// `image`.
    pub fn smoothed_roi(&self, image: &GrayImage, side: Side) -> GrayImage {
        self.edges.smoothed(&self.config.side(side).roi.crop(image))
    }

    /// Masked edge image one side's samples are drawn from, in ROI-local
    /// coordinates. The caller checks that the side's ROI fits `image`.
    pub fn edge_mask(&self, image: &GrayImage, side: Side) -> GrayImage {
        masked_edges(image, side, &self.config, self.edges.as_ref())
    }

    /// Measure both arcs in every image.
    pub fn measure(&self, images: &[GrayImage]) -> Result<BatchMeasurements, ConfigError> {
        self.run(images, false).map(|(batch, _)| batch)
    }

    /// Measure both arcs and keep the estimator trace of every slot.
    pub fn measure_traced(
        &self,
        images: &[GrayImage],
    ) -> Result<(BatchMeasurements, Vec<SlotTrace>), ConfigError> {
        self.run(images, true)
    }

    fn run(
        &self,
        images: &[GrayImage],
        collect_trace: bool,
    ) -> Result<(BatchMeasurements, Vec<SlotTrace>), ConfigError> {
        self.config
            .validate_for_images(images.iter().map(GrayImage::dimensions))?;

        let batch_seed = self.config.seed.unwrap_or_else(rand::random);
        tracing::info!(
            "measuring {} images ({} slots), seed {}",
            images.len(),
            images.len() * Side::ALL.len(),
            batch_seed
        );

        let ctx = SlotContext {
            config: &self.config,
            edges: self.edges.as_ref(),
            batch_seed,
        };

        // Slot k is image k / 2, side Side::ALL[k % 2].
        let n_slots = images.len() * Side::ALL.len();
        let slot = |k: usize| {
            let image_index = k / Side::ALL.len();
            let side = Side::ALL[k % Side::ALL.len()];
            measure_slot(&images[image_index], image_index, side, &ctx, collect_trace)
        };
        let results: Vec<(SlotOutcome, Option<SlotTrace>)> = if self.config.parallel {
            (0..n_slots).into_par_iter().map(slot).collect()
        } else {
            (0..n_slots).map(slot).collect()
        };

        let mut left = Vec::with_capacity(images.len());
        let mut right = Vec::with_capacity(images.len());
        let mut traces = Vec::new();
        for (k, (outcome, trace)) in results.into_iter().enumerate() {
            match Side::ALL[k % Side::ALL.len()] {
                Side::Left => left.push(outcome),
                Side::Right => right.push(outcome),
            }
            traces.extend(trace);
        }

        let batch = BatchMeasurements {
            seed: batch_seed,
            left: SideMeasurements {
                side: Side::Left,
                roi: self.config.left.roi,
                outcomes: left,
            },
            right: SideMeasurements {
                side: Side::Right,
                roi: self.config.right.roi,
                outcomes: right,
            },
        };

        tracing::info!(
            "measured left {}/{}, right {}/{}",
            batch.left.n_measured(),
            images.len(),
            batch.right.n_measured(),
            images.len()
        );

        Ok((batch, traces))
    }
}
