//! Semicircle measurement pipeline.
//!
//! Per image and per side: ROI crop -> edge extraction -> opposite-side
//! masking -> grid sampling -> RANSAC circle estimate. Every (image, side)
//! slot owns a random source derived from the batch seed, so slots run in
//! parallel without changing results.
//!
//! Entry point: [`MeasurementPipeline`].

mod result;
mod run;
mod slot;

pub use result::{BatchMeasurements, MeasurementResult, SideMeasurements, SlotOutcome, SlotTrace};
pub use run::MeasurementPipeline;
