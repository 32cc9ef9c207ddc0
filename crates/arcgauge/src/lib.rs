//! arcgauge — RANSAC measurement of paired semicircular arcs.
//!
//! Measures a left and a right arc in batches of 8-bit grayscale images.
//! The stages per image and side are:
//!
//! 1. **ROI** – crop the side's fixed window.
//! 2. **Edges** – Gaussian blur + Canny (or a plain threshold) via the
//!    [`EdgeExtractor`] seam.
//! 3. **Mask** – clear the central band on the half opposite the arc.
//! 4. **Sampling** – keep edge pixels on a regular grid.
//! 5. **Circle** – 3-point closed-form fits scored by inlier ratio inside a
//!    RANSAC loop with a seeded random source.
//!
//! # Public API
//! - [`MeasurementPipeline`] and [`MeasureConfig`] as primary entry points
//! - circle primitives ([`fit_circle`], [`estimate_best_circle`]) for use on
//!   arbitrary point sets
//! - [`BatchReport`] and overlay rendering for writing results

mod circle;
mod config;
mod edges;
mod geometry;
mod pipeline;
mod report;
mod sampling;
mod side;

#[cfg(test)]
mod test_utils;

pub use circle::{
    count_inliers, estimate_best_circle, estimate_best_circle_traced, fit_circle, inlier_ratio,
    BestCircle, FitFailure, Improvement, NoCircle, RansacConfig, RansacTrace,
    DEFAULT_INLIER_TOLERANCE_PX, DEGENERACY_EPS,
};
pub use config::{ConfigError, ConfigLoadError, MeasureConfig, SideConfig};
pub use edges::{CannyConfig, CannyEdges, EdgeConfig, EdgeExtractor, ThresholdEdges};
pub use geometry::{Circle, Point2D};
pub use pipeline::{
    BatchMeasurements, MeasurementPipeline, MeasurementResult, SideMeasurements, SlotOutcome,
    SlotTrace,
};
pub use report::{
    draw_overlay, render_improvement_frame, BatchReport, ImageInfo, ImageReport, SideReport,
};
pub use sampling::{extract_samples, SamplingConfig, DEFAULT_SAMPLE_STRIDE};
pub use side::{MaskBand, RegionOfInterest, Side};
