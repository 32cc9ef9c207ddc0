//! Estimator configuration, outcomes, and error types.

use serde::{Deserialize, Serialize};

use crate::geometry::{Circle, Point2D};

/// Below this `|D|` the three points are treated as collinear.
pub const DEGENERACY_EPS: f64 = 1e-9;

/// Default absolute band half-width (pixels) for counting an inlier.
pub const DEFAULT_INLIER_TOLERANCE_PX: f64 = 1.0;

// ── Error type ─────────────────────────────────────────────────────────────

/// Three-point fit failed because the points are (nearly) collinear or coincident.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitFailure {
    /// Determinant of the linear system that was rejected.
    pub determinant: f64,
}

impl std::fmt::Display for FitFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "degenerate circle fit: |D| = {:.3e} (points are collinear or coincident)",
            self.determinant.abs()
        )
    }
}

impl std::error::Error for FitFailure {}

/// Why the estimator produced no circle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoCircle {
    /// The edge mask yielded no sample points; no trial was attempted.
    EmptySampleSet,
    /// No trial reached the minimum inlier ratio within the iteration budget.
    NoQualifyingCircle {
        /// Highest ratio among the trials that fell short of the threshold.
        best_rejected_ratio: f32,
    },
}

impl std::fmt::Display for NoCircle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySampleSet => write!(f, "empty sample set"),
            Self::NoQualifyingCircle {
                best_rejected_ratio,
            } => write!(
                f,
                "no qualifying circle (best rejected inlier ratio {:.3})",
                best_rejected_ratio
            ),
        }
    }
}

impl std::error::Error for NoCircle {}

// ── Types ──────────────────────────────────────────────────────────────────

/// RANSAC parameters for one side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RansacConfig {
    /// Exact number of trials; collisions and degenerate draws consume a trial.
    pub iterations: usize,
    /// Minimum inlier ratio in [0, 1] for a hypothesis to be accepted.
    pub min_inlier_ratio: f32,
    /// Absolute inlier band half-width in pixels (not scaled by radius).
    pub inlier_tolerance_px: f64,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            min_inlier_ratio: 0.60,
            inlier_tolerance_px: DEFAULT_INLIER_TOLERANCE_PX,
        }
    }
}

/// Best accepted hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestCircle {
    pub circle: Circle,
    /// Fraction of samples within the inlier band.
    pub inlier_ratio: f32,
    /// Number of samples within the inlier band.
    pub inlier_count: usize,
    /// Zero-based trial index that produced this hypothesis.
    pub iteration: usize,
}

/// One improvement of the running best hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Improvement {
    /// Zero-based trial index.
    pub iteration: usize,
    /// The three samples the hypothesis was fitted to.
    pub sample_points: [Point2D; 3],
    pub circle: Circle,
    pub inlier_ratio: f32,
}

/// Per-run record of the estimator's progress.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RansacTrace {
    /// Improvements of the best hypothesis, in trial order.
    pub improvements: Vec<Improvement>,
    /// Trials discarded because two drawn indices coincided.
    pub index_collisions: usize,
    /// Trials discarded because the drawn points were collinear.
    pub degenerate_fits: usize,
    /// Trials that fitted a circle but fell short of the minimum ratio.
    pub below_threshold: usize,
}
