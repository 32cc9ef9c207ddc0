//! Per-slot and per-batch measurement results.

use serde::{Deserialize, Serialize};

use crate::circle::{BestCircle, NoCircle, RansacTrace};
use crate::geometry::{Circle, Point2D};
use crate::side::{RegionOfInterest, Side};

/// Accepted circle for one (image, side) slot, in ROI-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    /// Circle center relative to the ROI origin. May lie outside the ROI.
    pub center: Point2D,
    pub radius: f64,
    /// Fraction of sample points within the inlier band, in [0, 1].
    pub inlier_ratio: f32,
    /// Number of sample points the ratio was computed over.
    pub sample_count: usize,
}

impl MeasurementResult {
    pub(crate) fn from_best(best: &BestCircle, sample_count: usize) -> Self {
        Self {
            center: best.circle.center,
            radius: best.circle.radius,
            inlier_ratio: best.inlier_ratio,
            sample_count,
        }
    }

    /// The fitted circle in ROI-local coordinates.
    pub fn circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    /// Center translated into source-image coordinates.
    pub fn center_in_image(&self, roi: &RegionOfInterest) -> Point2D {
        self.center + roi.origin()
    }

    /// The fitted circle in source-image coordinates.
    pub fn circle_in_image(&self, roi: &RegionOfInterest) -> Circle {
        self.circle().translated(roi.origin())
    }
}

/// Outcome of one (image, side) slot. Every slot yields exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotOutcome {
    Measured(MeasurementResult),
    Unmeasured { reason: NoCircle },
}

impl SlotOutcome {
    pub fn measured(&self) -> Option<&MeasurementResult> {
        match self {
            Self::Measured(m) => Some(m),
            Self::Unmeasured { .. } => None,
        }
    }

    pub fn is_measured(&self) -> bool {
        matches!(self, Self::Measured(_))
    }
}

/// Ordered outcomes of one side, indexed by image index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideMeasurements {
    pub side: Side,
    /// Window the outcomes are relative to.
    pub roi: RegionOfInterest,
    pub outcomes: Vec<SlotOutcome>,
}

impl SideMeasurements {
    pub fn get(&self, image_index: usize) -> Option<&SlotOutcome> {
        self.outcomes.get(image_index)
    }

    /// Number of slots with an accepted circle.
    pub fn n_measured(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_measured()).count()
    }
}

/// Measurements for a whole batch of images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchMeasurements {
    /// Seed the per-slot random sources were derived from.
    pub seed: u64,
    pub left: SideMeasurements,
    pub right: SideMeasurements,
}

impl BatchMeasurements {
    pub fn side(&self, side: Side) -> &SideMeasurements {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn n_images(&self) -> usize {
        self.left.outcomes.len()
    }

    pub fn outcome(&self, image_index: usize, side: Side) -> Option<&SlotOutcome> {
        self.side(side).get(image_index)
    }
}

/// Estimator trace of one slot, for debug dumps and hypothesis frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTrace {
    pub image_index: usize,
    pub side: Side,
    pub sample_count: usize,
    pub ransac: RansacTrace,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translation_is_a_pure_offset() {
        let m = MeasurementResult {
            center: Point2D::new(112.5, 201.0),
            radius: 90.0,
            inlier_ratio: 0.8,
            sample_count: 20,
        };
        let roi = RegionOfInterest::new(520, 980, 220, 400);
        assert_eq!(m.center_in_image(&roi), Point2D::new(632.5, 1181.0));
        let c = m.circle_in_image(&roi);
        assert_eq!(c.center, m.center_in_image(&roi));
        assert_eq!(c.radius, 90.0);
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let unmeasured = SlotOutcome::Unmeasured {
            reason: NoCircle::EmptySampleSet,
        };
        let json = serde_json::to_value(unmeasured).expect("serialize");
        assert_eq!(json["status"], "unmeasured");
        assert_eq!(json["reason"], "empty_sample_set");

        let measured = SlotOutcome::Measured(MeasurementResult {
            center: Point2D::new(1.0, 2.0),
            radius: 3.0,
            inlier_ratio: 1.0,
            sample_count: 4,
        });
        let json = serde_json::to_value(measured).expect("serialize");
        assert_eq!(json["status"], "measured");
        assert_eq!(json["radius"], 3.0);
        let back: SlotOutcome = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, measured);
    }
}
