//! Consensus scoring of a circle hypothesis against the sample set.

use crate::geometry::{Circle, Point2D};

/// Number of samples whose distance to the center is within
/// `tolerance_px` of the radius.
pub fn count_inliers(samples: &[Point2D], circle: &Circle, tolerance_px: f64) -> usize {
    samples
        .iter()
        .filter(|p| circle.radial_residual(p).abs() < tolerance_px)
        .count()
}

/// Fraction of samples within the inlier band; `0.0` for an empty set.
pub fn inlier_ratio(samples: &[Point2D], circle: &Circle, tolerance_px: f64) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    count_inliers(samples, circle, tolerance_px) as f32 / samples.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circle() -> Circle {
        Circle::new(Point2D::new(50.0, 40.0), 20.0)
    }

    #[test]
    fn all_on_boundary_scores_one() {
        let c = circle();
        let pts = c.sample_points(64);
        assert_eq!(inlier_ratio(&pts, &c, 1.0), 1.0);
    }

    #[test]
    fn nothing_near_boundary_scores_zero() {
        let c = circle();
        let pts = vec![
            Point2D::new(50.0, 40.0),
            Point2D::new(200.0, 40.0),
            Point2D::new(50.0, 62.5),
        ];
        assert_eq!(inlier_ratio(&pts, &c, 1.0), 0.0);
    }

    #[test]
    fn empty_set_scores_zero() {
        let r = inlier_ratio(&[], &circle(), 1.0);
        assert_eq!(r, 0.0);
        assert!(!r.is_nan());
    }

    #[test]
    fn tolerance_is_absolute_and_strict() {
        let c = circle();
        let pts = vec![
            Point2D::new(70.9, 40.0),  // residual 0.9
            Point2D::new(71.0, 40.0),  // residual 1.0, excluded
            Point2D::new(50.0, 20.5),  // residual 0.5
            Point2D::new(50.0, 17.0),  // residual 3.0
        ];
        assert_eq!(count_inliers(&pts, &c, 1.0), 2);
        assert_eq!(inlier_ratio(&pts, &c, 1.0), 0.5);
        assert_eq!(count_inliers(&pts, &c, 3.5), 4);
    }
}
