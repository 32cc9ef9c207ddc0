//! Planar primitives shared by the fitting stages.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Point in pixel coordinates (x to the right, y down).
pub type Point2D = Point2<f64>;

/// Circle hypothesis or final fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    /// Center in the frame of the points it was fitted to.
    pub center: Point2D,
    /// Radius in pixels.
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2D, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Signed radial residual of `p`: positive outside the circle, negative inside.
    #[inline]
    pub fn radial_residual(&self, p: &Point2D) -> f64 {
        nalgebra::distance(&self.center, p) - self.radius
    }

    /// Same circle with its center shifted by `offset`.
    pub fn translated(&self, offset: Vector2<f64>) -> Self {
        Self {
            center: self.center + offset,
            radius: self.radius,
        }
    }

    /// `n` points evenly spaced in angle over `[start, end)` radians.
    pub fn sample_arc(&self, n: usize, start: f64, end: f64) -> Vec<Point2D> {
        let step = (end - start) / n.max(1) as f64;
        (0..n)
            .map(|i| {
                let t = start + step * i as f64;
                Point2D::new(
                    self.center.x + self.radius * t.cos(),
                    self.center.y + self.radius * t.sin(),
                )
            })
            .collect()
    }

    /// `n` points evenly spaced around the full circle.
    pub fn sample_points(&self, n: usize) -> Vec<Point2D> {
        self.sample_arc(n, 0.0, std::f64::consts::TAU)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn residual_sign_follows_side_of_boundary() {
        let c = Circle::new(Point2D::new(10.0, 10.0), 5.0);
        assert_abs_diff_eq!(c.radial_residual(&Point2D::new(15.0, 10.0)), 0.0, epsilon = 1e-12);
        assert!(c.radial_residual(&Point2D::new(10.0, 10.0)) < 0.0);
        assert!(c.radial_residual(&Point2D::new(30.0, 10.0)) > 0.0);
    }

    #[test]
    fn translation_keeps_radius() {
        let c = Circle::new(Point2D::new(1.0, 2.0), 3.0).translated(Vector2::new(10.0, 20.0));
        assert_eq!(c.center, Point2D::new(11.0, 22.0));
        assert_eq!(c.radius, 3.0);
    }

    #[test]
    fn sampled_points_lie_on_circle() {
        let c = Circle::new(Point2D::new(-4.0, 7.5), 12.0);
        for p in c.sample_points(37) {
            assert_abs_diff_eq!(c.radial_residual(&p), 0.0, epsilon = 1e-9);
        }
    }
}
