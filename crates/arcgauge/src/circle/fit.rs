//! Closed-form circle through three points.

use super::types::{FitFailure, DEGENERACY_EPS};
use crate::geometry::{Circle, Point2D};

/// Fit the unique circle passing through `p1`, `p2`, `p3`.
///
/// The center is the intersection of the perpendicular bisectors, written
/// directly in terms of the point coordinates; the radius is the distance
/// from the center to `p1`. Returns [`FitFailure`] when the points are
/// collinear (or coincide), instead of a circle with near-infinite radius.
pub fn fit_circle(p1: Point2D, p2: Point2D, p3: Point2D) -> Result<Circle, FitFailure> {
    let (x1, y1) = (p1.x, p1.y);
    let (x2, y2) = (p2.x, p2.y);
    let (x3, y3) = (p3.x, p3.y);

    let d = 2.0 * (x1 * (y2 - y3) - y1 * (x2 - x3) + x2 * y3 - x3 * y2);
    if !d.is_finite() || d.abs() < DEGENERACY_EPS {
        return Err(FitFailure { determinant: d });
    }

    let s1 = x1 * x1 + y1 * y1;
    let s2 = x2 * x2 + y2 * y2;
    let s3 = x3 * x3 + y3 * y3;

    let cx = (s1 * (y2 - y3) + s2 * (y3 - y1) + s3 * (y1 - y2)) / d;
    let cy = (s1 * (x3 - x2) + s2 * (x1 - x3) + s3 * (x2 - x1)) / d;
    let center = Point2D::new(cx, cy);
    let radius = nalgebra::distance(&center, &p1);

    if !(cx.is_finite() && cy.is_finite() && radius.is_finite()) {
        return Err(FitFailure { determinant: d });
    }

    Ok(Circle { center, radius })
}
