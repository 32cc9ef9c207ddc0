//! Circle fitting primitives.
//!
//! Implements:
//! - Closed-form circle through three points (perpendicular-bisector intersection).
//! - Inlier counting against a fixed absolute band around the circle.
//! - RANSAC driver with a caller-owned random source and first-found-wins ties.

mod fit;
mod ransac;
mod score;
mod types;

pub use fit::fit_circle;
pub use ransac::{estimate_best_circle, estimate_best_circle_traced};
pub use score::{count_inliers, inlier_ratio};
pub use types::{
    BestCircle, FitFailure, Improvement, NoCircle, RansacConfig, RansacTrace, DEFAULT_INLIER_TOLERANCE_PX,
    DEGENERACY_EPS,
};
