//! Grid subsampling of binary edge masks into candidate points.

use image::GrayImage;

use crate::geometry::Point2D;

/// Default grid stride (pixels) in both axes.
pub const DEFAULT_SAMPLE_STRIDE: u32 = 5;

/// Configuration for edge-mask subsampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Grid stride in pixels; only pixels with `x % stride == 0 && y % stride == 0`
    /// are inspected.
    pub stride: u32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            stride: DEFAULT_SAMPLE_STRIDE,
        }
    }
}

/// Collect the coordinates of non-zero mask pixels on a `stride` grid.
///
/// Output is in row-major scan order and fully determined by the mask.
/// A `stride` of 0 behaves like 1 (every pixel is inspected);
/// [`crate::MeasureConfig::validate`] rejects it before the pipeline gets here.
pub fn extract_samples(mask: &GrayImage, stride: u32) -> Vec<Point2D> {
    let step = stride.max(1) as usize;
    let (w, h) = mask.dimensions();

    let mut out = Vec::new();
    for y in (0..h).step_by(step) {
        for x in (0..w).step_by(step) {
            if mask.get_pixel(x, y)[0] > 0 {
                out.push(Point2D::new(x as f64, y as f64));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn only_grid_pixels_are_inspected() {
        let mut mask = GrayImage::new(20, 12);
        mask.put_pixel(0, 0, Luma([255]));
        mask.put_pixel(5, 0, Luma([1]));
        mask.put_pixel(6, 0, Luma([255])); // off-grid
        mask.put_pixel(15, 10, Luma([255]));
        mask.put_pixel(10, 7, Luma([255])); // off-grid row

        let pts = extract_samples(&mask, 5);
        assert_eq!(
            pts,
            vec![
                Point2D::new(0.0, 0.0),
                Point2D::new(5.0, 0.0),
                Point2D::new(15.0, 10.0)
            ]
        );
    }

    #[test]
    fn order_is_row_major() {
        let mut mask = GrayImage::new(11, 11);
        mask.put_pixel(10, 0, Luma([255]));
        mask.put_pixel(0, 5, Luma([255]));
        mask.put_pixel(5, 5, Luma([255]));
        mask.put_pixel(0, 10, Luma([255]));

        let pts = extract_samples(&mask, 5);
        let xy: Vec<(f64, f64)> = pts.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(xy, vec![(10.0, 0.0), (0.0, 5.0), (5.0, 5.0), (0.0, 10.0)]);
    }

    #[test]
    fn empty_mask_yields_nothing() {
        assert!(extract_samples(&GrayImage::new(30, 30), 5).is_empty());
        assert!(extract_samples(&GrayImage::new(0, 0), 5).is_empty());
    }

    #[test]
    fn unit_stride_visits_every_pixel() {
        let mut mask = GrayImage::new(4, 3);
        for (x, y, p) in mask.enumerate_pixels_mut() {
            if (x + y) % 2 == 0 {
                *p = Luma([200]);
            }
        }
        assert_eq!(extract_samples(&mask, 1).len(), 6);
    }

    #[test]
    fn zero_stride_behaves_like_unit_stride() {
        let mut mask = GrayImage::new(7, 4);
        mask.put_pixel(3, 1, Luma([255]));
        mask.put_pixel(6, 3, Luma([9]));
        assert_eq!(extract_samples(&mask, 0), extract_samples(&mask, 1));
        assert_eq!(
            extract_samples(&mask, 0),
            vec![Point2D::new(3.0, 1.0), Point2D::new(6.0, 3.0)]
        );
    }
}
