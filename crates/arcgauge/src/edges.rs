//! Edge-mask extraction collaborators.
//!
//! The measurement pipeline only needs a binary mask (non-zero = edge) of the
//! same size as the ROI crop. [`EdgeExtractor`] is the seam; two stock
//! implementations are provided:
//! - [`CannyEdges`]: Gaussian pre-smoothing followed by Canny (`imageproc`).
//! - [`ThresholdEdges`]: binarizes an input that already is an edge image.

use image::{GrayImage, Luma};

/// Turns a grayscale ROI crop into a binary edge mask of the same size.
pub trait EdgeExtractor: Send + Sync {
    fn extract(&self, roi: &GrayImage) -> GrayImage;

    /// The ROI as the extractor sees it before edge detection. Used as the
    /// background of debug frames.
    fn smoothed(&self, roi: &GrayImage) -> GrayImage {
        roi.clone()
    }
}

/// Gaussian smoothing followed by Canny edge detection.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CannyConfig {
    /// Pre-smoothing sigma in pixels; `0` disables the extra blur.
    pub blur_sigma: f32,
    /// Hysteresis low threshold on gradient magnitude.
    pub low_threshold: f32,
    /// Hysteresis high threshold on gradient magnitude.
    pub high_threshold: f32,
}

impl Default for CannyConfig {
    fn default() -> Self {
        Self {
            blur_sigma: 2.0,
            low_threshold: 30.0,
            high_threshold: 70.0,
        }
    }
}

/// Edge extraction strategy, selectable from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeConfig {
    /// Smooth + Canny on raw intensity images.
    Canny(CannyConfig),
    /// Pixels strictly above `level` are edges; for inputs that are already masks.
    Threshold {
        /// Intensity level; pixels above it become edges.
        level: u8,
    },
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self::Canny(CannyConfig::default())
    }
}

impl EdgeConfig {
    /// Check parameter ranges, returning a description of the first problem.
    pub fn check(&self) -> Result<(), String> {
        match self {
            Self::Canny(c) => {
                if !c.blur_sigma.is_finite() || c.blur_sigma < 0.0 {
                    return Err(format!(
                        "blur_sigma must be finite and >= 0, got {}",
                        c.blur_sigma
                    ));
                }
                if !(c.low_threshold.is_finite() && c.high_threshold.is_finite()) {
                    return Err("canny thresholds must be finite".to_string());
                }
                if c.low_threshold < 0.0 || c.low_threshold > c.high_threshold {
                    return Err(format!(
                        "canny thresholds must satisfy 0 <= low <= high, got low={} high={}",
                        c.low_threshold, c.high_threshold
                    ));
                }
                Ok(())
            }
            Self::Threshold { .. } => Ok(()),
        }
    }

    /// Instantiate the configured extractor.
    pub fn build(&self) -> Box<dyn EdgeExtractor> {
        match *self {
            Self::Canny(c) => Box::new(CannyEdges::new(c)),
            Self::Threshold { level } => Box::new(ThresholdEdges { level }),
        }
    }
}

/// Canny edge extractor with optional Gaussian pre-smoothing.
#[derive(Debug, Clone, Copy)]
pub struct CannyEdges {
    config: CannyConfig,
}

impl CannyEdges {
    pub fn new(config: CannyConfig) -> Self {
        Self { config }
    }
}

impl EdgeExtractor for CannyEdges {
    fn extract(&self, roi: &GrayImage) -> GrayImage {
        let (w, h) = roi.dimensions();
        if w == 0 || h == 0 {
            return GrayImage::new(w, h);
        }
        imageproc::edges::canny(
            &self.smoothed(roi),
            self.config.low_threshold,
            self.config.high_threshold,
        )
    }

    fn smoothed(&self, roi: &GrayImage) -> GrayImage {
        let (w, h) = roi.dimensions();
        if self.config.blur_sigma > 0.0 && w > 0 && h > 0 {
            imageproc::filter::gaussian_blur_f32(roi, self.config.blur_sigma)
        } else {
            roi.clone()
        }
    }
}

/// Binarizes by a fixed intensity level.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdEdges {
    pub level: u8,
}

impl EdgeExtractor for ThresholdEdges {
    fn extract(&self, roi: &GrayImage) -> GrayImage {
        let mut out = GrayImage::new(roi.width(), roi.height());
        for (src, dst) in roi.pixels().zip(out.pixels_mut()) {
            if src[0] > self.level {
                *dst = Luma([255]);
            }
        }
        out
    }
}
