//! Measurement configuration and its validation.
//!
//! Every rule that does not depend on the input images is checked by
//! [`MeasureConfig::validate`]; ROI-vs-image bounds are checked by the
//! pipeline over the whole batch before any image is processed.

use std::path::Path;

use crate::circle::RansacConfig;
use crate::edges::EdgeConfig;
use crate::sampling::SamplingConfig;
use crate::side::{RegionOfInterest, Side};

// ── Errors ─────────────────────────────────────────────────────────────────

/// Invalid configuration, reported before any per-image work.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// RANSAC iteration budget is zero.
    ZeroIterations { side: Side },
    /// Minimum inlier ratio outside [0, 1] or not finite.
    InvalidMinInlierRatio { side: Side, value: f32 },
    /// Inlier tolerance not strictly positive and finite.
    InvalidTolerance { side: Side, value: f64 },
    /// ROI with zero width or height.
    EmptyRoi {
        side: Side,
        roi: RegionOfInterest,
    },
    /// ROI extends past the borders of an input image.
    RoiOutOfBounds {
        side: Side,
        roi: RegionOfInterest,
        image_index: usize,
        image_size: [u32; 2],
    },
    /// Sampling stride is zero.
    ZeroStride,
    /// Edge extractor parameters are out of range.
    InvalidEdgeParams { reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroIterations { side } => {
                write!(f, "{side} side: iteration count must be at least 1")
            }
            Self::InvalidMinInlierRatio { side, value } => write!(
                f,
                "{side} side: minimum inlier ratio must be in [0, 1], got {value}"
            ),
            Self::InvalidTolerance { side, value } => write!(
                f,
                "{side} side: inlier tolerance must be finite and > 0, got {value}"
            ),
            Self::EmptyRoi { side, roi } => {
                write!(f, "{side} side: ROI {roi} has zero width or height")
            }
            Self::RoiOutOfBounds {
                side,
                roi,
                image_index,
                image_size,
            } => write!(
                f,
                "{side} side: ROI {roi} exceeds image {image_index} of size {}x{}",
                image_size[0], image_size[1]
            ),
            Self::ZeroStride => write!(f, "sampling stride must be at least 1"),
            Self::InvalidEdgeParams { reason } => write!(f, "edge extraction: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure to load a configuration file.
#[derive(Debug)]
pub enum ConfigLoadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(ConfigError),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read config: {e}"),
            Self::Parse(e) => write!(f, "cannot parse config: {e}"),
            Self::Invalid(e) => write!(f, "invalid config: {e}"),
        }
    }
}

impl std::error::Error for ConfigLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(e) => Some(e),
        }
    }
}

// ── Config ─────────────────────────────────────────────────────────────────

/// Per-side measurement settings.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SideConfig {
    /// Window cropped from each source image.
    pub roi: RegionOfInterest,
    /// Estimator settings for this side.
    #[serde(default)]
    pub ransac: RansacConfig,
}

impl SideConfig {
    /// Default left arc window of the reference camera setup.
    pub fn default_left() -> Self {
        Self {
            roi: RegionOfInterest::new(520, 980, 220, 400),
            ransac: RansacConfig::default(),
        }
    }

    /// Default right arc window of the reference camera setup.
    pub fn default_right() -> Self {
        Self {
            roi: RegionOfInterest::new(1520, 980, 220, 400),
            ransac: RansacConfig::default(),
        }
    }

    fn validate(&self, side: Side) -> Result<(), ConfigError> {
        let ransac = &self.ransac;
        if ransac.iterations == 0 {
            return Err(ConfigError::ZeroIterations { side });
        }
        if !(0.0..=1.0).contains(&ransac.min_inlier_ratio) {
            return Err(ConfigError::InvalidMinInlierRatio {
                side,
                value: ransac.min_inlier_ratio,
            });
        }
        if !ransac.inlier_tolerance_px.is_finite() || ransac.inlier_tolerance_px <= 0.0 {
            return Err(ConfigError::InvalidTolerance {
                side,
                value: ransac.inlier_tolerance_px,
            });
        }
        if self.roi.is_empty() {
            return Err(ConfigError::EmptyRoi {
                side,
                roi: self.roi,
            });
        }
        Ok(())
    }
}

/// Full measurement configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    pub left: SideConfig,
    pub right: SideConfig,
    pub sampling: SamplingConfig,
    pub edges: EdgeConfig,
    /// Batch seed for the per-slot random sources. Drawn from OS entropy when
    /// unset, in which case runs are not reproducible.
    pub seed: Option<u64>,
    /// Process (image, side) slots in parallel.
    pub parallel: bool,
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            left: SideConfig::default_left(),
            right: SideConfig::default_right(),
            sampling: SamplingConfig::default(),
            edges: EdgeConfig::default(),
            seed: None,
            parallel: true,
        }
    }
}

impl MeasureConfig {
    pub fn side(&self, side: Side) -> &SideConfig {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideConfig {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Check every image-independent rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for side in Side::ALL {
            self.side(side).validate(side)?;
        }
        if self.sampling.stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        self.edges
            .check()
            .map_err(|reason| ConfigError::InvalidEdgeParams { reason })
    }

    /// Check that both ROIs fit inside every image of the batch.
    pub fn validate_for_images<I>(&self, sizes: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        for (image_index, (w, h)) in sizes.into_iter().enumerate() {
            for side in Side::ALL {
                let roi = self.side(side).roi;
                if !roi.fits_within(w, h) {
                    return Err(ConfigError::RoiOutOfBounds {
                        side,
                        roi,
                        image_index,
                        image_size: [w, h],
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse a JSON configuration; omitted fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigLoadError::Parse)?;
        config.validate().map_err(ConfigLoadError::Invalid)?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigLoadError> {
        let json = std::fs::read_to_string(path).map_err(ConfigLoadError::Io)?;
        Self::from_json_str(&json)
    }
}
