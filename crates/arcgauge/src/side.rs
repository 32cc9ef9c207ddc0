//! Side selection, regions of interest, and the opposite-side masking rule.

use std::ops::Range;

use image::{GrayImage, Luma};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Which of the two arcs is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Both sides in processing order.
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Position of this side in [`Side::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Left => 0,
            Self::Right => 1,
        }
    }

    /// Band zeroed in a `cols × rows` edge mask before sampling.
    ///
    /// Rows `[rows/4, rows/4 + rows/2)` on the half opposite the arc:
    /// columns `[cols/2, cols)` for [`Side::Left`], `[0, cols/2)` for
    /// [`Side::Right`]. Suppresses edges of the adjoining straight segment
    /// so trials draw mostly from the arc of interest.
    pub fn mask_band(self, cols: u32, rows: u32) -> MaskBand {
        let row_start = rows / 4;
        let half = cols / 2;
        MaskBand {
            cols: match self {
                Self::Left => half..cols,
                Self::Right => 0..half,
            },
            rows: row_start..row_start + rows / 2,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// Axis-aligned pixel rectangle zeroed out of an edge mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskBand {
    pub cols: Range<u32>,
    pub rows: Range<u32>,
}

impl MaskBand {
    /// Zero every mask pixel inside the band (clipped to the mask).
    pub fn apply(&self, mask: &mut GrayImage) {
        let (w, h) = mask.dimensions();
        for y in self.rows.start.min(h)..self.rows.end.min(h) {
            for x in self.cols.start.min(w)..self.cols.end.min(w) {
                mask.put_pixel(x, y, Luma([0]));
            }
        }
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        self.cols.contains(&x) && self.rows.contains(&y)
    }
}

/// Rectangular sub-window in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionOfInterest {
    /// Left column of the window.
    pub x: u32,
    /// Top row of the window.
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RegionOfInterest {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Offset that maps ROI-local coordinates to image coordinates.
    pub fn origin(&self) -> Vector2<f64> {
        Vector2::new(self.x as f64, self.y as f64)
    }

    /// Whether the window lies entirely inside a `width × height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x.checked_add(self.width);
        let bottom = self.y.checked_add(self.height);
        matches!((right, bottom), (Some(r), Some(b)) if r <= width && b <= height)
    }

    /// Copy the window out of `image`. The caller checks [`Self::fits_within`].
    pub fn crop(&self, image: &GrayImage) -> GrayImage {
        image::imageops::crop_imm(image, self.x, self.y, self.width, self.height).to_image()
    }
}

impl std::fmt::Display for RegionOfInterest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

impl std::str::FromStr for RegionOfInterest {
    type Err = String;

    /// Parse `x,y,width,height`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, w, h] = parts.as_slice() else {
            return Err(format!("expected x,y,width,height, got '{s}'"));
        };
        let parse = |v: &str, name: &str| {
            v.parse::<u32>()
                .map_err(|e| format!("invalid ROI {name} '{v}': {e}"))
        };
        Ok(Self::new(
            parse(*x, "x")?,
            parse(*y, "y")?,
            parse(*w, "width")?,
            parse(*h, "height")?,
        ))
    }
}
