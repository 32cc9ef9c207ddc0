//! Batch reports and overlay rendering.
//!
//! Everything here works in source-image coordinates: ROI-local results are
//! translated by the side's ROI origin.

use std::fmt::Write as _;

use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut};
use serde::Serialize;

use crate::circle::Improvement;
use crate::geometry::{Circle, Point2D};
use crate::pipeline::{BatchMeasurements, SideMeasurements, SlotOutcome};
use crate::side::{RegionOfInterest, Side};

const OVERLAY_INK: Luma<u8> = Luma([0]);
const CENTER_DOT_RADIUS: i32 = 2;
const FRAME_SAMPLE_DOT_RADIUS: i32 = 5;
const FRAME_DARK_INK: Luma<u8> = Luma([128]);
/// Mean intensity below which a frame background counts as dark.
const FRAME_DARK_MEAN: u64 = 64;

/// Name and size of one input image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub name: String,
    pub width: u32,
    pub height: u32,
}

/// One side of one image, as written to the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideReport {
    pub roi: RegionOfInterest,
    #[serde(flatten)]
    pub outcome: SlotOutcome,
    /// Circle center in source-image coordinates, when measured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_in_image: Option<Point2D>,
}

impl SideReport {
    fn new(side: &SideMeasurements, image_index: usize) -> Option<Self> {
        let outcome = *side.get(image_index)?;
        Some(Self {
            roi: side.roi,
            outcome,
            center_in_image: outcome.measured().map(|m| m.center_in_image(&side.roi)),
        })
    }

    /// Fitted circle in source-image coordinates, when measured.
    pub fn circle_in_image(&self) -> Option<Circle> {
        self.outcome.measured().map(|m| m.circle_in_image(&self.roi))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReport {
    pub image: ImageInfo,
    pub left: SideReport,
    pub right: SideReport,
}

impl ImageReport {
    pub fn side(&self, side: Side) -> &SideReport {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Per-image report of a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    /// Batch seed; rerunning with it reproduces every slot.
    pub seed: u64,
    pub images: Vec<ImageReport>,
}

impl BatchReport {
    /// Pair batch measurements with the images they were taken from.
    ///
    /// `images` must be in batch order; entries beyond the measured images
    /// are ignored.
    pub fn new(images: Vec<ImageInfo>, batch: &BatchMeasurements) -> Self {
        let images = images
            .into_iter()
            .enumerate()
            .filter_map(|(i, image)| {
                Some(ImageReport {
                    image,
                    left: SideReport::new(&batch.left, i)?,
                    right: SideReport::new(&batch.right, i)?,
                })
            })
            .collect();
        Self {
            seed: batch.seed,
            images,
        }
    }

    /// Human-readable report, one block per image.
    ///
    /// ```text
    /// Image filename: 0001.bmp
    ///
    /// Left semicircle:
    /// center: [630.412, 1180.073]
    /// radius: 184.551
    /// inlier percentage: 0.7143
    /// ```
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        if let Err(e) = self.write_text(&mut out) {
            tracing::error!("text report truncated: {e}");
        }
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        for (i, entry) in self.images.iter().enumerate() {
            if i > 0 {
                writeln!(out)?;
            }
            writeln!(out, "Image filename: {}", entry.image.name)?;
            for side in Side::ALL {
                write_side(out, side, entry.side(side))?;
            }
        }
        Ok(())
    }
}

fn write_side(out: &mut String, side: Side, report: &SideReport) -> std::fmt::Result {
    let title = match side {
        Side::Left => "Left",
        Side::Right => "Right",
    };
    writeln!(out)?;
    writeln!(out, "{title} semicircle:")?;
    match &report.outcome {
        SlotOutcome::Measured(m) => {
            let c = m.center_in_image(&report.roi);
            writeln!(out, "center: [{:.3}, {:.3}]", c.x, c.y)?;
            writeln!(out, "radius: {:.3}", m.radius)?;
            writeln!(out, "inlier percentage: {:.4}", m.inlier_ratio)
        }
        SlotOutcome::Unmeasured { reason } => writeln!(out, "unmeasured ({reason})"),
    }
}

fn draw_circle(canvas: &mut GrayImage, circle: &Circle, ink: Luma<u8>) {
    let center = (
        circle.center.x.round() as i32,
        circle.center.y.round() as i32,
    );
    let radius = circle.radius.round() as i32;
    // Two passes for a line that survives JPEG compression.
    draw_hollow_circle_mut(canvas, center, radius, ink);
    draw_hollow_circle_mut(canvas, center, radius + 1, ink);
    draw_filled_circle_mut(canvas, center, CENTER_DOT_RADIUS, ink);
}

/// Black on bright backgrounds, mid-gray on dark ones (edge masks).
fn frame_ink(canvas: &GrayImage) -> Luma<u8> {
    let n = u64::from(canvas.width()) * u64::from(canvas.height());
    let sum: u64 = canvas.pixels().map(|p| u64::from(p[0])).sum();
    if n > 0 && sum / n >= FRAME_DARK_MEAN {
        OVERLAY_INK
    } else {
        FRAME_DARK_INK
    }
}

/// Copy of `image` with every measured circle of `entry` and its center drawn.
pub fn draw_overlay(image: &GrayImage, entry: &ImageReport) -> GrayImage {
    let mut canvas = image.clone();
    for side in Side::ALL {
        if let Some(circle) = entry.side(side).circle_in_image() {
            draw_circle(&mut canvas, &circle, OVERLAY_INK);
        }
    }
    canvas
}

/// Debug frame for one improvement of the best hypothesis, in ROI-local
/// coordinates: the three drawn sample points as white dots and the circle
/// through them with its center.
///
/// `roi_image` is normally the smoothed ROI
/// ([`crate::MeasurementPipeline::smoothed_roi`]) and the circle is drawn in
/// black. On a mostly dark background such as an edge mask it is drawn in
/// mid-gray so it stays distinct from both background and sample dots.
pub fn render_improvement_frame(roi_image: &GrayImage, improvement: &Improvement) -> GrayImage {
    let mut canvas = roi_image.clone();
    let ink = frame_ink(&canvas);
    for p in &improvement.sample_points {
        draw_filled_circle_mut(
            &mut canvas,
            (p.x.round() as i32, p.y.round() as i32),
            FRAME_SAMPLE_DOT_RADIUS,
            Luma([255]),
        );
    }
    draw_circle(&mut canvas, &improvement.circle, ink);
    canvas
}
