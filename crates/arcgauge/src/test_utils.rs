//! Shared test utilities for image-based unit tests.

use image::{GrayImage, Luma};
use rand::Rng;

/// Render a filled disk.
///
/// Pixels at distance `d <= radius` from `center` get `fg_pix`, all others
/// `bg_pix`.
pub(crate) fn draw_disk_image(
    w: u32,
    h: u32,
    center: [f32; 2],
    radius: f32,
    fg_pix: u8,
    bg_pix: u8,
) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - center[0];
            let dy = y as f32 - center[1];
            let d = (dx * dx + dy * dy).sqrt();
            let pix = if d <= radius { fg_pix } else { bg_pix };
            img.put_pixel(x, y, Luma([pix]));
        }
    }
    img
}

/// Render a binary edge mask holding one circle outline.
///
/// Pixels with `|d - radius| <= half_width` are 255, all others 0.
pub(crate) fn draw_ring_mask(
    w: u32,
    h: u32,
    center: [f32; 2],
    radius: f32,
    half_width: f32,
) -> GrayImage {
    let mut img = GrayImage::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - center[0];
            let dy = y as f32 - center[1];
            let d = (dx * dx + dy * dy).sqrt();
            if (d - radius).abs() <= half_width {
                img.put_pixel(x, y, Luma([255]));
            }
        }
    }
    img
}

/// Set `count` random pixels on the `stride` grid to 255.
///
/// Grid-aligned so every noise pixel survives subsampling with the same stride.
pub(crate) fn scatter_grid_noise<R: Rng>(img: &mut GrayImage, count: usize, stride: u32, rng: &mut R) {
    let (w, h) = img.dimensions();
    let (nx, ny) = (w.div_ceil(stride), h.div_ceil(stride));
    for _ in 0..count {
        let x = rng.gen_range(0..nx) * stride;
        let y = rng.gen_range(0..ny) * stride;
        img.put_pixel(x, y, Luma([255]));
    }
}
