//! Per-cell intensity extraction.
//!
//! Each output cell averages luminance over a small window of source pixels
//! (area sampling, so fine detail does not alias into noise on downscale)
//! and subtracts a Sobel edge term so outlines keep their ink at coarse grid
//! sizes. Cells are independent pure functions of the source; nothing here
//! holds state between calls.

use crate::geometry::OutputGeometry;
use crate::source::PixelSource;

const CHANNEL_MAX: f64 = 65535.0;

// BT.709 luma weights.
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

// Area window bounds. The floor keeps a little anti-aliasing even at 1:1
// scale; the cap bounds per-cell cost at 16 samples.
const MIN_WINDOW: u32 = 2;
const MAX_WINDOW: u32 = 4;

/// Weight of the edge term when darkening outline cells.
const EDGE_WEIGHT: f64 = 0.3;

const SOBEL_X: [[f64; 3]; 3] = [
    [-1.0, 0.0, 1.0],
    [-2.0, 0.0, 2.0],
    [-1.0, 0.0, 1.0],
];
const SOBEL_Y: [[f64; 3]; 3] = [
    [-1.0, -2.0, -1.0],
    [0.0, 0.0, 0.0],
    [1.0, 2.0, 1.0],
];

/// Intensity of one output cell, in `[0.0, 1.0]` with 0.0 darkest.
///
/// Area luminance sets the base tone; the Sobel magnitude then pulls cells
/// sitting on a contrast boundary toward the dark end. A flat region has
/// zero gradient, so its intensity is exactly its luminance.
pub fn intensity_at(
    source: &PixelSource,
    geometry: &OutputGeometry,
    cell_x: u32,
    cell_y: u32,
) -> f64 {
    let center_x = geometry.source_x(cell_x);
    let center_y = geometry.source_y(cell_y);

    let luminance = area_luminance(source, geometry, center_x, center_y);
    let edge = edge_magnitude(source, center_x, center_y);

    (luminance - EDGE_WEIGHT * edge).clamp(0.0, 1.0)
}

/// Luminance of one source pixel in `[0.0, 1.0]`, composited over white so
/// transparent regions read as blank rather than black.
fn pixel_luminance(source: &PixelSource, x: u32, y: u32) -> f64 {
    let [r, g, b, a] = source.sample(x, y);
    let alpha = f64::from(a) / CHANNEL_MAX;
    let r = f64::from(r) * alpha + CHANNEL_MAX * (1.0 - alpha);
    let g = f64::from(g) * alpha + CHANNEL_MAX * (1.0 - alpha);
    let b = f64::from(b) * alpha + CHANNEL_MAX * (1.0 - alpha);
    (LUMA_R * r + LUMA_G * g + LUMA_B * b) / CHANNEL_MAX
}

/// Side length of the square sampling window for a given downscale ratio.
fn window_extent(source_width: u32, target_width: u32) -> i64 {
    let ratio = source_width / target_width.max(1);
    i64::from(ratio.clamp(MIN_WINDOW, MAX_WINDOW))
}

/// Average luminance over the sampling window centered on the mapped source
/// pixel. Offsets that fall outside the image are skipped, so the window
/// clips at the border instead of wrapping.
fn area_luminance(
    source: &PixelSource,
    geometry: &OutputGeometry,
    center_x: u32,
    center_y: u32,
) -> f64 {
    let extent = window_extent(source.width(), geometry.target_width);
    let half = extent / 2;

    let mut total = 0.0;
    let mut count = 0u32;
    for dy in -half..(extent - half) {
        for dx in -half..(extent - half) {
            let x = i64::from(center_x) + dx;
            let y = i64::from(center_y) + dy;
            if x < 0 || y < 0 || x >= i64::from(source.width()) || y >= i64::from(source.height()) {
                continue;
            }
            total += pixel_luminance(source, x as u32, y as u32);
            count += 1;
        }
    }

    // Offset 0 keeps the center pixel inside every window, so count >= 1.
    total / f64::from(count.max(1))
}

/// Sobel gradient magnitude at the mapped source pixel, clamped to `[0, 1]`.
/// Border taps clamp to the nearest valid coordinate.
fn edge_magnitude(source: &PixelSource, center_x: u32, center_y: u32) -> f64 {
    let max_x = i64::from(source.width()) - 1;
    let max_y = i64::from(source.height()) - 1;

    let mut gx = 0.0;
    let mut gy = 0.0;
    for dy in -1i64..=1 {
        for dx in -1i64..=1 {
            let x = (i64::from(center_x) + dx).clamp(0, max_x) as u32;
            let y = (i64::from(center_y) + dy).clamp(0, max_y) as u32;
            let luminance = pixel_luminance(source, x, y);
            gx += luminance * SOBEL_X[(dy + 1) as usize][(dx + 1) as usize];
            gy += luminance * SOBEL_Y[(dy + 1) as usize][(dx + 1) as usize];
        }
    }

    (gx * gx + gy * gy).min(1.0)
}

#[cfg(test)]
mod tests {
    use image::{ImageBuffer, Rgba};

    use super::*;
    use crate::geometry;

    fn flat_source(width: u32, height: u32, pixel: [u16; 4]) -> PixelSource {
        PixelSource::from_rgba16(ImageBuffer::from_pixel(width, height, Rgba(pixel)))
            .expect("buffer should wrap")
    }

    fn gray_source(width: u32, height: u32, f: impl Fn(u32, u32) -> u16) -> PixelSource {
        PixelSource::from_rgba16(ImageBuffer::from_fn(width, height, |x, y| {
            let v = f(x, y);
            Rgba([v, v, v, 65535])
        }))
        .expect("buffer should wrap")
    }

    fn same_size_geometry(width: u32, height: u32) -> OutputGeometry {
        OutputGeometry {
            source_width: width,
            source_height: height,
            target_width: width,
            target_height: height,
        }
    }

    #[test]
    fn flat_white_has_full_intensity() {
        let source = flat_source(8, 8, [65535, 65535, 65535, 65535]);
        let geometry = same_size_geometry(8, 8);
        for cell_y in 0..8 {
            for cell_x in 0..8 {
                let intensity = intensity_at(&source, &geometry, cell_x, cell_y);
                assert!((intensity - 1.0).abs() < 1e-9, "cell {cell_x},{cell_y}");
            }
        }
    }

    #[test]
    fn flat_black_has_zero_intensity() {
        let source = flat_source(8, 8, [0, 0, 0, 65535]);
        let geometry = same_size_geometry(8, 8);
        assert_eq!(intensity_at(&source, &geometry, 3, 3), 0.0);
    }

    #[test]
    fn flat_gray_matches_its_luminance() {
        let source = flat_source(6, 6, [32768, 32768, 32768, 65535]);
        let geometry = same_size_geometry(6, 6);
        let intensity = intensity_at(&source, &geometry, 2, 2);
        assert!((intensity - 0.5).abs() < 1e-3);
    }

    #[test]
    fn transparent_pixels_read_as_white() {
        let source = flat_source(4, 4, [0, 0, 0, 0]);
        let geometry = same_size_geometry(4, 4);
        let intensity = intensity_at(&source, &geometry, 1, 1);
        assert!((intensity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn single_pixel_source_never_panics() {
        let source = flat_source(1, 1, [65535, 0, 0, 65535]);
        let geometry = same_size_geometry(1, 1);
        let intensity = intensity_at(&source, &geometry, 0, 0);
        assert!((0.0..=1.0).contains(&intensity));
    }

    #[test]
    fn window_extent_tracks_downscale_ratio() {
        assert_eq!(window_extent(10, 10), 2);
        assert_eq!(window_extent(10, 40), 2);
        assert_eq!(window_extent(30, 10), 3);
        assert_eq!(window_extent(80, 10), 4);
        assert_eq!(window_extent(80, 0), 4);
    }

    #[test]
    fn edges_darken_contrast_boundaries() {
        // Left half black, right half white.
        let source = gray_source(8, 8, |x, _| if x < 4 { 0 } else { 65535 });
        let geometry = same_size_geometry(8, 8);

        let boundary = intensity_at(&source, &geometry, 4, 4);
        let deep_white = intensity_at(&source, &geometry, 6, 4);

        assert!((deep_white - 1.0).abs() < 1e-9);
        assert!(boundary < deep_white);
        assert!(boundary >= 0.0);
    }

    #[test]
    fn horizontal_gradient_is_monotone() {
        let source = gray_source(32, 4, |x, _| (x * 65535 / 31) as u16);
        let geometry = geometry::plan(32, 4, 16, 16);
        assert_eq!(geometry.target_width, 16);

        let mut previous = -1.0;
        for cell_x in 0..geometry.target_width {
            let intensity = intensity_at(&source, &geometry, cell_x, 0);
            assert!(
                intensity >= previous,
                "intensity fell at cell {cell_x}: {intensity} < {previous}"
            );
            previous = intensity;
        }
    }

    #[test]
    fn intensity_stays_in_unit_range() {
        let source = gray_source(16, 16, |x, y| ((x * 7919 + y * 104729) % 65536) as u16);
        let geometry = geometry::plan(16, 16, 8, 8);
        for cell_y in 0..geometry.target_height {
            for cell_x in 0..geometry.target_width {
                let intensity = intensity_at(&source, &geometry, cell_x, cell_y);
                assert!((0.0..=1.0).contains(&intensity), "cell {cell_x},{cell_y}");
            }
        }
    }
}
