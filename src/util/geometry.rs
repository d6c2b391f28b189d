// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module fits a photo into the viewport and converts the normalized
//! bounding box returned by the detector into a pixel rectangle on the
//! displayed raster.

use crate::models::detection::{NormalizedBoundingBox, NormalizedVertex, PixelRect};

/// Result of fitting an image into viewport bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportFit {
    /// Combined uniform scale applied to the source dimensions.
    pub scale: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportFit {
    /// Integer size of the display surface.
    ///
    /// Fractional sizes are truncated, as assigning them to a drawing
    /// surface does, and never drop below one pixel.
    pub fn surface_size(&self) -> (u32, u32) {
        let to_px = |v: f64| v.floor().max(1.0) as u32;
        (to_px(self.width), to_px(self.height))
    }
}

/// Scale `(width, height)` so it fits within `(max_width, max_height)`.
///
/// Width is checked first. Height is then checked against the already
/// scaled height, and the second factor compounds the first. When both
/// bounds are exceeded this is not the same as applying
/// `min(max_width / width, max_height / height)` once.
pub fn fit_to_viewport(width: f64, height: f64, max_width: f64, max_height: f64) -> ViewportFit {
    let mut fit = ViewportFit {
        scale: 1.0,
        width,
        height,
    };

    if fit.width >= max_width {
        let s = max_width / fit.width;
        fit.scale *= s;
        fit.width = max_width;
        fit.height *= s;
    }

    if fit.height >= max_height {
        let s = max_height / fit.height;
        fit.scale *= s;
        fit.width *= s;
        fit.height = max_height;
    }

    fit
}

/// Convert a normalized vertex to pixel coordinates.
pub fn denormalize_coordinates(point: &NormalizedVertex, width: u32, height: u32) -> (f64, f64) {
    (
        point.x.clamp(0.0, 1.0) * width as f64,
        point.y.clamp(0.0, 1.0) * height as f64,
    )
}

/// Map a normalized bounding box onto a `width` x `height` raster.
///
/// Each scaled edge is rounded on its own before the extents are
/// subtracted. Only the top-left, top-right and bottom-left vertices are
/// read. Inverted edges collapse to a zero-sized rectangle.
pub fn to_pixel_rect(bbox: &NormalizedBoundingBox, width: u32, height: u32) -> PixelRect {
    let (left, top) = denormalize_coordinates(&bbox.top_left(), width, height);
    let (right, _) = denormalize_coordinates(&bbox.top_right(), width, height);
    let (_, bottom) = denormalize_coordinates(&bbox.bottom_left(), width, height);

    let left = left.round() as u32;
    let top = top.round() as u32;
    let right = right.round() as u32;
    let bottom = bottom.round() as u32;

    PixelRect {
        x: left,
        y: top,
        width: right.saturating_sub(left),
        height: bottom.saturating_sub(top),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(points: [(f64, f64); 4]) -> NormalizedBoundingBox {
        NormalizedBoundingBox {
            vertices: points.map(|(x, y)| NormalizedVertex::new(x, y)),
        }
    }

    #[test]
    fn test_fit_square_into_square_viewport() {
        let fit = fit_to_viewport(1000.0, 1000.0, 800.0, 800.0);
        assert_eq!(fit.surface_size(), (800, 800));
        assert!((fit.scale - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_fit_leaves_small_images_alone() {
        let fit = fit_to_viewport(640.0, 480.0, 1024.0, 768.0);
        assert_eq!(fit.scale, 1.0);
        assert_eq!(fit.surface_size(), (640, 480));
    }

    #[test]
    fn test_fit_compounds_width_then_height() {
        // Width pass: 2000x3000 -> 1000x1500, height pass: 1500 -> 600.
        let fit = fit_to_viewport(2000.0, 3000.0, 1000.0, 600.0);
        assert!((fit.scale - 0.2).abs() < 1e-9);
        assert!((fit.width - 400.0).abs() < 1e-9);
        assert_eq!(fit.height, 600.0);
    }

    #[test]
    fn test_fit_height_only() {
        let fit = fit_to_viewport(500.0, 2000.0, 800.0, 1000.0);
        assert_eq!(fit.surface_size(), (250, 1000));
    }

    #[test]
    fn test_fit_respects_bounds_and_aspect() {
        let cases = [
            (1920.0, 1080.0, 1024.0, 614.4),
            (4032.0, 3024.0, 1280.0, 576.0),
            (300.0, 5000.0, 800.0, 600.0),
            (799.0, 601.0, 800.0, 600.0),
            (12.0, 7.0, 5.0, 3.0),
        ];

        for (w, h, max_w, max_h) in cases {
            let fit = fit_to_viewport(w, h, max_w, max_h);
            if w > max_w {
                assert!(fit.width <= max_w + 1e-9, "{w}x{h} in {max_w}x{max_h}");
            }
            if h > max_h {
                assert!(fit.height <= max_h + 1e-9, "{w}x{h} in {max_w}x{max_h}");
            }
            let ratio = fit.width / fit.height;
            assert!((ratio - w / h).abs() < 1e-6, "{w}x{h} in {max_w}x{max_h}");
        }
    }

    #[test]
    fn test_pixel_rect_from_detector_box() {
        let plate = bbox([(0.0, 0.0), (0.5, 0.0), (0.5, 0.3), (0.0, 0.3)]);
        let rect = to_pixel_rect(&plate, 800, 600);
        assert_eq!(
            rect,
            PixelRect {
                x: 0,
                y: 0,
                width: 400,
                height: 180
            }
        );
    }

    #[test]
    fn test_pixel_rect_rounds_edges_before_subtracting() {
        // Edges at 10.4 -> 10 and 20.6 -> 21; rounding the raw width
        // (10.2) would give 10 instead of 11.
        let plate = bbox([(0.104, 0.104), (0.206, 0.104), (0.206, 0.206), (0.104, 0.206)]);
        let rect = to_pixel_rect(&plate, 100, 100);
        assert_eq!((rect.x, rect.y, rect.width, rect.height), (10, 10, 11, 11));
    }

    #[test]
    fn test_pixel_rect_ignores_bottom_right_vertex() {
        let a = bbox([(0.2, 0.2), (0.6, 0.2), (0.6, 0.5), (0.2, 0.5)]);
        let b = bbox([(0.2, 0.2), (0.6, 0.2), (0.9, 0.9), (0.2, 0.5)]);
        assert_eq!(to_pixel_rect(&a, 640, 480), to_pixel_rect(&b, 640, 480));
    }

    #[test]
    fn test_pixel_rect_is_repeatable() {
        let plate = bbox([(0.31, 0.62), (0.47, 0.62), (0.47, 0.7), (0.31, 0.7)]);
        let first = to_pixel_rect(&plate, 1023, 767);
        for _ in 0..5 {
            assert_eq!(to_pixel_rect(&plate, 1023, 767), first);
        }
    }

    #[test]
    fn test_pixel_rect_stays_in_bounds() {
        let plate = bbox([(-0.1, 0.9), (1.3, 0.9), (1.3, 1.2), (-0.1, 1.2)]);
        let rect = to_pixel_rect(&plate, 200, 100);
        assert!(rect.x + rect.width <= 200);
        assert!(rect.y + rect.height <= 100);
    }

    #[test]
    fn test_degenerate_box_has_zero_area() {
        let line = bbox([(0.4, 0.4), (0.4, 0.4), (0.4, 0.6), (0.4, 0.6)]);
        assert!(to_pixel_rect(&line, 100, 100).is_empty());

        let inverted = bbox([(0.6, 0.4), (0.2, 0.4), (0.2, 0.6), (0.6, 0.6)]);
        assert_eq!(to_pixel_rect(&inverted, 100, 100).width, 0);
    }
}
