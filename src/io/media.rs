// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Photo loading.
//!
//! This module reads the chosen file, decodes it, and redraws it at the
//! size that fits the viewport. Downscaling resamples the photo and loses
//! some detail.

use crate::models::raster::RasterImage;
use crate::util::geometry::fit_to_viewport;
use anyhow::{Context, Result};
use image::imageops::FilterType;
use std::path::Path;

/// File extensions offered in the open dialog and accepted on drop.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "gif", "webp", "tiff", "tif"];

/// Whether `path` has one of the supported image extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// Read the raw bytes of the chosen photo.
pub fn read_source(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Decode `bytes` and redraw the photo so it fits `(max_width, max_height)`.
pub fn decode_for_display(bytes: &[u8], max_width: f64, max_height: f64) -> Result<RasterImage> {
    let decoded = image::load_from_memory(bytes).context("Failed to decode image")?;
    let source = decoded.to_rgba8();
    let (width, height) = source.dimensions();

    let fit = fit_to_viewport(width as f64, height as f64, max_width, max_height);
    let (surface_width, surface_height) = fit.surface_size();

    log::info!(
        "Decoded {}x{} photo, display surface {}x{} (scale {:.3})",
        width,
        height,
        surface_width,
        surface_height,
        fit.scale
    );

    if (surface_width, surface_height) == (width, height) {
        return Ok(RasterImage::from_rgba(source)?);
    }

    let resized = image::imageops::resize(&source, surface_width, surface_height, FilterType::Triangle);
    Ok(RasterImage::from_rgba(resized)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba(color));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_decode_scales_to_viewport() {
        let bytes = png_bytes(1000, 1000, [255, 255, 255, 255]);
        let raster = decode_for_display(&bytes, 800.0, 800.0).unwrap();
        assert_eq!((raster.width(), raster.height()), (800, 800));
        assert_eq!(raster.sample(400, 400).map(|p| p.r), Some(255));
    }

    #[test]
    fn test_decode_keeps_small_images() {
        let bytes = png_bytes(64, 32, [1, 2, 3, 255]);
        let raster = decode_for_display(&bytes, 800.0, 600.0).unwrap();
        assert_eq!((raster.width(), raster.height()), (64, 32));
        assert_eq!(raster.sample(0, 0).map(|p| (p.r, p.g, p.b)), Some((1, 2, 3)));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_for_display(b"not an image", 800.0, 600.0).is_err());
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported_image(Path::new("car.JPG")));
        assert!(is_supported_image(Path::new("/tmp/car.png")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }
}
