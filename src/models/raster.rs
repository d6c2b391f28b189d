// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! In-memory RGBA raster backing the display surface.
//!
//! A `RasterImage` is created when a photo is loaded, redrawn at the
//! fitted display size, and later painted over by the masking step.

use image::RgbaImage;

/// Bytes per pixel in the RGBA buffer.
pub const CHANNELS: usize = 4;

/// Errors raised when a pixel buffer does not match its dimensions.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

/// A single pixel read from the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSample {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Row-major RGBA raster, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap an existing buffer, checking `width * height * 4 == pixels.len()`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(RasterError::BufferSize {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Take over the buffer of a decoded `image` raster.
    pub fn from_rgba(image: RgbaImage) -> Result<Self, RasterError> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }

    /// Create a raster where every pixel has the same value.
    #[cfg(test)]
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let pixels = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read the pixel at (x, y), or `None` when out of bounds.
    pub fn sample(&self, x: u32, y: u32) -> Option<ColorSample> {
        let idx = self.offset(x, y)?;
        let px = &self.pixels[idx..idx + CHANNELS];
        Some(ColorSample {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        })
    }

    /// Overwrite the pixel at (x, y). Out-of-bounds writes are ignored.
    pub fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if let Some(idx) = self.offset(x, y) {
            self.pixels[idx..idx + CHANNELS].copy_from_slice(&rgba);
        }
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_mismatched_buffer() {
        let err = RasterImage::new(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            err,
            RasterError::BufferSize {
                expected: 16,
                actual: 15,
                ..
            }
        ));
    }

    #[test]
    fn test_sample_and_put() {
        let mut raster = RasterImage::filled(3, 2, [10, 20, 30, 255]);
        raster.put(2, 1, [1, 2, 3, 4]);

        assert_eq!(
            raster.sample(2, 1),
            Some(ColorSample {
                r: 1,
                g: 2,
                b: 3,
                a: 4
            })
        );
        assert_eq!(raster.sample(0, 0).map(|s| s.g), Some(20));
        assert_eq!(raster.sample(3, 0), None);
        assert_eq!(raster.pixels().len(), 3 * 2 * CHANNELS);
    }

    #[test]
    fn test_from_rgba_keeps_pixels() {
        let mut image = RgbaImage::from_pixel(4, 4, image::Rgba([0, 0, 0, 255]));
        image.put_pixel(1, 3, image::Rgba([200, 100, 50, 255]));

        let raster = RasterImage::from_rgba(image).unwrap();
        assert_eq!((raster.width(), raster.height()), (4, 4));
        assert_eq!(
            raster.sample(1, 3),
            Some(ColorSample {
                r: 200,
                g: 100,
                b: 50,
                a: 255
            })
        );
    }
}
