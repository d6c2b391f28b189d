// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Plate background color estimation.
//!
//! Pixels in the top-left quarter of the plate rectangle are bucketed as
//! near-white or near-yellow by RGB distance to two reference colors. The
//! larger bucket is averaged into the fill color.

use crate::models::detection::{FillColor, PixelRect};
use crate::models::raster::{ColorSample, RasterImage};
use crate::models::settings::ClassifierSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// No sampled pixel was within the threshold of either reference.
    #[error("no sampled pixel matched white or yellow")]
    NoColorMatch,
}

/// Samples grouped by the reference color they matched.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ClassifiedBucket {
    pub white: Vec<ColorSample>,
    pub yellow: Vec<ColorSample>,
}

impl ClassifiedBucket {
    /// The bucket with more samples. Ties go to white.
    pub fn dominant(&self) -> &[ColorSample] {
        if self.yellow.len() > self.white.len() {
            &self.yellow
        } else {
            &self.white
        }
    }
}

/// Euclidean distance in RGB space; alpha is ignored.
pub fn rgb_distance(sample: &ColorSample, reference: [u8; 3]) -> f64 {
    let dr = sample.r as f64 - reference[0] as f64;
    let dg = sample.g as f64 - reference[1] as f64;
    let db = sample.b as f64 - reference[2] as f64;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Read and bucket the `(width / 2) x (height / 2)` window anchored at the
/// rectangle's top-left corner.
pub fn sample_region(
    raster: &RasterImage,
    rect: &PixelRect,
    settings: &ClassifierSettings,
) -> ClassifiedBucket {
    let mut bucket = ClassifiedBucket::default();

    for y in rect.y..rect.y + rect.height / 2 {
        for x in rect.x..rect.x + rect.width / 2 {
            let Some(sample) = raster.sample(x, y) else {
                continue;
            };

            let white = rgb_distance(&sample, settings.white);
            let yellow = rgb_distance(&sample, settings.yellow);

            if white < yellow && white <= settings.threshold {
                bucket.white.push(sample);
            } else if yellow <= settings.threshold {
                bucket.yellow.push(sample);
            }
        }
    }

    bucket
}

/// Per-channel rounded mean of the samples.
pub fn average_color(samples: &[ColorSample]) -> Result<FillColor, ClassifyError> {
    if samples.is_empty() {
        return Err(ClassifyError::NoColorMatch);
    }

    let n = samples.len() as f64;
    let (r, g, b) = samples.iter().fold((0u64, 0u64, 0u64), |(r, g, b), s| {
        (r + s.r as u64, g + s.g as u64, b + s.b as u64)
    });
    let mean = |sum: u64| (sum as f64 / n).round().min(255.0) as u8;

    Ok(FillColor::new(mean(r), mean(g), mean(b)))
}

/// Estimate the plate background color inside `rect`.
pub fn classify_region(
    raster: &RasterImage,
    rect: &PixelRect,
    settings: &ClassifierSettings,
) -> Result<FillColor, ClassifyError> {
    let bucket = sample_region(raster, rect, settings);
    log::debug!(
        "Sampled plate region {}: {} white, {} yellow",
        rect,
        bucket.white.len(),
        bucket.yellow.len()
    );
    average_color(bucket.dominant())
}
