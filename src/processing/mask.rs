// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Opaque rectangle fill over the detected plate.

use crate::models::detection::{FillColor, PixelRect};
use crate::models::raster::RasterImage;

/// Paint every pixel of `rect` with `color` at full opacity, in place.
///
/// A zero-area rectangle is a no-op. Parts of the rectangle outside the
/// raster are skipped.
pub fn fill_rect(raster: &mut RasterImage, rect: &PixelRect, color: FillColor) {
    if rect.is_empty() {
        return;
    }

    let rgba = color.to_rgba();
    let right = rect.x.saturating_add(rect.width).min(raster.width());
    let bottom = rect.y.saturating_add(rect.height).min(raster.height());

    for y in rect.y..bottom {
        for x in rect.x..right {
            raster.put(x, y, rgba);
        }
    }
}
