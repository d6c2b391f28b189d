// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Export of the masked photo.
//!
//! The raster is encoded losslessly as PNG and handed to an [`ExportSink`]
//! under a generated, practically unique name.

use crate::models::raster::RasterImage;
use anyhow::{Context, Result};
use chrono::Local;
use image::ImageEncoder;
use rand::Rng;
use std::path::{Path, PathBuf};

/// Destination for exported images.
pub trait ExportSink: Send + Sync {
    /// Persist `png` under `filename`, returning where it ended up.
    fn save(&self, png: &[u8], filename: &str) -> Result<PathBuf>;
}

/// Writes exports into a directory, creating it on first use.
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectorySink {
    fn save(&self, png: &[u8], filename: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, png).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

/// Encode the raster as PNG.
pub fn encode_png(raster: &RasterImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(
            raster.pixels(),
            raster.width(),
            raster.height(),
            image::ExtendedColorType::Rgba8,
        )
        .context("PNG encoding failed")?;
    Ok(png)
}

/// `plate-masked-<timestamp>-<random>.png`
pub fn generate_filename() -> String {
    let ts = Local::now().format("%Y%m%d-%H%M%S");
    let rand = rand::thread_rng().gen_range(1000..10000);
    format!("plate-masked-{ts}-{rand}.png")
}

/// Encode and write the raster to an explicit path (Save As).
pub fn save_png(raster: &RasterImage, path: &Path) -> Result<()> {
    let png = encode_png(raster)?;
    std::fs::write(path, png).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_png_is_lossless() {
        let mut raster = RasterImage::filled(5, 3, [12, 34, 56, 255]);
        raster.put(4, 2, [255, 255, 0, 255]);

        let png = encode_png(&raster).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(RasterImage::from_rgba(decoded).unwrap(), raster);
    }

    #[test]
    fn test_filename_shape() {
        let name = generate_filename();
        assert!(name.starts_with("plate-masked-"));
        assert!(name.ends_with(".png"));

        let stem = name.trim_start_matches("plate-masked-").trim_end_matches(".png");
        let parts: Vec<&str> = stem.split('-').collect();
        assert_eq!(parts.len(), 3, "{name}");
        assert_eq!(parts[0].len(), 8);
        assert_eq!(parts[1].len(), 6);
        let suffix: u32 = parts[2].parse().unwrap();
        assert!((1000..10000).contains(&suffix));
    }

    #[test]
    fn test_directory_sink_creates_dir() {
        let dir = tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));

        let path = sink.save(b"png-bytes", "a.png").unwrap();
        assert_eq!(path, dir.path().join("out").join("a.png"));
        assert_eq!(std::fs::read(&path).unwrap(), b"png-bytes");
    }

    #[test]
    fn test_save_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("masked.png");
        let raster = RasterImage::filled(2, 2, [255, 255, 255, 255]);

        save_png(&raster, &path).unwrap();
        let decoded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
    }
}
