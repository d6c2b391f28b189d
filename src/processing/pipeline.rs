// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! End-to-end redaction pipeline.
//!
//! One photo selection runs these stages in order on a background thread:
//! read bytes, decode and fit to the viewport, detect the plate, convert
//! its box to pixels, estimate the background color, fill, and export.
//! Detection is the only remote call. Every recoverable condition ends in
//! a [`RedactionOutcome`] rather than an error.

use crate::io::export::{encode_png, generate_filename, ExportSink};
use crate::io::media;
use crate::io::vision::{self, Detector};
use crate::models::detection::{FillColor, NormalizedBoundingBox, PixelRect};
use crate::models::raster::RasterImage;
use crate::models::settings::Settings;
use crate::processing::classify::{classify_region, ClassifyError};
use crate::processing::mask::fill_rect;
use crate::util::geometry::to_pixel_rect;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Identifies one pipeline run. Starting a newer job makes older tokens stale.
#[derive(Debug, Clone)]
pub struct JobToken {
    generation: Arc<AtomicU64>,
    id: u64,
}

impl JobToken {
    /// Claim the next generation, superseding every earlier token.
    pub fn start(generation: &Arc<AtomicU64>) -> Self {
        let id = generation.fetch_add(1, Ordering::SeqCst) + 1;
        Self {
            generation: Arc::clone(generation),
            id,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// False once a later selection has started.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }
}

/// Result of painting over the detected plate.
#[derive(Debug, Clone, PartialEq)]
pub enum MaskResult {
    Masked {
        rect: PixelRect,
        fill: FillColor,
        /// The configured fallback color was used instead of a sampled one.
        fallback: bool,
    },
    NoColorMatch {
        rect: PixelRect,
    },
    DegenerateRect {
        rect: PixelRect,
    },
}

/// What happened to the automatic export.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportStatus {
    Saved(PathBuf),
    Disabled,
    Failed(String),
}

/// Final state of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum RedactionOutcome {
    Redacted {
        rect: PixelRect,
        fill: FillColor,
        fallback: bool,
        raster: RasterImage,
        export: ExportStatus,
    },
    /// No annotation carried the plate label.
    NotDetected,
    NoColorMatch {
        rect: PixelRect,
    },
    DegenerateRect {
        rect: PixelRect,
    },
    /// A newer selection took over before this run finished.
    Superseded,
}

/// Progress reported back to the UI thread.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// The fitted raster is ready to show.
    Displayed(RasterImage),
    /// Reading or decoding errors are reported as text.
    Finished(Result<RedactionOutcome, String>),
}

/// Convert the plate box to pixels, pick a fill color and paint it.
///
/// The raster is only mutated for [`MaskResult::Masked`].
pub fn mask_plate(
    raster: &mut RasterImage,
    bbox: &NormalizedBoundingBox,
    settings: &Settings,
) -> MaskResult {
    let rect = to_pixel_rect(bbox, raster.width(), raster.height());
    if rect.is_empty() {
        return MaskResult::DegenerateRect { rect };
    }

    let (fill, fallback) = match classify_region(raster, &rect, &settings.classifier) {
        Ok(fill) => (fill, false),
        Err(ClassifyError::NoColorMatch) => match settings.fallback_color {
            Some(fill) => (fill, true),
            None => return MaskResult::NoColorMatch { rect },
        },
    };

    fill_rect(raster, &rect, fill);
    MaskResult::Masked {
        rect,
        fill,
        fallback,
    }
}

/// Shared pipeline configuration and collaborators.
pub struct Pipeline {
    settings: Settings,
    detector: Arc<dyn Detector>,
    sink: Arc<dyn ExportSink>,
}

impl Pipeline {
    pub fn new(settings: Settings, detector: Arc<dyn Detector>, sink: Arc<dyn ExportSink>) -> Self {
        Self {
            settings,
            detector,
            sink,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run the pipeline for `source` on a background thread.
    ///
    /// Events are tagged with the job id. Send failures mean the receiver
    /// moved on to a newer job and are ignored.
    pub fn spawn(
        self: &Arc<Self>,
        token: JobToken,
        source: PathBuf,
        bounds: (f64, f64),
        sender: Sender<(u64, PipelineEvent)>,
    ) {
        let pipeline = Arc::clone(self);
        std::thread::spawn(move || {
            let id = token.id();
            pipeline.run(&token, &source, bounds, |event| {
                let _ = sender.send((id, event));
            });
        });
    }

    /// Run every stage synchronously, reporting through `emit`.
    pub fn run(
        &self,
        token: &JobToken,
        source: &Path,
        (max_width, max_height): (f64, f64),
        mut emit: impl FnMut(PipelineEvent),
    ) {
        log::info!("Job {}: processing {}", token.id(), source.display());

        let loaded = media::read_source(source).and_then(|bytes| {
            let raster = media::decode_for_display(&bytes, max_width, max_height)?;
            Ok((bytes, raster))
        });
        let (bytes, raster) = match loaded {
            Ok(loaded) => loaded,
            Err(e) => {
                log::error!("Job {}: {:#}", token.id(), e);
                emit(PipelineEvent::Finished(Err(format!("{e:#}"))));
                return;
            }
        };

        if !token.is_current() {
            log::warn!("Job {} superseded before display", token.id());
            emit(PipelineEvent::Finished(Ok(RedactionOutcome::Superseded)));
            return;
        }
        emit(PipelineEvent::Displayed(raster.clone()));

        let outcome = self.redact(token, &bytes, raster);
        emit(PipelineEvent::Finished(Ok(outcome)));
    }

    /// Detect, mask and export on an already displayed raster.
    pub fn redact(&self, token: &JobToken, encoded: &[u8], mut raster: RasterImage) -> RedactionOutcome {
        let detected = vision::detect(self.detector.as_ref(), encoded, &self.settings.target_label);

        if !token.is_current() {
            log::warn!("Job {} superseded during detection", token.id());
            return RedactionOutcome::Superseded;
        }

        let Some(bbox) = detected else {
            log::warn!("Job {}: no '{}' found", token.id(), self.settings.target_label);
            return RedactionOutcome::NotDetected;
        };

        match mask_plate(&mut raster, &bbox, &self.settings) {
            MaskResult::DegenerateRect { rect } => {
                log::warn!("Job {}: plate box {} has no area, nothing to mask", token.id(), rect);
                RedactionOutcome::DegenerateRect { rect }
            }
            MaskResult::NoColorMatch { rect } => {
                log::warn!("Job {}: no white or yellow background in {}", token.id(), rect);
                RedactionOutcome::NoColorMatch { rect }
            }
            MaskResult::Masked {
                rect,
                fill,
                fallback,
            } => {
                log::info!("Job {}: masked {} with {}", token.id(), rect, fill);
                if !token.is_current() {
                    log::warn!("Job {} superseded before export", token.id());
                    return RedactionOutcome::Superseded;
                }
                let export = self.export(&raster);
                RedactionOutcome::Redacted {
                    rect,
                    fill,
                    fallback,
                    raster,
                    export,
                }
            }
        }
    }

    fn export(&self, raster: &RasterImage) -> ExportStatus {
        if !self.settings.auto_export {
            return ExportStatus::Disabled;
        }

        let saved: Result<PathBuf> =
            encode_png(raster).and_then(|png| self.sink.save(&png, &generate_filename()));
        match saved {
            Ok(path) => {
                log::info!("Exported masked image to {}", path.display());
                ExportStatus::Saved(path)
            }
            Err(e) => {
                log::error!("Export failed: {:#}", e);
                ExportStatus::Failed(format!("{e:#}"))
            }
        }
    }
}
