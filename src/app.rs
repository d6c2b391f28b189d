// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the display surface and the single in-flight pipeline
//! job. Choosing a new photo supersedes whatever job is running: its
//! generation becomes stale and its event channel is dropped.

use crate::io::{export, media};
use crate::models::raster::RasterImage;
use crate::processing::pipeline::{
    ExportStatus, JobToken, Pipeline, PipelineEvent, RedactionOutcome,
};
use crate::ui::{canvas, toolbar};
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;

/// Severity of the message shown in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Warning,
    Error,
}

/// User-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Turn a finished pipeline run into the message shown to the user.
pub fn describe_outcome(outcome: &RedactionOutcome, label: &str) -> Option<Notice> {
    let notice = match outcome {
        RedactionOutcome::Redacted {
            fill,
            fallback,
            export,
            ..
        } => {
            let how = if *fallback { "fallback color" } else { "plate color" };
            match export {
                ExportStatus::Saved(path) => Notice::info(format!(
                    "Plate masked with {how} {fill}, saved to {}",
                    path.display()
                )),
                ExportStatus::Disabled => Notice::info(format!("Plate masked with {how} {fill}")),
                ExportStatus::Failed(e) => {
                    Notice::error(format!("Plate masked with {how} {fill}, but export failed: {e}"))
                }
            }
        }
        RedactionOutcome::NotDetected => Notice::warning(format!("{label} not detected")),
        RedactionOutcome::NoColorMatch { .. } => Notice::warning(format!(
            "{label} found, but its background is neither white nor yellow; image left unchanged"
        )),
        RedactionOutcome::DegenerateRect { .. } => {
            Notice::warning(format!("{label} region is empty; image left unchanged"))
        }
        RedactionOutcome::Superseded => return None,
    };
    Some(notice)
}

/// Main application state.
pub struct PlateMaskApp {
    pipeline: Arc<Pipeline>,

    /// Shared job generation; bumped on every new selection
    generation: Arc<AtomicU64>,

    /// Events of the current job
    events: Option<Receiver<(u64, PipelineEvent)>>,

    /// Id of the job whose events are accepted
    current_job: Option<u64>,

    /// Raster currently on the display surface
    raster: Option<RasterImage>,

    /// Texture mirroring `raster`
    texture: Option<egui::TextureHandle>,

    /// Photo the raster came from
    source: Option<PathBuf>,

    /// Progress message while a job runs
    busy_message: Option<String>,

    /// Latest notification
    notice: Option<Notice>,
}

impl PlateMaskApp {
    /// Create a new application instance around a configured pipeline.
    pub fn new(pipeline: Pipeline, has_api_key: bool) -> Self {
        let notice = if has_api_key {
            Some(Notice::info("Open a photo of a vehicle to mask its license plate"))
        } else {
            Some(Notice::warning(format!(
                "No vision API key configured (set {}); plates will not be detected",
                crate::models::settings::API_KEY_ENV
            )))
        };

        Self {
            pipeline: Arc::new(pipeline),
            generation: Arc::new(AtomicU64::new(0)),
            events: None,
            current_job: None,
            raster: None,
            texture: None,
            source: None,
            busy_message: None,
            notice,
        }
    }

    /// Start processing `path`, replacing any job already running.
    fn open_photo(&mut self, path: PathBuf, ctx: &egui::Context) {
        let fraction = self.pipeline.settings().viewport_fraction;
        let screen = ctx.screen_rect().size();
        let bounds = (
            f64::from(screen.x) * fraction,
            f64::from(screen.y) * fraction,
        );

        let token = JobToken::start(&self.generation);
        let (sender, receiver) = channel();
        self.current_job = Some(token.id());
        self.events = Some(receiver);
        self.busy_message = Some("Loading photo...".to_string());
        self.notice = None;
        self.source = Some(path.clone());

        log::info!(
            "Starting job {} for {} within {:.0}x{:.0}",
            token.id(),
            path.display(),
            bounds.0,
            bounds.1
        );
        self.pipeline.spawn(token, path, bounds, sender);
    }

    /// Show a native open dialog and start processing the chosen photo.
    fn pick_photo(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", media::IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.open_photo(path, ctx);
        }
    }

    /// Save the current raster to a user-chosen path.
    fn save_as(&mut self) {
        let Some(ref raster) = self.raster else {
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG", &["png"])
            .set_file_name(export::generate_filename())
            .save_file()
        else {
            return;
        };

        self.notice = Some(match export::save_png(raster, &path) {
            Ok(()) => {
                log::info!("Saved image to {}", path.display());
                Notice::info(format!("Saved to {}", path.display()))
            }
            Err(e) => {
                log::error!("Failed to save image: {:#}", e);
                Notice::error(format!("Failed to save image: {e:#}"))
            }
        });
    }

    /// Replace the displayed raster and its texture.
    fn set_raster(&mut self, raster: RasterImage, ctx: &egui::Context) {
        let size = [raster.width() as usize, raster.height() as usize];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, raster.pixels());
        self.texture = Some(ctx.load_texture("photo", color_image, egui::TextureOptions::LINEAR));
        self.raster = Some(raster);
    }

    /// Drain events of the current job.
    fn poll_events(&mut self, ctx: &egui::Context) {
        let mut received = Vec::new();
        if let Some(ref receiver) = self.events {
            while let Ok(event) = receiver.try_recv() {
                received.push(event);
            }
        }

        for (job, event) in received {
            if Some(job) != self.current_job {
                log::debug!("Dropping event from stale job {}", job);
                continue;
            }

            match event {
                PipelineEvent::Displayed(raster) => {
                    log::info!("Displaying {}x{} raster", raster.width(), raster.height());
                    self.set_raster(raster, ctx);
                    self.busy_message = Some("Looking for the license plate...".to_string());
                }
                PipelineEvent::Finished(Ok(outcome)) => {
                    self.events = None;
                    self.busy_message = None;
                    self.notice = describe_outcome(&outcome, &self.pipeline.settings().target_label);
                    if let RedactionOutcome::Redacted { raster, .. } = outcome {
                        self.set_raster(raster, ctx);
                    }
                }
                PipelineEvent::Finished(Err(e)) => {
                    self.events = None;
                    self.busy_message = None;
                    self.notice = Some(Notice::error(format!("Failed to load photo: {e}")));
                }
            }
        }
    }

    /// Last supported image file dropped onto the window this frame.
    fn dropped_photo(ctx: &egui::Context) -> Option<PathBuf> {
        ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .filter(|path| media::is_supported_image(path))
                .last()
        })
    }
}

impl eframe::App for PlateMaskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events(ctx);

        // Keep polling while a job runs
        if self.busy_message.is_some() {
            ctx.request_repaint();
        }

        if let Some(path) = Self::dropped_photo(ctx) {
            self.open_photo(path, ctx);
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Photo... (Ctrl+O)").clicked() {
                        self.pick_photo(ctx);
                        ui.close_menu();
                    }
                    let can_save = self.raster.is_some();
                    if ui
                        .add_enabled(can_save, egui::Button::new("Save Image As... (Ctrl+S)"))
                        .clicked()
                    {
                        self.save_as();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                toolbar::show(ui, self.raster.is_some(), self.busy_message.is_some())
            })
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::Open => self.pick_photo(ctx),
            toolbar::ToolbarAction::SaveAs => self.save_as(),
            toolbar::ToolbarAction::None => {}
        }

        // Status line
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            toolbar::show_status(ui, self.source.as_deref(), self.notice.as_ref());
        });

        // Shortcuts
        if !ctx.wants_keyboard_input() {
            if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::O)) {
                self.pick_photo(ctx);
            }
            if ctx.input(|i| i.modifiers.command && i.key_pressed(egui::Key::S)) {
                self.save_as();
            }
        }

        // Main canvas (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            canvas::show(
                ui,
                &self.texture,
                self.raster.as_ref().map(|r| (r.width(), r.height())),
                self.busy_message.as_deref(),
            );
        });
    }
}
