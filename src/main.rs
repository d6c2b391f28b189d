// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Plate Mask - license plate masking for vehicle photos
//!
//! A desktop application that finds the license plate in a photo through
//! an object localization service and paints it over with a solid color
//! matching the plate's white or yellow background.

mod app;
mod io;
mod models;
mod processing;
mod ui;
mod util;

use anyhow::Result;
use app::PlateMaskApp;
use io::export::DirectorySink;
use io::vision::VisionClient;
use processing::pipeline::Pipeline;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = io::serialization::load_settings()?;

    let detector = VisionClient::new(&settings)?;
    let has_api_key = detector.has_api_key();
    if !has_api_key {
        log::warn!(
            "No vision API key configured; set {} or api_key in the settings file",
            models::settings::API_KEY_ENV
        );
    }

    let sink = DirectorySink::new(settings.output_dir.clone());
    log::info!("Exports go to {}", settings.output_dir.display());
    let pipeline = Pipeline::new(settings, Arc::new(detector), Arc::new(sink));

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_min_inner_size([640.0, 480.0])
            .with_drag_and_drop(true)
            .with_title("Plate Mask"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Plate Mask",
        options,
        Box::new(move |_cc| Ok(Box::new(PlateMaskApp::new(pipeline, has_api_key)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
