// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Display surface for the loaded photo.
//!
//! The raster already has its fitted size, so it is drawn 1:1 and centered.
//! If the window later shrinks below it, the drawing is scaled down for
//! display only.

use crate::util::geometry::fit_to_viewport;

/// Display the photo, a progress spinner, or the welcome message.
pub fn show(
    ui: &mut egui::Ui,
    texture: &Option<egui::TextureHandle>,
    image_size: Option<(u32, u32)>,
    busy_message: Option<&str>,
) {
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        match (texture, image_size) {
            (Some(texture), Some((img_width, img_height))) => {
                let available = ui.available_size();
                let fit = fit_to_viewport(
                    img_width as f64,
                    img_height as f64,
                    (available.x as f64).max(1.0),
                    (available.y as f64).max(1.0),
                );
                let display_width = fit.width as f32;
                let display_height = fit.height as f32;

                // Center the image
                let x_offset = ((available.x - display_width) / 2.0).max(0.0);
                let y_offset = ((available.y - display_height) / 2.0).max(0.0);

                let image_rect = egui::Rect::from_min_size(
                    ui.min_rect().min + egui::vec2(x_offset, y_offset),
                    egui::vec2(display_width, display_height),
                );

                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );

                if let Some(message) = busy_message {
                    let anchor = image_rect.left_top() + egui::vec2(8.0, 8.0);
                    ui.painter().text(
                        anchor,
                        egui::Align2::LEFT_TOP,
                        message,
                        egui::FontId::proportional(14.0),
                        egui::Color32::WHITE,
                    );
                }
            }
            _ => {
                if let Some(message) = busy_message {
                    ui.centered_and_justified(|ui| {
                        ui.vertical_centered(|ui| {
                            ui.add_space(20.0);
                            ui.spinner();
                            ui.add_space(10.0);
                            ui.label(
                                egui::RichText::new(message)
                                    .size(16.0)
                                    .color(egui::Color32::from_gray(200)),
                            );
                        });
                    });
                } else {
                    show_welcome(ui);
                }
            }
        }
    });
}

fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("Plate Mask")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Hide license plates behind their own background color")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("File → Open Photo... or drop an image here")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}
