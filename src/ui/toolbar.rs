// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and status line.
//!
//! The toolbar offers the open and save actions; the status line shows
//! the current photo and the latest notification.

use crate::app::{Notice, NoticeKind};
use std::path::Path;

/// Action requested from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Open,
    SaveAs,
}

/// Display the toolbar buttons.
pub fn show(ui: &mut egui::Ui, has_image: bool, busy: bool) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("📂 Open Photo").clicked() {
            action = ToolbarAction::Open;
        }

        if ui
            .add_enabled(has_image && !busy, egui::Button::new("💾 Save As"))
            .clicked()
        {
            action = ToolbarAction::SaveAs;
        }

        ui.separator();

        let hint = if busy {
            "Working..."
        } else if has_image {
            "Open another photo or drop one on the window"
        } else {
            "Open a photo or drop one on the window"
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}

/// Display the current file and the latest notification.
pub fn show_status(ui: &mut egui::Ui, source: Option<&Path>, notice: Option<&Notice>) {
    ui.horizontal(|ui| {
        match source.and_then(|p| p.file_name()) {
            Some(name) => ui.label(name.to_string_lossy().into_owned()),
            None => ui.label("No photo loaded"),
        };

        if let Some(notice) = notice {
            ui.separator();
            let color = match notice.kind {
                NoticeKind::Info => egui::Color32::from_gray(200),
                NoticeKind::Warning => egui::Color32::YELLOW,
                NoticeKind::Error => egui::Color32::LIGHT_RED,
            };
            ui.label(egui::RichText::new(&notice.text).color(color));
        }
    });
}
