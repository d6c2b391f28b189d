// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Every field has a default so a partial settings file (or none at all)
//! is enough to run. The API key is meant to be injected through the
//! environment rather than stored in the file.

use super::detection::FillColor;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable that overrides `api_key`.
pub const API_KEY_ENV: &str = "PLATEMASK_API_KEY";

pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";
pub const DEFAULT_TARGET_LABEL: &str = "License plate";

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Vision API key.
    pub api_key: Option<String>,
    /// Object localization endpoint.
    pub endpoint: String,
    /// Annotation name that marks a plate.
    pub target_label: String,
    /// Share of the window content area the photo may occupy.
    pub viewport_fraction: f64,
    pub classifier: ClassifierSettings,
    /// Color painted when no sample matches white or yellow. `None` skips the fill.
    pub fallback_color: Option<FillColor>,
    /// Directory that receives exported images.
    pub output_dir: PathBuf,
    /// Write the masked image as soon as masking succeeds.
    pub auto_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            target_label: DEFAULT_TARGET_LABEL.to_string(),
            viewport_fraction: 0.8,
            classifier: ClassifierSettings::default(),
            fallback_color: None,
            output_dir: PathBuf::from("."),
            auto_export: true,
        }
    }
}

impl Settings {
    /// Replace the API key with `key` when it is present and non-empty.
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }
}

/// Reference colors and distance threshold for plate background sampling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    /// Maximum RGB distance for a sample to count as a reference color.
    pub threshold: f64,
    pub white: [u8; 3],
    pub yellow: [u8; 3],
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            threshold: 70.0,
            white: [255, 255, 255],
            yellow: [255, 255, 0],
        }
    }
}
