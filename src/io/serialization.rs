// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings file loading.
//!
//! Settings are read from YAML or JSON, chosen by file extension. The
//! file is optional; without one the built-in defaults apply.

use crate::models::settings::{Settings, API_KEY_ENV};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "PLATEMASK_CONFIG";

/// Files probed in the working directory when `PLATEMASK_CONFIG` is unset.
const DEFAULT_CONFIG_FILES: &[&str] = &["platemask.yaml", "platemask.yml", "platemask.json"];

/// Import settings from YAML format.
pub fn import_yaml(path: &Path) -> Result<Settings> {
    let yaml = std::fs::read_to_string(path)?;
    let settings = serde_yaml::from_str(&yaml)?;
    Ok(settings)
}

/// Import settings from JSON format.
pub fn import_json(path: &Path) -> Result<Settings> {
    let json = std::fs::read_to_string(path)?;
    let settings = serde_json::from_str(&json)?;
    Ok(settings)
}

/// Import settings, picking the format from the extension.
pub fn import_settings(path: &Path) -> Result<Settings> {
    let extension = path.extension().and_then(|s| s.to_str());
    let result = match extension {
        Some("yaml") | Some("yml") => import_yaml(path),
        Some("json") => import_json(path),
        _ => bail!("Unsupported settings file extension: {:?}", extension),
    };
    result.with_context(|| format!("Failed to load settings from {}", path.display()))
}

/// Find the settings file to use, if any.
fn locate_settings(explicit: Option<PathBuf>, dir: &Path) -> Option<PathBuf> {
    explicit.or_else(|| {
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    })
}

/// Load settings from `explicit` or the first default file in `dir`, then
/// apply the API key override.
pub fn load_settings_from(
    explicit: Option<PathBuf>,
    dir: &Path,
    api_key: Option<String>,
) -> Result<Settings> {
    let settings = match locate_settings(explicit, dir) {
        Some(path) => {
            let settings = import_settings(&path)?;
            log::info!("Loaded settings from {}", path.display());
            settings
        }
        None => {
            log::info!("No settings file found, using defaults");
            Settings::default()
        }
    };
    Ok(settings.with_api_key_override(api_key))
}

/// Load settings using the process environment and working directory.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(
        std::env::var_os(CONFIG_ENV).map(PathBuf::from),
        Path::new("."),
        std::env::var(API_KEY_ENV).ok(),
    )
}
