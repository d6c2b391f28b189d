// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model shared by the pipeline, the detector client and the UI.

pub mod detection;
pub mod raster;
pub mod settings;
