// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Plate background sampling, masking, and the end-to-end pipeline.

pub mod classify;
pub mod mask;
pub mod pipeline;
