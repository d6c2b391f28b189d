// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: photo loading, the vision service, exports and settings files.

pub mod export;
pub mod media;
pub mod serialization;
pub mod vision;
