// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Detection data structures.
//!
//! This module defines the localized objects returned by the vision
//! service, the normalized bounding box of a plate, and the pixel-space
//! rectangle and fill color derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D vertex with normalized coordinates (0.0 to 1.0).
///
/// The service omits a coordinate when it is zero, so both default.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedVertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

impl NormalizedVertex {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Four vertices ordered clockwise starting at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedBoundingBox {
    pub vertices: [NormalizedVertex; 4],
}

impl NormalizedBoundingBox {
    /// Build a box from the first four vertices of a polygon.
    pub fn from_vertices(vertices: &[NormalizedVertex]) -> Option<Self> {
        match vertices {
            [tl, tr, br, bl, ..] => Some(Self {
                vertices: [*tl, *tr, *br, *bl],
            }),
            _ => None,
        }
    }

    pub fn top_left(&self) -> NormalizedVertex {
        self.vertices[0]
    }

    pub fn top_right(&self) -> NormalizedVertex {
        self.vertices[1]
    }

    pub fn bottom_left(&self) -> NormalizedVertex {
        self.vertices[3]
    }
}

/// Polygon wrapper as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingPoly {
    #[serde(default)]
    pub normalized_vertices: Vec<NormalizedVertex>,
}

/// One object annotation from the localization response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedObject {
    #[serde(default)]
    pub mid: String,
    pub name: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub bounding_poly: BoundingPoly,
}

impl LocalizedObject {
    pub fn bounding_box(&self) -> Option<NormalizedBoundingBox> {
        NormalizedBoundingBox::from_vertices(&self.bounding_poly.normalized_vertices)
    }
}

/// Axis-aligned rectangle in raster pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// True when the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.width, self.height, self.x, self.y)
    }
}

/// Opaque color painted over the plate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FillColor {
    pub const WHITE: FillColor = FillColor::new(255, 255, 255);
    pub const YELLOW: FillColor = FillColor::new(255, 255, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// RGBA with full opacity.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl fmt::Display for FillColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_missing_coordinates_default_to_zero() {
        let json = r#"{
            "mid": "/m/01jfm_",
            "name": "License plate",
            "score": 0.91,
            "boundingPoly": {
                "normalizedVertices": [
                    {},
                    {"x": 0.5},
                    {"x": 0.5, "y": 0.3},
                    {"y": 0.3}
                ]
            }
        }"#;

        let object: LocalizedObject = serde_json::from_str(json).unwrap();
        let bbox = object.bounding_box().unwrap();
        assert_eq!(bbox.top_left(), NormalizedVertex::new(0.0, 0.0));
        assert_eq!(bbox.top_right(), NormalizedVertex::new(0.5, 0.0));
        assert_eq!(bbox.bottom_left(), NormalizedVertex::new(0.0, 0.3));
    }

    #[test]
    fn test_bounding_box_needs_four_vertices() {
        let vertices = [NormalizedVertex::new(0.1, 0.1); 3];
        assert!(NormalizedBoundingBox::from_vertices(&vertices).is_none());
    }

    #[test]
    fn test_fill_color_display() {
        assert_eq!(FillColor::YELLOW.to_string(), "#ffff00");
        assert_eq!(FillColor::new(1, 2, 3).to_rgba(), [1, 2, 3, 255]);
    }
}
