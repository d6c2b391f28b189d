// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Object localization through Google Cloud Vision.
//!
//! The rest of the application only sees the [`Detector`] trait, so the
//! pipeline can be driven by a canned detector in tests.

use crate::models::detection::{LocalizedObject, NormalizedBoundingBox};
use crate::models::settings::Settings;
use anyhow::{anyhow, bail, Context, Result};
use base64::Engine as _;
use serde::Deserialize;
use serde_json::json;

/// Something that can locate objects in an encoded photo.
pub trait Detector: Send + Sync {
    /// Return every object annotation found in `image` (encoded file bytes).
    fn localize(&self, image: &[u8]) -> Result<Vec<LocalizedObject>>;
}

/// Blocking client for the `images:annotate` endpoint.
pub struct VisionClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl VisionClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("platemask/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Detector for VisionClient {
    fn localize(&self, image: &[u8]) -> Result<Vec<LocalizedObject>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("No vision API key configured"))?;

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", key)])
            .json(&annotate_request(image))
            .send()
            .context("Vision request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Vision service returned HTTP {}", status);
        }

        let body: AnnotateResponse = response
            .json()
            .context("Failed to parse vision response")?;
        body.into_objects()
    }
}

/// Build the request body asking for object localization on `image`.
pub fn annotate_request(image: &[u8]) -> serde_json::Value {
    json!({
        "requests": [{
            "image": { "content": base64::engine::general_purpose::STANDARD.encode(image) },
            "features": [{ "type": "OBJECT_LOCALIZATION" }]
        }]
    })
}

/// First annotation named `label` (in response order) with a usable box.
pub fn find_labeled(objects: &[LocalizedObject], label: &str) -> Option<NormalizedBoundingBox> {
    objects
        .iter()
        .filter(|object| object.name == label)
        .find_map(LocalizedObject::bounding_box)
}

/// Locate the `label` region in `image`.
///
/// Transport failures and malformed responses are logged and reported as
/// no detection.
pub fn detect(detector: &dyn Detector, image: &[u8], label: &str) -> Option<NormalizedBoundingBox> {
    match detector.localize(image) {
        Ok(objects) => {
            log::info!("Detector returned {} object(s)", objects.len());
            for object in &objects {
                log::debug!("  {} ({}) score {:.2}", object.name, object.mid, object.score);
            }
            find_labeled(&objects, label)
        }
        Err(e) => {
            log::warn!("Object localization failed: {:#}", e);
            None
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    localized_object_annotations: Vec<LocalizedObject>,
    error: Option<ServiceStatus>,
}

#[derive(Debug, Deserialize)]
struct ServiceStatus {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl AnnotateResponse {
    fn into_objects(self) -> Result<Vec<LocalizedObject>> {
        let Some(first) = self.responses.into_iter().next() else {
            return Ok(Vec::new());
        };
        if let Some(err) = first.error {
            bail!("Vision service error {}: {}", err.code, err.message);
        }
        Ok(first.localized_object_annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::detection::NormalizedVertex;

    const RESPONSE: &str = r#"{
        "responses": [{
            "localizedObjectAnnotations": [
                {
                    "mid": "/m/0k4j",
                    "name": "Car",
                    "score": 0.95,
                    "boundingPoly": {"normalizedVertices": [
                        {"x": 0.05, "y": 0.1}, {"x": 0.95, "y": 0.1},
                        {"x": 0.95, "y": 0.9}, {"x": 0.05, "y": 0.9}
                    ]}
                },
                {
                    "mid": "/m/01jfm_",
                    "name": "License plate",
                    "score": 0.88,
                    "boundingPoly": {"normalizedVertices": [
                        {}, {"x": 0.5}, {"x": 0.5, "y": 0.3}, {"y": 0.3}
                    ]}
                },
                {
                    "mid": "/m/01jfm_",
                    "name": "License plate",
                    "score": 0.61,
                    "boundingPoly": {"normalizedVertices": [
                        {"x": 0.7, "y": 0.7}, {"x": 0.8, "y": 0.7},
                        {"x": 0.8, "y": 0.75}, {"x": 0.7, "y": 0.75}
                    ]}
                }
            ]
        }]
    }"#;

    fn parse(json: &str) -> Result<Vec<LocalizedObject>> {
        serde_json::from_str::<AnnotateResponse>(json)
            .unwrap()
            .into_objects()
    }

    #[test]
    fn test_first_plate_wins() {
        let objects = parse(RESPONSE).unwrap();
        assert_eq!(objects.len(), 3);

        let bbox = find_labeled(&objects, "License plate").unwrap();
        assert_eq!(bbox.top_left(), NormalizedVertex::new(0.0, 0.0));
        assert_eq!(bbox.top_right(), NormalizedVertex::new(0.5, 0.0));
        assert_eq!(bbox.bottom_left(), NormalizedVertex::new(0.0, 0.3));
    }

    #[test]
    fn test_no_plate_label() {
        let objects = parse(r#"{"responses": [{"localizedObjectAnnotations": [
            {"name": "Car", "boundingPoly": {"normalizedVertices": [{}, {}, {}, {}]}}
        ]}]}"#)
        .unwrap();
        assert!(find_labeled(&objects, "License plate").is_none());
    }

    #[test]
    fn test_empty_and_missing_annotations() {
        assert!(parse(r#"{"responses": [{}]}"#).unwrap().is_empty());
        assert!(parse(r#"{}"#).unwrap().is_empty());
    }

    #[test]
    fn test_service_error_is_reported() {
        let err = parse(r#"{"responses": [{"error": {"code": 3, "message": "Bad image data."}}]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("Bad image data."));
    }

    #[test]
    fn test_plate_without_vertices_is_skipped() {
        let objects = parse(r#"{"responses": [{"localizedObjectAnnotations": [
            {"name": "License plate", "boundingPoly": {}},
            {"name": "License plate", "boundingPoly": {"normalizedVertices": [
                {"x": 0.1, "y": 0.1}, {"x": 0.2, "y": 0.1}, {"x": 0.2, "y": 0.2}, {"x": 0.1, "y": 0.2}
            ]}}
        ]}]}"#)
        .unwrap();
        let bbox = find_labeled(&objects, "License plate").unwrap();
        assert_eq!(bbox.top_left(), NormalizedVertex::new(0.1, 0.1));
    }

    #[test]
    fn test_request_body() {
        let body = annotate_request(b"abc");
        assert_eq!(body["requests"][0]["image"]["content"], "YWJj");
        assert_eq!(body["requests"][0]["features"][0]["type"], "OBJECT_LOCALIZATION");
    }

    #[test]
    fn test_missing_api_key_fails() {
        let client = VisionClient::new(&Settings::default()).unwrap();
        assert!(!client.has_api_key());
        assert!(client.localize(b"abc").is_err());
        assert!(detect(&client, b"abc", "License plate").is_none());
    }
}
