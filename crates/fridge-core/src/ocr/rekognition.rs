//! Readers for OCR documents: Rekognition `DetectText` responses and plain
//! detection lists.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{Detection, Granularity};
use crate::error::{InputError, Result};

/// A `DetectText` response. Only the fields we consume are modelled.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetectTextResponse {
    #[serde(default)]
    text_detections: Vec<TextDetection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TextDetection {
    detected_text: String,
    #[serde(rename = "Type")]
    kind: String,
    #[serde(default)]
    confidence: Option<f32>,
}

/// Reads OCR documents into an ordered detection list.
#[derive(Debug, Clone)]
pub struct DetectionReader {
    /// Detections below this confidence are dropped.
    min_confidence: f32,
}

impl DetectionReader {
    pub fn new() -> Self {
        Self { min_confidence: 0.0 }
    }

    /// Set the confidence floor (0 - 100, Rekognition scale).
    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    /// Read any supported document shape.
    ///
    /// Accepted shapes:
    /// - a Rekognition response object with `TextDetections`
    /// - a bare array of `{text, granularity}` detections
    /// - an object with a `detections` array
    pub fn read(&self, json: &str) -> Result<Vec<Detection>> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| InputError::Malformed(e.to_string()))?;

        if value.get("TextDetections").is_some() {
            return self.read_rekognition_value(value);
        }

        let detections = match value {
            Value::Array(_) => Self::from_value::<Vec<Detection>>(value)?,
            Value::Object(mut map) => match map.remove("detections") {
                Some(list) => Self::from_value::<Vec<Detection>>(list)?,
                None => return Err(InputError::UnsupportedShape.into()),
            },
            _ => return Err(InputError::UnsupportedShape.into()),
        };

        Ok(self.apply_floor(detections))
    }

    /// Read a Rekognition `DetectText` response.
    pub fn read_rekognition(&self, json: &str) -> Result<Vec<Detection>> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| InputError::Malformed(e.to_string()))?;
        self.read_rekognition_value(value)
    }

    fn read_rekognition_value(&self, value: Value) -> Result<Vec<Detection>> {
        let response: DetectTextResponse = Self::from_value(value)?;

        let detections = response
            .text_detections
            .into_iter()
            .map(|d| {
                let granularity: Granularity = d.kind.parse()?;
                let mut detection = Detection::new(d.detected_text, granularity);
                detection.confidence = d.confidence;
                Ok(detection)
            })
            .collect::<std::result::Result<Vec<_>, InputError>>()?;

        Ok(self.apply_floor(detections))
    }

    fn from_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T> {
        serde_json::from_value(value).map_err(|e| InputError::Malformed(e.to_string()).into())
    }

    fn apply_floor(&self, detections: Vec<Detection>) -> Vec<Detection> {
        let total = detections.len();
        let kept: Vec<Detection> = detections
            .into_iter()
            .filter(|d| d.confidence.is_none_or(|c| c >= self.min_confidence))
            .collect();

        if kept.len() < total {
            debug!(
                "Dropped {} detections below confidence {}",
                total - kept.len(),
                self.min_confidence
            );
        }

        kept
    }
}

impl Default for DetectionReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read any supported OCR document with default settings.
pub fn parse_detections(json: &str) -> Result<Vec<Detection>> {
    DetectionReader::new().read(json)
}

/// Read a Rekognition `DetectText` response with default settings.
pub fn parse_rekognition(json: &str) -> Result<Vec<Detection>> {
    DetectionReader::new().read_rekognition(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FridgeError;

    const RESPONSE: &str = r#"{
        "TextDetections": [
            {"DetectedText": "BEST BEFORE", "Type": "LINE", "Id": 0, "Confidence": 99.1},
            {"DetectedText": "EXP 08/15/2025", "Type": "LINE", "Id": 1, "Confidence": 97.4},
            {"DetectedText": "0123", "Type": "LINE", "Id": 2, "Confidence": 41.0},
            {"DetectedText": "BEST", "Type": "WORD", "Id": 3, "ParentId": 0, "Confidence": 99.0}
        ]
    }"#;

    #[test]
    fn test_read_rekognition_preserves_order() {
        let detections = parse_rekognition(RESPONSE).unwrap();

        assert_eq!(detections.len(), 4);
        assert_eq!(detections[0].text, "BEST BEFORE");
        assert_eq!(detections[1].granularity, Granularity::Line);
        assert_eq!(detections[3].granularity, Granularity::Fragment);
        assert_eq!(detections[1].confidence, Some(97.4));
    }

    #[test]
    fn test_confidence_floor() {
        let detections = DetectionReader::new()
            .with_min_confidence(50.0)
            .read(RESPONSE)
            .unwrap();

        assert_eq!(detections.len(), 3);
        assert!(detections.iter().all(|d| d.text != "0123"));
    }

    #[test]
    fn test_missing_text_detections_is_empty() {
        let detections = parse_rekognition(r#"{"TextModelVersion": "3.0"}"#).unwrap();
        assert!(detections.is_empty());
    }

    #[test]
    fn test_read_plain_array_and_wrapper() {
        let array = r#"[{"text": "012345678905", "granularity": "line"},
                        {"text": "0123", "granularity": "fragment"}]"#;
        let wrapped = r#"{"detections": [{"text": "18 JUN 14", "granularity": "LINE"}]}"#;

        let a = parse_detections(array).unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[1].granularity, Granularity::Fragment);

        let w = parse_detections(wrapped).unwrap();
        assert_eq!(w, vec![Detection::line("18 JUN 14")]);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let json = r#"{"TextDetections": [{"DetectedText": "x", "Type": "BLOCK"}]}"#;
        let err = parse_rekognition(json).unwrap_err();
        assert!(matches!(
            err,
            FridgeError::Input(InputError::UnknownGranularity(_))
        ));
    }

    #[test]
    fn test_malformed_and_unsupported() {
        assert!(matches!(
            parse_detections("{not json").unwrap_err(),
            FridgeError::Input(InputError::Malformed(_))
        ));
        assert!(matches!(
            parse_detections(r#"{"lines": []}"#).unwrap_err(),
            FridgeError::Input(InputError::UnsupportedShape)
        ));
        assert!(matches!(
            parse_detections("42").unwrap_err(),
            FridgeError::Input(InputError::UnsupportedShape)
        ));
    }
}
