//! WASM bindings for food label reading.
//!
//! This crate exposes the label engine to browsers and the mobile web view.

use wasm_bindgen::prelude::*;

use fridge_core::label::rules::DateExtractor;
use fridge_core::models::config::DEFAULT_YEAR_PIVOT;
use fridge_core::{Detection, ExtractionResult, LabelReader};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    // Serialize `None` as `null` rather than `undefined`
    let serializer = serde_wasm_bindgen::Serializer::new().serialize_missing_as_null(true);
    value
        .serialize(&serializer)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract barcode and expiration date from an array of
/// `{text, granularity}` detections.
#[wasm_bindgen]
pub fn extract_label(detections: JsValue) -> Result<JsValue, JsValue> {
    let detections: Vec<Detection> = from_js(detections)?;
    to_js(&LabelReader::new().read(&detections))
}

/// Extract barcode and expiration date from a Rekognition `DetectText`
/// response serialized as JSON.
#[wasm_bindgen]
pub fn extract_from_rekognition(json: &str) -> Result<JsValue, JsValue> {
    let detections =
        fridge_core::parse_rekognition(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&LabelReader::new().read(&detections))
}

/// Reconstruct a barcode from an array of line strings.
#[wasm_bindgen]
pub fn reconstruct_barcode(lines: JsValue) -> Result<Option<String>, JsValue> {
    let lines: Vec<String> = from_js(lines)?;
    Ok(fridge_core::reconstruct_barcode(&lines))
}

/// Find the expiration date (`YYYY-MM-DD`) in an array of line strings.
#[wasm_bindgen]
pub fn find_expiration_date(lines: JsValue) -> Result<Option<String>, JsValue> {
    let lines: Vec<String> = from_js(lines)?;
    Ok(fridge_core::find_expiration_date(&lines))
}

/// Incremental label scanner for browser use.
#[wasm_bindgen]
pub struct LabelScanner {
    detections: Vec<Detection>,
    year_pivot: u8,
}

#[wasm_bindgen]
impl LabelScanner {
    /// Create an empty scanner.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            detections: Vec::new(),
            year_pivot: DEFAULT_YEAR_PIVOT,
        }
    }

    /// Configure the two-digit year pivot.
    #[wasm_bindgen]
    pub fn set_year_pivot(&mut self, pivot: u8) {
        self.year_pivot = pivot;
    }

    /// Add a full OCR line.
    #[wasm_bindgen]
    pub fn add_line(&mut self, text: &str) {
        self.detections.push(Detection::line(text));
    }

    /// Add a word or character fragment.
    #[wasm_bindgen]
    pub fn add_fragment(&mut self, text: &str) {
        self.detections.push(Detection::fragment(text));
    }

    /// Number of detections added so far.
    #[wasm_bindgen(getter)]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// Whether no detections have been added.
    #[wasm_bindgen(getter)]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Remove all detections.
    #[wasm_bindgen]
    pub fn clear(&mut self) {
        self.detections.clear();
    }

    fn read(&self) -> ExtractionResult {
        LabelReader::new()
            .with_year_pivot(self.year_pivot)
            .read(&self.detections)
    }

    /// Extract barcode and expiration date from the added detections.
    #[wasm_bindgen]
    pub fn extract(&self) -> Result<JsValue, JsValue> {
        to_js(&self.read())
    }

    /// Extract and also report missing fields and overall status.
    #[wasm_bindgen]
    pub fn extract_with_status(&self) -> Result<JsValue, JsValue> {
        let result = self.read();

        #[derive(serde::Serialize)]
        struct LabelReport {
            barcode: Option<String>,
            expiration_date: Option<String>,
            status: fridge_core::LabelStatus,
            missing: Vec<String>,
        }

        let report = LabelReport {
            missing: result
                .missing()
                .iter()
                .map(|f| f.missing_message().to_string())
                .collect(),
            status: result.status(),
            barcode: result.barcode,
            expiration_date: result.expiration_date,
        };

        to_js(&report)
    }
}

impl Default for LabelScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Date utilities.
#[wasm_bindgen]
pub struct DateUtils;

#[wasm_bindgen]
impl DateUtils {
    /// Normalize a single date-shaped string to `YYYY-MM-DD`.
    #[wasm_bindgen]
    pub fn normalize(raw: &str, year_pivot: Option<u8>) -> Option<String> {
        DateExtractor::new()
            .with_year_pivot(year_pivot.unwrap_or(DEFAULT_YEAR_PIVOT))
            .normalize(raw)
            .map(fridge_core::label::rules::dates::format_iso)
    }
}
