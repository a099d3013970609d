//! Label field extraction module.

mod parser;
pub mod rules;

pub use parser::LabelReader;

use crate::models::label::ExtractionResult;
use crate::ocr::Detection;

/// Trait for label extractors.
pub trait LabelExtractor {
    /// Extract label fields from raw OCR detections.
    fn extract(&self, detections: &[Detection]) -> ExtractionResult;

    /// Extract label fields from already classified lines.
    fn extract_from_lines(&self, lines: &[String]) -> ExtractionResult;
}

/// Combine the two independent extractor outputs.
pub fn assemble(barcode: Option<String>, expiration: Option<String>) -> ExtractionResult {
    ExtractionResult::new(barcode, expiration)
}
