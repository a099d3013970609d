//! Label reader composing classification, barcode and date extraction.

use std::time::Instant;

use tracing::{debug, info};

use crate::models::config::ExtractionConfig;
use crate::models::label::ExtractionResult;
use crate::ocr::Detection;

use super::rules::{classify, dates::format_iso, BarcodeExtractor, DateExtractor, FieldExtractor};
use super::{assemble, LabelExtractor};

/// Reads barcode and expiration date from OCR detections.
#[derive(Debug, Clone)]
pub struct LabelReader {
    barcode: BarcodeExtractor,
    dates: DateExtractor,
    /// Run both extractors on scoped threads.
    concurrent: bool,
}

impl LabelReader {
    /// Create a reader with default settings.
    pub fn new() -> Self {
        Self {
            barcode: BarcodeExtractor::new(),
            dates: DateExtractor::new(),
            concurrent: false,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_year_pivot(config.two_digit_year_pivot)
            .with_concurrency(config.concurrent)
    }

    /// Set the two-digit year pivot.
    pub fn with_year_pivot(mut self, pivot: u8) -> Self {
        self.dates = DateExtractor::new().with_year_pivot(pivot);
        self
    }

    /// Set whether barcode and date extraction run concurrently.
    pub fn with_concurrency(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    /// Classify detections and extract both fields.
    pub fn read(&self, detections: &[Detection]) -> ExtractionResult {
        let lines = classify(detections);
        self.read_lines(&lines)
    }

    /// Extract both fields from classified lines.
    pub fn read_lines<S: AsRef<str> + Sync>(&self, lines: &[S]) -> ExtractionResult {
        let start = Instant::now();

        let (barcode, expiration) = if self.concurrent {
            std::thread::scope(|scope| {
                let barcode = scope.spawn(|| self.find_barcode(lines));
                let expiration = self.find_expiration(lines);
                let barcode = barcode
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
                (barcode, expiration)
            })
        } else {
            (self.find_barcode(lines), self.find_expiration(lines))
        };

        let result = assemble(barcode, expiration);

        info!(
            "Label read: barcode={:?} expiration_date={:?} status={:?}",
            result.barcode,
            result.expiration_date,
            result.status()
        );
        debug!("Read {} lines in {:?}", lines.len(), start.elapsed());

        result
    }

    fn find_barcode<S: AsRef<str>>(&self, lines: &[S]) -> Option<String> {
        self.barcode.extract(lines).map(|m| m.value)
    }

    fn find_expiration<S: AsRef<str>>(&self, lines: &[S]) -> Option<String> {
        self.dates.extract(lines).map(|m| format_iso(m.value))
    }
}

impl Default for LabelReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelExtractor for LabelReader {
    fn extract(&self, detections: &[Detection]) -> ExtractionResult {
        self.read(detections)
    }

    fn extract_from_lines(&self, lines: &[String]) -> ExtractionResult {
        self.read_lines(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::label::{LabelField, LabelStatus};
    use pretty_assertions::assert_eq;

    fn sample_detections() -> Vec<Detection> {
        vec![
            Detection::line("ORGANIC WHOLE MILK"),
            Detection::fragment("ORGANIC"),
            Detection::line("0 36632"),
            Detection::line("00130 4"),
            Detection::line("Best Before"),
            Detection::line("EXP: 08/15/2025"),
            Detection::fragment("08/15/2025"),
            Detection::fragment("999"),
        ]
    }

    #[test]
    fn test_read_full_label() {
        let result = LabelReader::new().read(&sample_detections());

        assert_eq!(
            result,
            ExtractionResult::new(Some("036632001304".into()), Some("2025-08-15".into()))
        );
        assert_eq!(result.status(), LabelStatus::Complete);
    }

    #[test]
    fn test_concurrent_matches_sequential() {
        let detections = sample_detections();
        let sequential = LabelReader::new().read(&detections);
        let concurrent = LabelReader::new().with_concurrency(true).read(&detections);
        assert_eq!(sequential, concurrent);

        let empty = LabelReader::new().with_concurrency(true).read(&[]);
        assert_eq!(empty, ExtractionResult::default());
    }

    #[test]
    fn test_fragments_never_contribute() {
        let detections = vec![
            Detection::fragment("012345678905"),
            Detection::fragment("18 JUN 14"),
        ];
        let result = LabelReader::new().read(&detections);
        assert_eq!(result.status(), LabelStatus::Empty);
        assert_eq!(
            result.missing(),
            vec![LabelField::Barcode, LabelField::ExpirationDate]
        );
    }

    #[test]
    fn test_from_config_applies_year_pivot() {
        let config = ExtractionConfig {
            two_digit_year_pivot: 10,
            concurrent: true,
        };
        let reader = LabelReader::from_config(&config);
        let result = reader.extract_from_lines(&["18 JUN 14".to_string()]);
        assert_eq!(result.expiration_date.as_deref(), Some("1914-06-18"));
        assert_eq!(result.status(), LabelStatus::MissingBarcode);
    }

    #[test]
    fn test_assemble_passes_values_through() {
        assert_eq!(
            assemble(Some("0123".into()), None),
            ExtractionResult::new(Some("0123".into()), None)
        );
    }
}
