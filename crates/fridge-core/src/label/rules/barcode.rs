//! Barcode reconstruction from numeric label lines.
//!
//! OCR often splits a printed barcode into several numeric lines. Every
//! line that is all digits once whitespace is removed is concatenated in
//! scan order. No check digit is validated.

use tracing::debug;

use super::{ExtractionMatch, FieldExtractor};

/// Barcode field extractor.
#[derive(Debug, Clone, Default)]
pub struct BarcodeExtractor;

impl BarcodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl FieldExtractor for BarcodeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Option<Self::Output> {
        let mut barcode = String::new();
        let mut sources = Vec::new();
        let mut indices = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if let Some(digits) = numeric_line(line) {
                barcode.push_str(&digits);
                sources.push(line);
                indices.push(index);
            }
        }

        if barcode.is_empty() {
            return None;
        }

        debug!(
            "Reconstructed barcode of {} digits from lines {:?}",
            barcode.len(),
            indices
        );

        let mut result = ExtractionMatch::new(barcode, sources.join("\n"));
        if let [index] = indices[..] {
            result = result.with_line(index);
        }
        Some(result)
    }
}

/// Concatenate every all-digit line (whitespace ignored) in order.
pub fn reconstruct_barcode<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    BarcodeExtractor::new().extract(lines).map(|m| m.value)
}

/// The line with whitespace removed, if what remains is ASCII digits only.
fn numeric_line(line: &str) -> Option<String> {
    let stripped: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    if !stripped.is_empty() && stripped.chars().all(|c| c.is_ascii_digit()) {
        Some(stripped)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_keeps_leading_zero() {
        assert_eq!(
            reconstruct_barcode(&["012345678905"]),
            Some("012345678905".to_string())
        );
    }

    #[test]
    fn test_split_lines_are_joined() {
        assert_eq!(
            reconstruct_barcode(&["0123", "4567 8905"]),
            Some("012345678905".to_string())
        );
    }

    #[test]
    fn test_mixed_line_is_excluded() {
        assert_eq!(reconstruct_barcode(&["ABC123"]), None);
        assert_eq!(
            reconstruct_barcode(&["LOT 12", "5 012345", "EXP 08/15/2025", "678900"]),
            Some("5012345678900".to_string())
        );
    }

    #[test]
    fn test_whitespace_only_and_empty() {
        assert_eq!(reconstruct_barcode(&["   ", "\t"]), None);
        assert_eq!(reconstruct_barcode::<&str>(&[]), None);
    }

    #[test]
    fn test_non_ascii_digits_are_rejected() {
        assert_eq!(reconstruct_barcode(&["١٢٣"]), None);
        assert_eq!(reconstruct_barcode(&["12²"]), None);
    }

    #[test]
    fn test_deterministic() {
        let lines = vec!["0123".to_string(), "x".to_string(), "4567".to_string()];
        let first = reconstruct_barcode(&lines);
        assert_eq!(first, reconstruct_barcode(&lines));
        assert_eq!(first.as_deref(), Some("01234567"));
    }

    #[test]
    fn test_extract_records_single_source_line() {
        let m = BarcodeExtractor::new()
            .extract(&["BEST BEFORE", " 4006381 333931 "])
            .unwrap();
        assert_eq!(m.value, "4006381333931");
        assert_eq!(m.line, Some(1));
    }
}
