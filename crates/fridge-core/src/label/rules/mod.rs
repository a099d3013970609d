//! Rule-based field extractors for food labels.

pub mod barcode;
pub mod classify;
pub mod dates;
pub mod patterns;

pub use barcode::{BarcodeExtractor, reconstruct_barcode};
pub use classify::classify;
pub use dates::{DateExtractor, DateMatch, find_expiration_date, find_raw_date, normalize_date};
pub use patterns::{DatePatternKind, CALENDAR_FORMATS, DATE_PATTERNS};

/// Trait for field extractors over classified label lines.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from lines, scanned in order.
    fn extract<S: AsRef<str>>(&self, lines: &[S]) -> Option<Self::Output>;
}

/// An extracted value with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Source text that was matched.
    pub source: String,
    /// Index of the line the value was read from, when it has one.
    pub line: Option<usize>,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}
