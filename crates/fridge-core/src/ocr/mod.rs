//! OCR detections as reported by an external text-recognition service.

mod rekognition;

pub use rekognition::{DetectionReader, parse_detections, parse_rekognition};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Granularity of a detected text unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// A full line of text.
    #[serde(alias = "LINE", alias = "Line")]
    Line,
    /// A word or character fragment that duplicates part of a line.
    #[serde(alias = "WORD", alias = "Word", alias = "word", alias = "Fragment")]
    Fragment,
}

impl FromStr for Granularity {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Granularity::Line),
            "word" | "fragment" | "character" | "char" => Ok(Granularity::Fragment),
            other => Err(InputError::UnknownGranularity(other.to_string())),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Line => write!(f, "line"),
            Granularity::Fragment => write!(f, "fragment"),
        }
    }
}

/// One OCR-reported text unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Raw recognized text.
    pub text: String,

    /// Whether this is a full line or a sub-line fragment.
    pub granularity: Granularity,

    /// Recognition confidence as reported by the OCR service (0 - 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Detection {
    /// Create a detection with the given granularity.
    pub fn new(text: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            text: text.into(),
            granularity,
            confidence: None,
        }
    }

    /// Create a line-granularity detection.
    pub fn line(text: impl Into<String>) -> Self {
        Self::new(text, Granularity::Line)
    }

    /// Create a fragment-granularity detection.
    pub fn fragment(text: impl Into<String>) -> Self {
        Self::new(text, Granularity::Fragment)
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn is_line(&self) -> bool {
        self.granularity == Granularity::Line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_from_str() {
        assert_eq!("LINE".parse::<Granularity>().unwrap(), Granularity::Line);
        assert_eq!("word".parse::<Granularity>().unwrap(), Granularity::Fragment);
        assert_eq!(" Fragment ".parse::<Granularity>().unwrap(), Granularity::Fragment);
        assert!(matches!(
            "paragraph".parse::<Granularity>(),
            Err(InputError::UnknownGranularity(g)) if g == "paragraph"
        ));
    }

    #[test]
    fn test_granularity_serde_aliases() {
        let line: Granularity = serde_json::from_str("\"LINE\"").unwrap();
        let word: Granularity = serde_json::from_str("\"WORD\"").unwrap();
        assert_eq!(line, Granularity::Line);
        assert_eq!(word, Granularity::Fragment);
        assert_eq!(serde_json::to_string(&Granularity::Fragment).unwrap(), "\"fragment\"");
    }

    #[test]
    fn test_detection_constructors() {
        let d = Detection::line("EXP 08/15/2025").with_confidence(98.5);
        assert!(d.is_line());
        assert_eq!(d.confidence, Some(98.5));
        assert!(!Detection::fragment("EXP").is_line());
    }
}
