//! Configuration structures for the label pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{FridgeError, Result};

/// Main configuration for the fridge pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FridgeConfig {
    /// OCR input configuration.
    pub input: InputConfig,

    /// Barcode and date extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// OCR input configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Drop detections whose reported confidence is below this (0 - 100).
    pub min_confidence: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.0, // Keep everything the OCR service returned
        }
    }
}

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Two-digit years below the pivot are 20yy, the rest 19yy.
    pub two_digit_year_pivot: u8,

    /// Run barcode and date extraction on separate threads.
    pub concurrent: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            two_digit_year_pivot: DEFAULT_YEAR_PIVOT,
            concurrent: false,
        }
    }
}

/// POSIX `strptime` convention: 00-68 => 2000-2068, 69-99 => 1969-1999.
pub const DEFAULT_YEAR_PIVOT: u8 = 69;

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl FridgeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        let floor = self.input.min_confidence;
        if !(0.0..=100.0).contains(&floor) {
            return Err(FridgeError::Config(format!(
                "input.min_confidence must be within 0-100, got {}",
                floor
            )));
        }
        Ok(())
    }
}
