//! Extraction result for a single label photograph.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Barcode and expiration date read from one label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Reconstructed barcode, digits only.
    pub barcode: Option<String>,

    /// Expiration date as `YYYY-MM-DD`.
    pub expiration_date: Option<String>,
}

/// A field of the extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelField {
    Barcode,
    ExpirationDate,
}

impl LabelField {
    /// Message shown to a user when the field is missing.
    pub fn missing_message(&self) -> &'static str {
        match self {
            LabelField::Barcode => "no barcode found in image",
            LabelField::ExpirationDate => "no expiration date found",
        }
    }
}

impl fmt::Display for LabelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelField::Barcode => write!(f, "barcode"),
            LabelField::ExpirationDate => write!(f, "expiration_date"),
        }
    }
}

/// Overall completeness of an extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStatus {
    /// Both fields present.
    Complete,
    /// Only the expiration date was found.
    MissingBarcode,
    /// Only the barcode was found.
    MissingExpiration,
    /// Neither field was found.
    Empty,
}

impl ExtractionResult {
    pub fn new(barcode: Option<String>, expiration_date: Option<String>) -> Self {
        Self {
            barcode,
            expiration_date,
        }
    }

    /// Fields that could not be extracted, in declaration order.
    pub fn missing(&self) -> Vec<LabelField> {
        let mut missing = Vec::new();
        if self.barcode.is_none() {
            missing.push(LabelField::Barcode);
        }
        if self.expiration_date.is_none() {
            missing.push(LabelField::ExpirationDate);
        }
        missing
    }

    pub fn status(&self) -> LabelStatus {
        match (&self.barcode, &self.expiration_date) {
            (Some(_), Some(_)) => LabelStatus::Complete,
            (None, Some(_)) => LabelStatus::MissingBarcode,
            (Some(_), None) => LabelStatus::MissingExpiration,
            (None, None) => LabelStatus::Empty,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status() == LabelStatus::Complete
    }
}
