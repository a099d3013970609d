//! Error types for the fridge-core library.
//!
//! The extraction engine itself is total and reports absence through
//! `Option`. These errors only cover the edges: reading OCR input and
//! loading configuration.

use thiserror::Error;

/// Main error type for the fridge library.
#[derive(Error, Debug)]
pub enum FridgeError {
    /// OCR input could not be interpreted.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to OCR input documents.
#[derive(Error, Debug)]
pub enum InputError {
    /// The document is not valid JSON or has wrongly typed fields.
    #[error("malformed OCR document: {0}")]
    Malformed(String),

    /// A detection carries a granularity tag we do not know.
    #[error("unknown detection granularity: {0}")]
    UnknownGranularity(String),

    /// Valid JSON, but neither a detection list nor a Rekognition response.
    #[error("unsupported OCR document shape")]
    UnsupportedShape,
}

/// Result type for the fridge library.
pub type Result<T> = std::result::Result<T, FridgeError>;
