//! Core library for food label OCR processing.
//!
//! This crate provides:
//! - OCR detection model and input adapters (Rekognition `DetectText`)
//! - Line classification of raw detections
//! - Barcode reconstruction from numeric lines
//! - Expiration date matching and normalization to `YYYY-MM-DD`

pub mod error;
pub mod models;
pub mod ocr;
pub mod label;

pub use error::{FridgeError, InputError, Result};
pub use models::config::{ExtractionConfig, FridgeConfig};
pub use models::label::{ExtractionResult, LabelField, LabelStatus};
pub use ocr::{Detection, Granularity, parse_detections, parse_rekognition};
pub use label::{LabelReader, assemble};
pub use label::rules::{classify, find_expiration_date, reconstruct_barcode};
