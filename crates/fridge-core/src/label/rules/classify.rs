//! Line classification of raw OCR detections.

use tracing::debug;

use crate::ocr::Detection;

/// Keep the text of every line-granularity detection, in order.
///
/// Fragments duplicate text already present in their parent line and are
/// dropped. No trimming or deduplication happens here.
pub fn classify(detections: &[Detection]) -> Vec<String> {
    let lines: Vec<String> = detections
        .iter()
        .filter(|d| d.is_line())
        .map(|d| d.text.clone())
        .collect();

    debug!(
        "Classified {} of {} detections as lines",
        lines.len(),
        detections.len()
    );

    lines
}
