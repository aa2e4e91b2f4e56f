// Text Extraction: primary PDF text extraction with an OCR fallback,
// followed by cleaning, bullet normalization and section detection.
// Capabilities are traits so the pipeline is testable without poppler or tesseract.

pub mod handlers;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod snapshot;

use thiserror::Error;

/// Failure of a single extraction capability. These never reach the HTTP layer:
/// the pipeline logs them and continues on a degraded path.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("PDF decode failed: {0}")]
    Decode(String),

    #[error("external tool '{tool}' failed: {message}")]
    Tool { tool: &'static str, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("extraction worker failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
