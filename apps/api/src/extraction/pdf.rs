use async_trait::async_trait;

use crate::extraction::pipeline::PrimaryExtractor;
use crate::extraction::ExtractionError;

/// Direct text extraction backed by `pdf-extract`.
///
/// Decoding is CPU-bound, so it runs on the blocking pool. `pdf-extract` can panic on
/// malformed input; the panic surfaces as a `JoinError` instead of taking down the worker.
pub struct PdfTextExtractor;

#[async_trait]
impl PrimaryExtractor for PdfTextExtractor {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let bytes = bytes.to_vec();
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await?
            .map_err(|e| ExtractionError::Decode(e.to_string()))?;

        tracing::debug!(chars = text.chars().count(), "pdf-extract returned text");
        Ok(text)
    }
}
