//! Extraction pipeline: primary extraction, OCR fallback, then cleaning,
//! bullet normalization and section detection.
//!
//! `extract` never fails. Capability errors are logged and the pipeline moves on:
//! a failed primary pass goes to OCR, a failed OCR pass counts as empty text.
//! An empty `ExtractedDocument` is how "no text extractable" is reported.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::extraction::ExtractionError;
use crate::models::document::ExtractedDocument;
use crate::text::normalize_document;

// ────────────────────────────────────────────────────────────────────────────
// Capabilities
// ────────────────────────────────────────────────────────────────────────────

/// Direct text extraction from document bytes (concatenated page text).
#[async_trait]
pub trait PrimaryExtractor: Send + Sync {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// One rendered page, PNG-encoded.
#[derive(Debug, Clone)]
pub struct PageImage {
    pub page_number: usize,
    pub png: Vec<u8>,
}

/// Image-based text recognition substrate.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Renders at most `max_pages` pages, starting from the first.
    async fn render_pages(
        &self,
        bytes: &[u8],
        dpi: u32,
        max_pages: usize,
    ) -> Result<Vec<PageImage>, ExtractionError>;

    async fn image_to_text(&self, image: &PageImage) -> Result<String, ExtractionError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionSettings {
    pub ocr_dpi: u32,
    pub ocr_max_pages: usize,
    /// Cleaned primary text with fewer non-whitespace chars than this triggers OCR.
    pub min_extracted_chars: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            ocr_dpi: 300,
            ocr_max_pages: 5,
            min_extracted_chars: 50,
        }
    }
}

impl ExtractionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            ocr_dpi: config.ocr_dpi,
            ocr_max_pages: config.ocr_max_pages,
            min_extracted_chars: config.min_extracted_chars,
        }
    }
}

/// Which capability produced the final text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionSource {
    Primary,
    Ocr,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    pub document: ExtractedDocument,
    pub source: ExtractionSource,
}

#[derive(Clone)]
pub struct ExtractionPipeline {
    primary: Arc<dyn PrimaryExtractor>,
    ocr: Arc<dyn OcrEngine>,
    settings: ExtractionSettings,
}

impl ExtractionPipeline {
    pub fn new(
        primary: Arc<dyn PrimaryExtractor>,
        ocr: Arc<dyn OcrEngine>,
        settings: ExtractionSettings,
    ) -> Self {
        Self {
            primary,
            ocr,
            settings,
        }
    }

    pub async fn extract(&self, bytes: &[u8]) -> ExtractionOutcome {
        let primary_text = match self.primary.extract_text(bytes).await {
            Ok(raw) => Some(normalize_document(&raw)),
            Err(e) => {
                warn!("Primary extraction failed: {e}. Falling back to OCR");
                None
            }
        };

        let primary_chars = primary_text.as_deref().map_or(0, non_whitespace_chars);
        if let Some(text) = primary_text.as_ref() {
            if primary_chars >= self.settings.min_extracted_chars {
                return finish(text.clone(), ExtractionSource::Primary);
            }
            warn!(
                primary_chars,
                threshold = self.settings.min_extracted_chars,
                "Primary extraction yielded minimal text. Attempting OCR"
            );
        }

        let ocr_text = self.run_ocr(bytes).await;
        let primary_text = primary_text.unwrap_or_default();

        // OCR must be strictly longer to replace the primary text.
        if ocr_text.chars().count() > primary_text.chars().count() {
            finish(ocr_text, ExtractionSource::Ocr)
        } else if !primary_text.trim().is_empty() {
            finish(primary_text, ExtractionSource::Primary)
        } else {
            warn!("No text could be extracted from document");
            ExtractionOutcome {
                document: ExtractedDocument::empty(),
                source: ExtractionSource::None,
            }
        }
    }

    async fn run_ocr(&self, bytes: &[u8]) -> String {
        let pages = match self
            .ocr
            .render_pages(bytes, self.settings.ocr_dpi, self.settings.ocr_max_pages)
            .await
        {
            Ok(pages) => pages,
            Err(e) => {
                warn!("OCR page rendering failed: {e}");
                return String::new();
            }
        };

        let mut text = String::new();
        for page in pages.iter().take(self.settings.ocr_max_pages) {
            info!("OCR processing page {}", page.page_number);
            match self.ocr.image_to_text(page).await {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => warn!("OCR failed on page {}: {e}", page.page_number),
            }
        }
        normalize_document(&text)
    }
}

fn non_whitespace_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

fn finish(text: String, source: ExtractionSource) -> ExtractionOutcome {
    let document = ExtractedDocument::from_text(text);
    info!(
        ?source,
        chars = document.raw_text.chars().count(),
        sections = document.sections.len(),
        bullets = document.bullet_count,
        "Extraction complete"
    );
    debug!(sections = ?document.sections, "Detected sections");
    ExtractionOutcome { document, source }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::models::document::SectionType;

    const RICH_RESUME: &str = "Jane Doe\nEXPERIENCE\n- Built a distributed ingestion service in Rust\n- Cut p99 latency by forty percent\nSKILLS\n* Rust, Go, SQL";

    struct FakePrimary(Result<&'static str, ()>);

    #[async_trait]
    impl PrimaryExtractor for FakePrimary {
        async fn extract_text(&self, _bytes: &[u8]) -> Result<String, ExtractionError> {
            self.0
                .map(str::to_string)
                .map_err(|_| ExtractionError::Decode("corrupt xref table".into()))
        }
    }

    struct FakeOcr {
        pages: Result<Vec<&'static str>, ()>,
        rendered: AtomicUsize,
        requested_pages: AtomicUsize,
    }

    impl FakeOcr {
        fn with_pages(pages: Vec<&'static str>) -> Self {
            Self {
                pages: Ok(pages),
                rendered: AtomicUsize::new(0),
                requested_pages: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                pages: Err(()),
                rendered: AtomicUsize::new(0),
                requested_pages: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl OcrEngine for FakeOcr {
        async fn render_pages(
            &self,
            _bytes: &[u8],
            _dpi: u32,
            max_pages: usize,
        ) -> Result<Vec<PageImage>, ExtractionError> {
            self.rendered.fetch_add(1, Ordering::SeqCst);
            self.requested_pages.store(max_pages, Ordering::SeqCst);
            let pages = self.pages.as_ref().map_err(|_| ExtractionError::Tool {
                tool: "pdftoppm",
                message: "not installed".into(),
            })?;
            Ok(pages
                .iter()
                .enumerate()
                .map(|(i, text)| PageImage {
                    page_number: i + 1,
                    png: text.as_bytes().to_vec(),
                })
                .collect())
        }

        async fn image_to_text(&self, image: &PageImage) -> Result<String, ExtractionError> {
            Ok(String::from_utf8_lossy(&image.png).into_owned())
        }
    }

    fn pipeline(primary: FakePrimary, ocr: Arc<FakeOcr>) -> ExtractionPipeline {
        ExtractionPipeline::new(Arc::new(primary), ocr, ExtractionSettings::default())
    }

    #[tokio::test]
    async fn test_rich_primary_text_skips_ocr() {
        let ocr = Arc::new(FakeOcr::with_pages(vec!["ignored"]));
        let outcome = pipeline(FakePrimary(Ok(RICH_RESUME)), ocr.clone())
            .extract(b"%PDF")
            .await;

        assert_eq!(outcome.source, ExtractionSource::Primary);
        assert_eq!(ocr.rendered.load(Ordering::SeqCst), 0);
        assert_eq!(outcome.document.bullet_count, 3);
        let types: Vec<SectionType> =
            outcome.document.sections.iter().map(|s| s.section_type).collect();
        assert_eq!(types, vec![SectionType::Experience, SectionType::Skills]);
    }

    #[tokio::test]
    async fn test_sparse_primary_falls_back_to_longer_ocr_text() {
        let ocr = Arc::new(FakeOcr::with_pages(vec![RICH_RESUME]));
        let outcome = pipeline(FakePrimary(Ok("Jane")), ocr.clone())
            .extract(b"%PDF")
            .await;

        assert_eq!(outcome.source, ExtractionSource::Ocr);
        assert_eq!(ocr.requested_pages.load(Ordering::SeqCst), 5);
        assert!(outcome.document.raw_text.contains("• Built a distributed"));
    }

    #[tokio::test]
    async fn test_sparse_primary_kept_when_ocr_is_not_longer() {
        let ocr = Arc::new(FakeOcr::with_pages(vec!["J"]));
        let outcome = pipeline(FakePrimary(Ok("Jane Doe")), ocr).extract(b"%PDF").await;

        assert_eq!(outcome.source, ExtractionSource::Primary);
        assert_eq!(outcome.document.raw_text, "Jane Doe");
    }

    #[tokio::test]
    async fn test_primary_error_goes_to_ocr() {
        let ocr = Arc::new(FakeOcr::with_pages(vec!["EDUCATION", "o State University"]));
        let outcome = pipeline(FakePrimary(Err(())), ocr).extract(b"%PDF").await;

        assert_eq!(outcome.source, ExtractionSource::Ocr);
        assert_eq!(outcome.document.raw_text, "EDUCATION\n• State University");
        assert_eq!(outcome.document.sections[0].section_type, SectionType::Education);
    }

    #[tokio::test]
    async fn test_nothing_extractable_returns_empty_document() {
        let ocr = Arc::new(FakeOcr::failing());
        let outcome = pipeline(FakePrimary(Err(())), ocr).extract(b"").await;

        assert_eq!(outcome.source, ExtractionSource::None);
        assert!(outcome.document.is_empty());
        assert!(outcome.document.sections.is_empty());
        assert_eq!(outcome.document.bullet_count, 0);
    }

    #[tokio::test]
    async fn test_ocr_stops_at_page_bound() {
        let ocr = Arc::new(FakeOcr::with_pages(vec!["p1", "p2", "p3", "p4", "p5", "p6", "p7"]));
        let outcome = pipeline(FakePrimary(Ok("")), ocr).extract(b"%PDF").await;

        assert!(outcome.document.raw_text.contains("p5"));
        assert!(!outcome.document.raw_text.contains("p6"));
    }

    #[test]
    fn test_non_whitespace_chars() {
        assert_eq!(non_whitespace_chars(" a \n b\t"), 2);
    }
}
