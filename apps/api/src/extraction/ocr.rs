//! OCR backend: shells out to poppler's `pdftoppm` for rendering and
//! `tesseract` for recognition. Both binaries must be on `PATH`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::extraction::pipeline::{OcrEngine, PageImage};
use crate::extraction::ExtractionError;

/// Uniform-block segmentation suits single-column resume pages.
const TESSERACT_PAGE_SEGMENTATION: &str = "6";

pub struct TesseractOcr {
    language: String,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn render_pages(
        &self,
        bytes: &[u8],
        dpi: u32,
        max_pages: usize,
    ) -> Result<Vec<PageImage>, ExtractionError> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("input.pdf");
        tokio::fs::write(&input, bytes).await?;

        let prefix = workdir.path().join("page");
        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(dpi.to_string())
            .arg("-f")
            .arg("1")
            .arg("-l")
            .arg(max_pages.to_string())
            .arg(&input)
            .arg(&prefix)
            .output()
            .await
            .map_err(|e| tool_error("pdftoppm", e.to_string()))?;

        if !output.status.success() {
            return Err(tool_error(
                "pdftoppm",
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        let image_paths = rendered_pages(workdir.path()).await?;
        if image_paths.is_empty() {
            return Err(tool_error("pdftoppm", "produced no images".to_string()));
        }
        info!(pages = image_paths.len(), dpi, "Rendered pages for OCR");

        let mut pages = Vec::with_capacity(image_paths.len());
        for (i, path) in image_paths.iter().take(max_pages).enumerate() {
            pages.push(PageImage {
                page_number: i + 1,
                png: tokio::fs::read(path).await?,
            });
        }
        Ok(pages)
    }

    async fn image_to_text(&self, image: &PageImage) -> Result<String, ExtractionError> {
        let workdir = tempfile::tempdir()?;
        let path = workdir.path().join(format!("page-{}.png", image.page_number));
        tokio::fs::write(&path, &image.png).await?;

        let output = Command::new("tesseract")
            .arg(&path)
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(TESSERACT_PAGE_SEGMENTATION)
            .output()
            .await
            .map_err(|e| tool_error("tesseract", e.to_string()))?;

        if !output.status.success() {
            // Tesseract writes warnings to stderr on success too; only a bad exit is fatal.
            return Err(tool_error(
                "tesseract",
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(page = image.page_number, chars = text.len(), "OCR page recognized");
        Ok(text)
    }
}

/// PNG files `pdftoppm` wrote into `dir`, in page order.
/// Its zero-padded suffixes (`page-01.png`) make lexical order equal page order.
async fn rendered_pages(dir: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "png") {
            paths.push(path);
        } else {
            debug!(?path, "Skipping non-image file in OCR workdir");
        }
    }
    paths.sort();
    Ok(paths)
}

fn tool_error(tool: &'static str, message: String) -> ExtractionError {
    warn!("{tool} failed: {message}");
    ExtractionError::Tool { tool, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rendered_pages_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["page-02.png", "input.pdf", "page-01.png", "page-10.png"] {
            tokio::fs::write(dir.path().join(name), b"x").await.unwrap();
        }

        let names: Vec<String> = rendered_pages(dir.path())
            .await
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["page-01.png", "page-02.png", "page-10.png"]);
    }
}
