//! Axum route handlers for resume upload and text extraction.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::pipeline::ExtractionSource;
use crate::extraction::snapshot::BASE_RESUME_SNAPSHOT;
use crate::models::document::SectionMarker;
use crate::state::AppState;
use crate::text::sections::{bullets_per_section, SectionBulletCount};

const UPLOAD_FIELD: &str = "resume";
const PREVIEW_CHARS: usize = 2000;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    pub filename: String,
    pub text_length: usize,
    pub text: String,
    pub preview: String,
    pub sections: Vec<SectionMarker>,
    pub bullet_count: usize,
    pub bullets_per_section: Vec<SectionBulletCount>,
    pub source: ExtractionSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/extract
///
/// Accepts a multipart upload in the `resume` field and returns the cleaned text
/// with its detected section structure.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut upload: Option<(Option<String>, Bytes)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(upload_read_message(&e, &state.config)))?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload
        .ok_or_else(|| AppError::Validation(format!("Missing '{UPLOAD_FIELD}' file field")))?;
    let filename = validate_upload(filename.as_deref(), &data, &state.config)?;

    info!(%filename, bytes = data.len(), "Extracting resume text");
    let outcome = state.extraction.extract(&data).await;
    let document = outcome.document;

    if document.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the PDF".to_string(),
        ));
    }

    state
        .snapshots
        .write(BASE_RESUME_SNAPSHOT, &document.raw_text)
        .await;

    let bullets_per_section = bullets_per_section(&document.raw_text, &document.sections);
    let preview = document.raw_text.chars().take(PREVIEW_CHARS).collect();

    Ok(Json(ExtractResponse {
        success: true,
        filename,
        text_length: document.raw_text.chars().count(),
        preview,
        bullet_count: document.bullet_count,
        bullets_per_section,
        sections: document.sections,
        text: document.raw_text,
        source: outcome.source,
    }))
}

/// Rejects uploads before any extraction capability runs. Returns the filename.
pub fn validate_upload(
    filename: Option<&str>,
    data: &[u8],
    config: &Config,
) -> Result<String, AppError> {
    let filename = filename
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::Validation("Filename is required".to_string()))?;

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();
    if !config.allowed_file_types.contains(&extension) {
        return Err(AppError::Validation(format!(
            "Only {} files are supported",
            config.allowed_file_types.join(", ")
        )));
    }

    if data.is_empty() {
        return Err(AppError::Validation("Empty file provided".to_string()));
    }

    if data.len() > config.max_file_size {
        return Err(AppError::Validation(size_limit_message(config)));
    }

    Ok(filename.to_string())
}

/// Only a tripped body limit is reported as a size problem.
fn upload_read_message(error: &MultipartError, config: &Config) -> String {
    read_failure_message(error.status(), &error.body_text(), config)
}

fn read_failure_message(status: StatusCode, detail: &str, config: &Config) -> String {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        size_limit_message(config)
    } else {
        format!("Invalid upload: {detail}")
    }
}

fn size_limit_message(config: &Config) -> String {
    format!(
        "File size exceeds maximum allowed size of {}MB",
        config.max_file_size / (1024 * 1024)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(result: Result<String, AppError>) -> String {
        match result {
            Err(AppError::Validation(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_accepts_pdf_regardless_of_extension_case() {
        let config = Config::default();
        assert_eq!(
            validate_upload(Some("Resume.PDF"), b"%PDF-1.7", &config).unwrap(),
            "Resume.PDF"
        );
    }

    #[test]
    fn test_rejects_missing_filename() {
        let config = Config::default();
        assert_eq!(
            message(validate_upload(None, b"%PDF", &config)),
            "Filename is required"
        );
        assert_eq!(
            message(validate_upload(Some("  "), b"%PDF", &config)),
            "Filename is required"
        );
    }

    #[test]
    fn test_rejects_unsupported_extension() {
        let config = Config::default();
        assert_eq!(
            message(validate_upload(Some("resume.txt"), b"hello", &config)),
            "Only .pdf files are supported"
        );
        assert!(validate_upload(Some("resume"), b"hello", &config).is_err());
    }

    #[test]
    fn test_rejects_empty_and_oversized_files() {
        let config = Config {
            max_file_size: 10,
            ..Config::default()
        };
        assert_eq!(
            message(validate_upload(Some("a.pdf"), b"", &config)),
            "Empty file provided"
        );
        assert!(message(validate_upload(Some("a.pdf"), &[0u8; 11], &config))
            .starts_with("File size exceeds"));
    }

    #[test]
    fn test_read_failures_other_than_body_limit_are_invalid_upload() {
        let config = Config::default();
        assert_eq!(
            read_failure_message(StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded", &config),
            "File size exceeds maximum allowed size of 5MB"
        );
        assert_eq!(
            read_failure_message(StatusCode::BAD_REQUEST, "incomplete field data", &config),
            "Invalid upload: incomplete field data"
        );
    }
}
