//! Axum route handlers for keyword analysis and filtering.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::keywords::analysis::{analyze_resume, AnalysisReport};
use crate::keywords::filter::{filter_actionable, FilterOutcome};
use crate::keywords::matcher::JobKeywordFields;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_data: JobKeywordFields,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    #[serde(flatten)]
    pub report: AnalysisReport,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(default)]
    pub missing_phrases: Vec<String>,
    #[serde(default)]
    pub job_title: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resumeText cannot be empty".to_string(),
        ));
    }

    let report = analyze_resume(
        &state.keyword_matcher,
        state.classifier.as_ref(),
        &request.resume_text,
        &request.job_data,
    )
    .await;

    Ok(Json(AnalyzeResponse {
        success: true,
        report,
    }))
}

/// POST /api/v1/keywords/filter
pub async fn handle_filter(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<FilterOutcome>, AppError> {
    let phrases: Vec<String> = request
        .missing_phrases
        .iter()
        .map(|phrase| phrase.trim())
        .filter(|phrase| !phrase.is_empty())
        .map(str::to_string)
        .collect();

    let outcome = filter_actionable(state.classifier.as_ref(), &phrases, &request.job_title).await;
    Ok(Json(outcome))
}
