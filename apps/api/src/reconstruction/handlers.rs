//! Axum route handler for resume optimization.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::snapshot::OPTIMIZED_RESUME_SNAPSHOT;
use crate::keywords::models::RequestedKeyword;
use crate::models::document::SectionMarker;
use crate::reconstruction::reconstructor::{
    optimize_resume, Degradation, OptimizeRequest, Reconstruction,
};
use crate::reconstruction::verification::{FidelityCheck, KeywordVerification};
use crate::state::AppState;
use crate::text::sections::StructureComparison;

const SUCCESS_MESSAGE: &str = "New resume generated successfully";
const DEGRADED_MESSAGE: &str =
    "Resume could not be optimized safely; returning the cleaned original";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeBody {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub selected_keywords: Vec<RequestedKeyword>,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeMetadata {
    pub keywords_requested: usize,
    pub keywords_integrated: usize,
}

/// Rejected requests carry only `success`, `message` and an empty `optimizedResume`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub success: bool,
    pub message: String,
    pub optimized_resume: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ats_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_verification: Option<KeywordVerification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_sections: Option<Vec<SectionMarker>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullet_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<FidelityCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structure: Option<StructureComparison>,
    /// `Some(None)` serializes as `null`: an accepted edit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<Option<Degradation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OptimizeMetadata>,
}

impl OptimizeResponse {
    fn rejected(message: String) -> Self {
        Self {
            success: false,
            message,
            optimized_resume: String::new(),
            ats_score: None,
            tips: None,
            keyword_verification: None,
            resume_sections: None,
            bullet_count: None,
            fidelity: None,
            structure: None,
            degraded: None,
            metadata: None,
        }
    }

    fn completed(result: Reconstruction, keywords_requested: usize) -> Self {
        let message = match result.degraded {
            None => SUCCESS_MESSAGE,
            Some(_) => DEGRADED_MESSAGE,
        };
        Self {
            success: true,
            message: message.to_string(),
            optimized_resume: result.resume.text,
            ats_score: Some(result.ats_score),
            tips: Some(result.tips),
            metadata: Some(OptimizeMetadata {
                keywords_requested,
                keywords_integrated: result.keyword_verification.integrated.len(),
            }),
            keyword_verification: Some(result.keyword_verification),
            resume_sections: Some(result.resume.sections),
            bullet_count: Some(result.resume.bullet_count),
            fidelity: Some(result.fidelity),
            structure: Some(result.structure),
            degraded: Some(result.degraded),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resume/optimize
///
/// Integrates the selected keywords into the resume in a single edit pass.
/// Input problems are reported in-band with `success: false`.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(body): Json<OptimizeBody>,
) -> Result<Json<OptimizeResponse>, AppError> {
    let keywords_requested = body
        .selected_keywords
        .iter()
        .filter(|keyword| !keyword.text().trim().is_empty())
        .count();
    let request = OptimizeRequest {
        original_text: body.resume_text,
        keywords: body
            .selected_keywords
            .into_iter()
            .map(RequestedKeyword::into_candidate)
            .collect(),
        job_title: body.job_title,
        job_description: body.job_description,
    };

    let result = match optimize_resume(
        state.editor.as_ref(),
        &request,
        &state.reconstruction,
    )
    .await
    {
        Ok(result) => result,
        Err(rejection) => {
            info!("Optimize request rejected: {rejection}");
            return Ok(Json(OptimizeResponse::rejected(rejection.to_string())));
        }
    };

    state
        .snapshots
        .write(OPTIMIZED_RESUME_SNAPSHOT, &result.resume.text)
        .await;

    Ok(Json(OptimizeResponse::completed(result, keywords_requested)))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_body_accepts_strings_and_keyword_objects() {
        let body: OptimizeBody = serde_json::from_value(json!({
            "resumeText": "Jane Doe",
            "selectedKeywords": ["Kafka", {"keyword": "Terraform", "category": "Tool"}],
            "jobTitle": "SRE"
        }))
        .unwrap();
        let texts: Vec<&str> = body.selected_keywords.iter().map(|k| k.text()).collect();
        assert_eq!(texts, vec!["Kafka", "Terraform"]);
        assert!(body.job_description.is_empty());
    }

    #[test]
    fn test_rejected_response_omits_result_fields() {
        let value =
            serde_json::to_value(OptimizeResponse::rejected("No keywords selected.".into()))
                .unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "message": "No keywords selected.",
                "optimizedResume": ""
            })
        );
    }
}
