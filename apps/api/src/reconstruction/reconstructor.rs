//! Resume Reconstructor: turns an edit capability's answer into one canonical
//! plain-text resume and reports how faithful and keyword-complete it is.
//!
//! `reconstruct` is pure. `optimize_resume` validates input, calls the editor once,
//! and hands whatever came back (or the failure) to `reconstruct`.
//! Every failure after validation degrades to the cleaned original text.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::keywords::models::KeywordCandidate;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::document::{ReconstructedResume, SectionType};
use crate::reconstruction::edit_result::{EditResponse, EditResult};
use crate::reconstruction::prompts::{build_resume_edit_prompt, resume_edit_system};
use crate::reconstruction::serializer::serialize_structured;
use crate::reconstruction::verification::{
    FidelityCheck, KeywordVerification, DEFAULT_FIDELITY_MIN_RATIO,
};
use crate::text::normalize_document;
use crate::text::sections::{compare_structure, section_bullets, StructureComparison};

/// Resumes with fewer non-whitespace characters than this are rejected before editing.
pub const MIN_RESUME_CHARS: usize = 50;

/// Shorter output than this fraction of the original (in chars) is logged as suspicious.
const LENGTH_WARNING_RATIO: f64 = 0.8;

// ────────────────────────────────────────────────────────────────────────────
// Edit capability
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct EditRequest<'a> {
    pub original_text: &'a str,
    pub keywords: &'a [String],
    pub job_title: &'a str,
    pub job_description: &'a str,
}

/// External resume rewrite. Returns the raw JSON envelope; shape validation
/// happens in `parse_edit_response`.
#[async_trait]
pub trait ResumeEditor: Send + Sync {
    async fn edit(&self, request: &EditRequest<'_>) -> Result<Value, LlmError>;
}

pub struct LlmResumeEditor {
    llm: LlmClient,
}

impl LlmResumeEditor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeEditor for LlmResumeEditor {
    async fn edit(&self, request: &EditRequest<'_>) -> Result<Value, LlmError> {
        let prompt = build_resume_edit_prompt(
            request.original_text,
            request.keywords,
            request.job_title,
            request.job_description,
        );
        self.llm.call_json::<Value>(&prompt, &resume_edit_system()).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionSettings {
    pub fidelity_min_ratio: f64,
}

impl Default for ReconstructionSettings {
    fn default() -> Self {
        Self {
            fidelity_min_ratio: DEFAULT_FIDELITY_MIN_RATIO,
        }
    }
}

impl ReconstructionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            fidelity_min_ratio: config.fidelity_min_ratio,
        }
    }
}

/// Why the cleaned original was returned instead of the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Degradation {
    /// The capability call failed or its envelope was not valid JSON of the expected form.
    EditFailed,
    UnrecognizedShape,
    EmptyResult,
    FidelityCheckFailed,
}

/// A validated edit ready for reconstruction.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedEdit {
    pub result: EditResult,
    pub ats_score: u32,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconstruction {
    pub resume: ReconstructedResume,
    pub ats_score: u32,
    pub tips: Vec<String>,
    pub keyword_verification: KeywordVerification,
    pub fidelity: FidelityCheck,
    pub structure: StructureComparison,
    pub degraded: Option<Degradation>,
}

/// Input rejected before the editor is called.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimizeRejection {
    #[error("No keywords selected.")]
    NoKeywords,

    #[error("Resume text is empty or too short.")]
    ResumeTooShort,

    #[error("Anthropic API key missing.")]
    EditorUnavailable,
}

#[derive(Debug, Clone)]
pub struct OptimizeRequest {
    pub original_text: String,
    pub keywords: Vec<KeywordCandidate>,
    pub job_title: String,
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestration
// ────────────────────────────────────────────────────────────────────────────

pub async fn optimize_resume(
    editor: Option<&Arc<dyn ResumeEditor>>,
    request: &OptimizeRequest,
    settings: &ReconstructionSettings,
) -> Result<Reconstruction, OptimizeRejection> {
    let keywords: Vec<String> = request
        .keywords
        .iter()
        .map(|k| k.text.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect();
    if keywords.is_empty() {
        return Err(OptimizeRejection::NoKeywords);
    }

    let resume_chars = request
        .original_text
        .chars()
        .filter(|c| !c.is_whitespace())
        .count();
    if resume_chars < MIN_RESUME_CHARS {
        return Err(OptimizeRejection::ResumeTooShort);
    }

    let editor = editor.ok_or(OptimizeRejection::EditorUnavailable)?;

    info!(
        keywords = keywords.len(),
        original_bullets = crate::text::bullets::count_bullets(&request.original_text),
        "Requesting resume edit"
    );

    let edit_request = EditRequest {
        original_text: &request.original_text,
        keywords: &keywords,
        job_title: &request.job_title,
        job_description: &request.job_description,
    };
    let edit = match editor.edit(&edit_request).await {
        Ok(payload) => parse_edit_response(payload),
        Err(e) => {
            warn!("Resume edit failed: {e}. Falling back to original text");
            Err(Degradation::EditFailed)
        }
    };

    Ok(reconstruct(&request.original_text, &keywords, edit, settings))
}

/// Validates the editor's envelope and resolves `optimizedResume` into an `EditResult`.
pub fn parse_edit_response(payload: Value) -> Result<ParsedEdit, Degradation> {
    let response: EditResponse = serde_json::from_value(payload).map_err(|e| {
        warn!("Edit response has an unexpected envelope: {e}");
        Degradation::EditFailed
    })?;

    let result = EditResult::from_value(&response.optimized_resume).map_err(|e| {
        warn!("Unrecognized optimizedResume shape: {e}");
        Degradation::UnrecognizedShape
    })?;
    if matches!(result, EditResult::Structured(_)) {
        warn!("Editor returned a structured resume; serializing with the fixed section order");
    }

    Ok(ParsedEdit {
        result,
        ats_score: response.ats_score,
        tips: response.tips,
    })
}

/// Produces the final resume from an edit (or the reason there is none).
///
/// Sections and bullet count are recomputed from the final text. When the edit is
/// missing, empty, or fails the fidelity check, the cleaned original is returned.
pub fn reconstruct(
    original_text: &str,
    keywords: &[String],
    edit: Result<ParsedEdit, Degradation>,
    settings: &ReconstructionSettings,
) -> Reconstruction {
    let (edited_text, mut ats_score, mut tips, mut degraded) = match edit {
        Ok(parsed) => {
            let text = match parsed.result {
                EditResult::PlainText(text) => text,
                EditResult::Structured(tree) => serialize_structured(&tree),
            };
            (normalize_document(&text), parsed.ats_score, parsed.tips, None)
        }
        Err(reason) => (String::new(), 0, Vec::new(), Some(reason)),
    };

    if degraded.is_none() && edited_text.is_empty() {
        warn!("Edit produced no resume text. Falling back to original text");
        degraded = Some(Degradation::EmptyResult);
    }

    let mut fidelity =
        FidelityCheck::evaluate(original_text, &edited_text, settings.fidelity_min_ratio);
    if degraded.is_none() && !fidelity.passed {
        warn!(
            original_lines = fidelity.original_lines,
            final_lines = fidelity.final_lines,
            "Edited resume lost content. Falling back to original text"
        );
        degraded = Some(Degradation::FidelityCheckFailed);
    }

    let final_text = match degraded {
        None => edited_text,
        Some(Degradation::FidelityCheckFailed) => normalize_document(original_text),
        Some(_) => {
            let fallback = normalize_document(original_text);
            fidelity =
                FidelityCheck::evaluate(original_text, &fallback, settings.fidelity_min_ratio);
            fallback
        }
    };
    // Score and tips describe the edit, not the original that replaced it.
    if degraded.is_some() {
        ats_score = 0;
        tips.clear();
    }

    let resume = ReconstructedResume::from_text(final_text);
    let keyword_verification = KeywordVerification::verify(&resume.text, keywords);
    let structure = compare_structure(original_text, &resume.text);
    log_structure_drift(original_text, &resume.text, &structure);

    info!(
        integrated = keyword_verification.integrated.len(),
        requested = keywords.len(),
        rate = keyword_verification.integration_rate,
        sections = resume.sections.len(),
        bullets = resume.bullet_count,
        ?degraded,
        "Resume reconstructed"
    );

    Reconstruction {
        resume,
        ats_score,
        tips,
        keyword_verification,
        fidelity,
        structure,
        degraded,
    }
}

fn log_structure_drift(original: &str, optimized: &str, structure: &StructureComparison) {
    let original_chars = original.chars().count();
    let optimized_chars = optimized.chars().count();
    if (optimized_chars as f64) < original_chars as f64 * LENGTH_WARNING_RATIO {
        warn!(
            original_chars,
            optimized_chars, "Optimized resume is much shorter than the original"
        );
    }
    if structure.bullet_count_optimized < structure.bullet_count_original {
        warn!(
            missing = structure.bullet_count_original - structure.bullet_count_optimized,
            "Optimized resume has fewer bullet points than the original"
        );
    }
    let experience_before = section_bullets(original, SectionType::Experience).len();
    let experience_after = section_bullets(optimized, SectionType::Experience).len();
    if experience_after < experience_before {
        warn!(
            experience_before,
            experience_after, "Experience section lost bullet points"
        );
    }
    if !structure.sections_preserved {
        warn!(
            original = structure.original_sections.len(),
            optimized = structure.optimized_sections.len(),
            "Section count changed during optimization"
        );
    }
}
