use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::keywords::filter::{filter_actionable, FilterSource, KeywordClassifier};
use crate::keywords::matcher::{JobKeywordFields, KeywordMatcher};
use crate::keywords::models::KeywordCandidate;

/// Match report plus the actionable subset of the missing phrases.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub match_score: f64,
    pub matching_phrases: Vec<String>,
    pub missing_phrases: Vec<String>,
    pub actionable_keywords: Vec<KeywordCandidate>,
    pub total_keywords: usize,
    pub classification: FilterSource,
}

/// Runs the matcher over every keyword field of the job, then the actionability
/// filter over whatever is missing.
pub async fn analyze_resume(
    matcher: &KeywordMatcher,
    classifier: Option<&Arc<dyn KeywordClassifier>>,
    resume_text: &str,
    job: &JobKeywordFields,
) -> AnalysisReport {
    let report = matcher.match_fields(resume_text, job);
    let total_keywords = report.matching_phrases.len() + report.missing_phrases.len();
    let job_title = job.title.as_deref().unwrap_or_default();
    let filtered = filter_actionable(classifier, &report.missing_phrases, job_title).await;

    info!(
        total = total_keywords,
        matching = report.matching_phrases.len(),
        missing = report.missing_phrases.len(),
        actionable = filtered.actionable_keywords.len(),
        score = report.match_score,
        "Analyzed resume against job"
    );

    AnalysisReport {
        match_score: report.match_score,
        matching_phrases: report.matching_phrases,
        missing_phrases: report.missing_phrases,
        actionable_keywords: filtered.actionable_keywords,
        total_keywords,
        classification: filtered.source,
    }
}
