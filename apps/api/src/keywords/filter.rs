//! Keyword Actionability Filter: keeps the missing keywords a candidate can add by
//! rewording, drops tenure, degree, clearance and logistics requirements.
//!
//! The model-backed classifier is tried first when configured. Its output is only
//! trusted if it is a JSON object whose `actionableKeywords` is an array; anything
//! else (including a failed call) falls back to the rule-based filter.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::keywords::models::{KeywordCandidate, KeywordCategory, KeywordPriority};
use crate::keywords::prompts::{
    build_keyword_filter_prompt, keyword_filter_system, MAX_CLASSIFIED_PHRASES,
};
use crate::llm_client::{LlmClient, LlmError};

const RULE_BASED_HINT: &str = "Add to relevant experience bullets or skills section";

/// Ordered exclusion rules: `(reason, pattern)`. Matched case-insensitively.
const EXCLUSION_RULES: &[(&str, &str)] = &[
    ("tenure", r"\d+\+?\s*years?"),
    ("degree", r"bachelor"),
    ("degree", r"master"),
    ("degree", r"ph\.?d"),
    ("degree", r"degree"),
    ("clearance", r"clearance"),
    ("certification", r"certification"),
    ("logistics", r"travel"),
    ("logistics", r"ability to"),
    ("vague", r"strong\s+\w+"),
    ("vague", r"excellent\s+\w+"),
    ("vague", r"team player"),
];

static EXCLUSIONS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    EXCLUSION_RULES
        .iter()
        .map(|(reason, pattern)| {
            let regex = Regex::new(&format!("(?i){pattern}"))
                .expect("exclusion rule is a valid literal regex");
            (*reason, regex)
        })
        .collect()
});

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterSource {
    Model,
    RuleBased,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOutcome {
    pub actionable_keywords: Vec<KeywordCandidate>,
    pub filtered_out: Vec<String>,
    pub suggestions: Vec<String>,
    pub source: FilterSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Classification capability
// ────────────────────────────────────────────────────────────────────────────

/// External keyword classification. Returns the raw JSON payload; shape
/// validation happens in `filter_actionable`, not in implementations.
#[async_trait]
pub trait KeywordClassifier: Send + Sync {
    async fn classify(&self, phrases: &[String], job_title: &str) -> Result<Value, LlmError>;
}

pub struct LlmKeywordClassifier {
    llm: LlmClient,
}

impl LlmKeywordClassifier {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl KeywordClassifier for LlmKeywordClassifier {
    async fn classify(&self, phrases: &[String], job_title: &str) -> Result<Value, LlmError> {
        let prompt = build_keyword_filter_prompt(phrases, job_title);
        self.llm
            .call_json::<Value>(&prompt, &keyword_filter_system())
            .await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Filtering
// ────────────────────────────────────────────────────────────────────────────

pub async fn filter_actionable(
    classifier: Option<&Arc<dyn KeywordClassifier>>,
    missing_phrases: &[String],
    job_title: &str,
) -> FilterOutcome {
    if missing_phrases.is_empty() {
        return FilterOutcome {
            actionable_keywords: Vec::new(),
            filtered_out: Vec::new(),
            suggestions: Vec::new(),
            source: FilterSource::RuleBased,
        };
    }

    let Some(classifier) = classifier else {
        info!("No classifier configured. Using rule-based keyword filter");
        return rule_based_filter(missing_phrases);
    };

    let bounded = &missing_phrases[..missing_phrases.len().min(MAX_CLASSIFIED_PHRASES)];
    match classifier.classify(bounded, job_title).await {
        Ok(payload) => match parse_classification(&payload) {
            Some(outcome) => {
                info!(
                    actionable = outcome.actionable_keywords.len(),
                    "Model classified actionable keywords"
                );
                outcome
            }
            None => {
                warn!("Classifier returned an unexpected shape. Using rule-based filter");
                debug!(%payload, "Rejected classifier payload");
                rule_based_filter(missing_phrases)
            }
        },
        Err(e) => {
            warn!("Keyword classification failed: {e}. Using rule-based filter");
            rule_based_filter(missing_phrases)
        }
    }
}

/// Validates a classifier payload. `None` means the payload cannot be trusted.
pub fn parse_classification(payload: &Value) -> Option<FilterOutcome> {
    let items = payload.get("actionableKeywords")?.as_array()?;

    let actionable_keywords = items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) if !text.trim().is_empty() => {
                Some(KeywordCandidate::new(text.trim()))
            }
            Value::Object(_) => serde_json::from_value::<KeywordCandidate>(item.clone())
                .ok()
                .filter(|candidate| !candidate.text.trim().is_empty()),
            _ => None,
        })
        .collect();

    Some(FilterOutcome {
        actionable_keywords,
        filtered_out: string_list(payload.get("filteredOut")),
        suggestions: string_list(payload.get("suggestions")),
        source: FilterSource::Model,
    })
}

/// Accepts bare strings or objects carrying a `keyword` field.
fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text.clone()),
                    Value::Object(map) => map.get("keyword")?.as_str().map(str::to_string),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn rule_based_filter(phrases: &[String]) -> FilterOutcome {
    let mut actionable_keywords = Vec::new();
    let mut filtered_out = Vec::new();

    for phrase in phrases {
        match exclusion_reason(phrase) {
            Some(reason) => {
                debug!(%phrase, reason, "Excluded non-actionable keyword");
                filtered_out.push(phrase.clone());
            }
            None => actionable_keywords.push(KeywordCandidate {
                text: phrase.clone(),
                category: KeywordCategory::Skill,
                priority: KeywordPriority::Medium,
                integration_hint: Some(RULE_BASED_HINT.to_string()),
            }),
        }
    }

    FilterOutcome {
        actionable_keywords,
        filtered_out,
        suggestions: Vec::new(),
        source: FilterSource::RuleBased,
    }
}

/// First exclusion rule the phrase trips, if any.
pub fn exclusion_reason(phrase: &str) -> Option<&'static str> {
    EXCLUSIONS
        .iter()
        .find(|(_, pattern)| pattern.is_match(phrase))
        .map(|(reason, _)| *reason)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde_json::json;

    use super::*;

    fn phrases(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn texts(outcome: &FilterOutcome) -> Vec<&str> {
        outcome
            .actionable_keywords
            .iter()
            .map(|c| c.text.as_str())
            .collect()
    }

    struct FakeClassifier {
        response: Result<Value, ()>,
        seen: Mutex<Vec<usize>>,
    }

    impl FakeClassifier {
        fn returning(response: Result<Value, ()>) -> Arc<dyn KeywordClassifier> {
            Arc::new(Self {
                response,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl KeywordClassifier for FakeClassifier {
        async fn classify(&self, phrases: &[String], _job_title: &str) -> Result<Value, LlmError> {
            self.seen.lock().unwrap().push(phrases.len());
            self.response.clone().map_err(|_| LlmError::EmptyContent)
        }
    }

    #[test]
    fn test_rule_based_drops_qualifications() {
        let outcome = rule_based_filter(&phrases(&[
            "Python",
            "5+ years experience",
            "Bachelor's degree",
            "SQL",
        ]));
        assert_eq!(texts(&outcome), vec!["Python", "SQL"]);
        assert_eq!(outcome.filtered_out, vec!["5+ years experience", "Bachelor's degree"]);
        assert_eq!(outcome.source, FilterSource::RuleBased);

        let python = &outcome.actionable_keywords[0];
        assert_eq!(python.category, KeywordCategory::Skill);
        assert_eq!(python.priority, KeywordPriority::Medium);
        assert_eq!(python.integration_hint.as_deref(), Some(RULE_BASED_HINT));
    }

    #[test]
    fn test_exclusion_reasons() {
        assert_eq!(exclusion_reason("3 years of Go"), Some("tenure"));
        assert_eq!(exclusion_reason("PhD in Statistics"), Some("degree"));
        assert_eq!(exclusion_reason("Secret Clearance"), Some("clearance"));
        assert_eq!(exclusion_reason("Willing to TRAVEL 20%"), Some("logistics"));
        assert_eq!(exclusion_reason("Strong communication"), Some("vague"));
        assert_eq!(exclusion_reason("team player"), Some("vague"));
        assert_eq!(exclusion_reason("Kubernetes"), None);
    }

    #[tokio::test]
    async fn test_no_classifier_uses_rules() {
        let outcome = filter_actionable(None, &phrases(&["Rust", "Master's degree"]), "").await;
        assert_eq!(texts(&outcome), vec!["Rust"]);
        assert_eq!(outcome.source, FilterSource::RuleBased);
    }

    #[tokio::test]
    async fn test_valid_model_payload_is_trusted() {
        let classifier = FakeClassifier::returning(Ok(json!({
            "actionableKeywords": [
                {"keyword": "Airflow", "category": "Tool", "priority": "high"},
                "dbt",
                42
            ],
            "filteredOut": ["5+ years", {"keyword": "BS degree", "reason": "education"}],
            "suggestions": ["Lead with pipeline work"]
        })));
        let outcome =
            filter_actionable(Some(&classifier), &phrases(&["Airflow", "dbt"]), "Data Engineer")
                .await;

        assert_eq!(outcome.source, FilterSource::Model);
        assert_eq!(texts(&outcome), vec!["Airflow", "dbt"]);
        assert_eq!(outcome.actionable_keywords[0].category, KeywordCategory::Tool);
        assert_eq!(outcome.filtered_out, vec!["5+ years", "BS degree"]);
        assert_eq!(outcome.suggestions, vec!["Lead with pipeline work"]);
    }

    #[tokio::test]
    async fn test_wrong_shape_falls_back_to_rules() {
        let classifier =
            FakeClassifier::returning(Ok(json!({"actionableKeywords": "Python, SQL"})));
        let outcome =
            filter_actionable(Some(&classifier), &phrases(&["Python", "10 years"]), "").await;
        assert_eq!(outcome.source, FilterSource::RuleBased);
        assert_eq!(texts(&outcome), vec!["Python"]);
    }

    #[tokio::test]
    async fn test_classifier_error_falls_back_to_rules() {
        let classifier = FakeClassifier::returning(Err(()));
        let outcome = filter_actionable(Some(&classifier), &phrases(&["SQL"]), "").await;
        assert_eq!(outcome.source, FilterSource::RuleBased);
        assert_eq!(texts(&outcome), vec!["SQL"]);
    }

    #[tokio::test]
    async fn test_classifier_sees_at_most_forty_phrases() {
        let fake = Arc::new(FakeClassifier {
            response: Ok(json!({"actionableKeywords": []})),
            seen: Mutex::new(Vec::new()),
        });
        let classifier: Arc<dyn KeywordClassifier> = fake.clone();
        let many: Vec<String> = (0..55).map(|i| format!("skill {i}")).collect();

        filter_actionable(Some(&classifier), &many, "").await;
        assert_eq!(*fake.seen.lock().unwrap(), vec![40]);
    }

    #[tokio::test]
    async fn test_empty_input_short_circuits() {
        let classifier = FakeClassifier::returning(Err(()));
        let outcome = filter_actionable(Some(&classifier), &[], "").await;
        assert!(outcome.actionable_keywords.is_empty());
    }
}
