//! Keyword Matcher: splits job-derived phrases into present vs absent for a resume.
//!
//! A phrase matches when its lowercase form is a substring of the lowercase resume,
//! or when any of its whitespace-split tokens longer than `min_token_chars`
//! is such a substring. The token fallback trades precision for recall:
//! "data entry" matches a resume mentioning "data science".

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::Config;

pub const DEFAULT_MIN_TOKEN_CHARS: usize = 3;

/// Keyword-bearing fields of a parsed job posting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobKeywordFields {
    #[serde(deserialize_with = "lenient_title")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_phrases")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient_phrases")]
    pub requirements: Vec<String>,
    #[serde(deserialize_with = "lenient_phrases")]
    pub technologies: Vec<String>,
    #[serde(deserialize_with = "lenient_phrases")]
    pub tools: Vec<String>,
    #[serde(deserialize_with = "lenient_phrases")]
    pub qualifications: Vec<String>,
}

/// Only arrays contribute phrases; other values and non-string entries are skipped.
fn lenient_phrases<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(text) => Some(text),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn lenient_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(title) => Some(title),
        _ => None,
    })
}

impl JobKeywordFields {
    /// All phrases across fields, trimmed, empty entries dropped, deduplicated
    /// case-insensitively keeping the first spelling seen.
    pub fn phrases(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.skills
            .iter()
            .chain(&self.requirements)
            .chain(&self.technologies)
            .chain(&self.tools)
            .chain(&self.qualifications)
            .map(|phrase| phrase.trim())
            .filter(|phrase| !phrase.is_empty())
            .filter(|phrase| seen.insert(phrase.to_lowercase()))
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub match_score: f64,
    pub matching_phrases: Vec<String>,
    pub missing_phrases: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordMatcher {
    min_token_chars: usize,
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_TOKEN_CHARS)
    }
}

impl KeywordMatcher {
    pub fn new(min_token_chars: usize) -> Self {
        Self { min_token_chars }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.keyword_min_token_chars)
    }

    pub fn match_fields(&self, resume_text: &str, job: &JobKeywordFields) -> MatchReport {
        self.match_phrases(resume_text, &job.phrases())
    }

    /// Classifies `phrases` (expected already deduplicated) against `resume_text`.
    pub fn match_phrases(&self, resume_text: &str, phrases: &[String]) -> MatchReport {
        let resume_lower = resume_text.to_lowercase();
        let (matching_phrases, missing_phrases): (Vec<String>, Vec<String>) = phrases
            .iter()
            .cloned()
            .partition(|phrase| self.is_present(&resume_lower, phrase));

        MatchReport {
            match_score: percentage(matching_phrases.len(), phrases.len()),
            matching_phrases,
            missing_phrases,
        }
    }

    fn is_present(&self, resume_lower: &str, phrase: &str) -> bool {
        let phrase_lower = phrase.to_lowercase();
        resume_lower.contains(&phrase_lower)
            || phrase_lower
                .split_whitespace()
                .filter(|token| token.chars().count() > self.min_token_chars)
                .any(|token| resume_lower.contains(token))
    }
}

/// `part / whole * 100` rounded to one decimal; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}
