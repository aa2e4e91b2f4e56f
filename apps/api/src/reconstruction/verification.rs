//! Post-edit checks: line-count fidelity and keyword integration.

use serde::Serialize;

use crate::keywords::matcher::percentage;

pub const DEFAULT_FIDELITY_MIN_RATIO: f64 = 0.8;

// ────────────────────────────────────────────────────────────────────────────
// Fidelity
// ────────────────────────────────────────────────────────────────────────────

/// Compares non-blank line counts before and after an edit. A large drop means the
/// edit likely lost content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FidelityCheck {
    pub original_lines: usize,
    pub final_lines: usize,
    pub min_ratio: f64,
    pub passed: bool,
}

impl FidelityCheck {
    pub fn evaluate(original: &str, edited: &str, min_ratio: f64) -> Self {
        let original_lines = non_blank_lines(original);
        let final_lines = non_blank_lines(edited);
        Self {
            original_lines,
            final_lines,
            min_ratio,
            passed: final_lines as f64 >= original_lines as f64 * min_ratio,
        }
    }
}

pub fn non_blank_lines(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword integration
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordVerification {
    pub integrated: Vec<String>,
    pub missing: Vec<String>,
    pub integration_rate: f64,
}

impl KeywordVerification {
    /// A keyword is integrated if it appears verbatim (case-insensitive), or, for a
    /// multi-word keyword, if every one of its words appears somewhere in the text.
    pub fn verify<S: AsRef<str>>(text: &str, keywords: &[S]) -> Self {
        let text_lower = text.to_lowercase();
        let requested: Vec<&str> = keywords
            .iter()
            .map(|k| k.as_ref().trim())
            .filter(|k| !k.is_empty())
            .collect();

        let (integrated, missing): (Vec<String>, Vec<String>) = requested
            .iter()
            .map(|k| k.to_string())
            .partition(|keyword| is_integrated(&text_lower, keyword));

        Self {
            integration_rate: percentage(integrated.len(), requested.len()),
            integrated,
            missing,
        }
    }
}

fn is_integrated(text_lower: &str, keyword: &str) -> bool {
    let keyword_lower = keyword.to_lowercase();
    if text_lower.contains(&keyword_lower) {
        return true;
    }
    let words: Vec<&str> = keyword_lower.split_whitespace().collect();
    words.len() > 1 && words.iter().all(|word| text_lower.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(count: usize) -> String {
        (0..count)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    #[test]
    fn test_fidelity_fails_below_ratio() {
        let check = FidelityCheck::evaluate(&lines(40), &lines(25), DEFAULT_FIDELITY_MIN_RATIO);
        assert_eq!(check.original_lines, 40);
        assert_eq!(check.final_lines, 25);
        assert!(!check.passed);
    }

    #[test]
    fn test_fidelity_passes_at_ratio() {
        assert!(FidelityCheck::evaluate(&lines(40), &lines(32), 0.8).passed);
        assert!(FidelityCheck::evaluate("", "", 0.8).passed);
    }

    #[test]
    fn test_scattered_multi_word_keyword_is_integrated() {
        let report = KeywordVerification::verify(
            "Trained a learning-to-rank model on machine telemetry",
            &["machine learning", "SQL"],
        );
        assert_eq!(report.integrated, vec!["machine learning"]);
        assert_eq!(report.missing, vec!["SQL"]);
        assert_eq!(report.integration_rate, 50.0);
    }

    #[test]
    fn test_single_word_keyword_needs_verbatim_match() {
        let report = KeywordVerification::verify("Wrote PostgreSQL queries", &["sql", "MySQL"]);
        assert_eq!(report.integrated, vec!["sql"]);
        assert_eq!(report.missing, vec!["MySQL"]);
    }

    #[test]
    fn test_no_keywords_rate_zero() {
        let report = KeywordVerification::verify::<&str>("anything", &[]);
        assert_eq!(report.integration_rate, 0.0);
        assert!(report.integrated.is_empty());
    }
}
