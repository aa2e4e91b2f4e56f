use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Absent means rule-based keyword filtering only, and optimize is unavailable.
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Lowercase extensions including the dot, e.g. `.pdf`.
    pub allowed_file_types: Vec<String>,
    /// Upload limit in bytes.
    pub max_file_size: usize,
    pub snapshot_dir: Option<PathBuf>,
    pub ocr_dpi: u32,
    pub ocr_max_pages: usize,
    pub min_extracted_chars: usize,
    pub keyword_min_token_chars: usize,
    pub fidelity_min_ratio: f64,
    pub llm_max_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            anthropic_api_key: None,
            port: 8080,
            rust_log: "info".to_string(),
            allowed_file_types: vec![".pdf".to_string()],
            max_file_size: 5 * 1024 * 1024,
            snapshot_dir: None,
            ocr_dpi: 300,
            ocr_max_pages: 5,
            min_extracted_chars: 50,
            keyword_min_token_chars: 3,
            fidelity_min_ratio: 0.8,
            llm_max_attempts: 1,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: parse_env("PORT", defaults.port)?,
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
            allowed_file_types: optional_env("ALLOWED_FILE_TYPES")
                .map(|raw| parse_file_types(&raw))
                .filter(|types| !types.is_empty())
                .unwrap_or(defaults.allowed_file_types),
            max_file_size: parse_env("MAX_FILE_SIZE", defaults.max_file_size)?,
            snapshot_dir: optional_env("SNAPSHOT_DIR").map(PathBuf::from),
            ocr_dpi: parse_env("OCR_DPI", defaults.ocr_dpi)?,
            ocr_max_pages: parse_env("OCR_MAX_PAGES", defaults.ocr_max_pages)?,
            min_extracted_chars: parse_env("MIN_EXTRACTED_CHARS", defaults.min_extracted_chars)?,
            keyword_min_token_chars: parse_env(
                "KEYWORD_MIN_TOKEN_CHARS",
                defaults.keyword_min_token_chars,
            )?,
            fidelity_min_ratio: parse_env("FIDELITY_MIN_RATIO", defaults.fidelity_min_ratio)?,
            llm_max_attempts: parse_env("LLM_MAX_ATTEMPTS", defaults.llm_max_attempts)?
                .max(1),
        })
    }
}

/// Unset and blank are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

/// `"pdf, .DOCX"` becomes `[".pdf", ".docx"]`.
fn parse_file_types(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.allowed_file_types, vec![".pdf"]);
        assert_eq!(config.max_file_size, 5_242_880);
        assert_eq!(config.llm_max_attempts, 1);
        assert!(config.anthropic_api_key.is_none());
    }

    #[test]
    fn test_parse_file_types_normalizes_dots_and_case() {
        assert_eq!(parse_file_types("pdf, .DOCX,, "), vec![".pdf", ".docx"]);
    }

    #[test]
    fn test_parse_env_reports_variable_name() {
        std::env::set_var("TAILOR_TEST_OCR_DPI", "three hundred");
        let err = parse_env::<u32>("TAILOR_TEST_OCR_DPI", 300).unwrap_err();
        assert!(err.to_string().contains("TAILOR_TEST_OCR_DPI"));
        std::env::remove_var("TAILOR_TEST_OCR_DPI");

        assert_eq!(parse_env::<u32>("TAILOR_TEST_UNSET_VAR", 7).unwrap(), 7);
    }
}
