// LLM prompt constants for keyword classification.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// At most this many phrases are sent for classification.
pub const MAX_CLASSIFIED_PHRASES: usize = 40;

pub fn keyword_filter_system() -> String {
    format!("You are an expert ATS keyword analyzer. {JSON_ONLY_SYSTEM}")
}

/// Keyword classification prompt. Replace `{job_title}` and `{keywords}` before sending.
pub const KEYWORD_FILTER_PROMPT_TEMPLATE: &str = r#"Analyze these keywords from a job posting for a {job_title} role.

TASK: Keep ONLY keywords a candidate can incorporate into an existing resume by rewording
truthful experience bullets.

INCLUDE (actionable):
- Skills (e.g. "data analysis", "project management")
- Tools and technologies (e.g. "Python", "SQL", "Tableau")
- Methodologies (e.g. "Agile", "Six Sigma")
- Soft skills when specific (e.g. "stakeholder communication")
- Industry terms (e.g. "A/B testing", "ETL pipelines")

EXCLUDE (not actionable):
- Years of experience (e.g. "5+ years", "3-5 years experience")
- Education requirements (e.g. "Bachelor's degree", "Master's in CS")
- Certifications that take exams or time (e.g. "PMP", "CPA", "AWS Certified")
- Clearance requirements (e.g. "Security Clearance")
- Vague phrases (e.g. "strong communication", "team player")
- Logistics (e.g. "ability to travel", "work independently")

KEYWORDS TO FILTER:
{keywords}

Return a JSON object with this EXACT schema:
{
  "actionableKeywords": [
    {
      "keyword": "exact keyword text",
      "category": "Skill|Tool|Methodology|Technology|DomainKnowledge|SoftSkill",
      "priority": "high|medium|low",
      "suggestedIntegration": "brief tip on how to work this into experience bullets"
    }
  ],
  "filteredOut": ["keyword excluded above"],
  "suggestions": ["optional general advice"]
}

Priority guidelines:
- high: core technical skills and tools the posting leans on
- medium: supplementary skills and methodologies
- low: nice-to-have or tangential technologies"#;

pub fn build_keyword_filter_prompt(phrases: &[String], job_title: &str) -> String {
    let job_title = match job_title.trim() {
        "" => "professional",
        title => title,
    };
    let keywords = phrases
        .iter()
        .take(MAX_CLASSIFIED_PHRASES)
        .map(|phrase| format!("- {phrase}"))
        .collect::<Vec<_>>()
        .join("\n");

    KEYWORD_FILTER_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{keywords}", &keywords)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_at_most_forty_phrases() {
        let phrases: Vec<String> = (0..45).map(|i| format!("kw{i}")).collect();
        let prompt = build_keyword_filter_prompt(&phrases, "Data Engineer");
        assert!(prompt.contains("for a Data Engineer role"));
        assert!(prompt.contains("- kw39\n"));
        assert!(!prompt.contains("- kw40"));
    }

    #[test]
    fn test_blank_title_defaults_to_professional() {
        let prompt = build_keyword_filter_prompt(&["SQL".into()], "  ");
        assert!(prompt.contains("for a professional role"));
    }
}
