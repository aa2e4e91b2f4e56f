// LLM prompt constants for resume optimization.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

/// Job description context is cut to this many characters.
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 2000;

pub fn resume_edit_system() -> String {
    format!(
        "You are a resume optimizer. Rewrite the user's real resume to integrate the \
        selected keywords. Keep EVERY section, job, project and achievement from the \
        original. The optimizedResume field must hold the full resume as plain text, \
        not an object or a list. {JSON_ONLY_SYSTEM}"
    )
}

/// Resume optimization prompt. Replace `{resume_text}`, `{job_title}`,
/// `{keyword_count}`, `{keywords}` and `{job_description}` before sending.
pub const RESUME_EDIT_PROMPT_TEMPLATE: &str = r#"Optimize the resume below for the target role.

MISSION:
1. Preserve all genuine information: name, contact, experience, education, skills
2. Work the selected keywords naturally into EXISTING bullets and the skills section
3. Make bullet points more ATS-friendly without inventing anything

FORBIDDEN:
- Do NOT create jobs, companies, dates, degrees or project details
- Do NOT remove or summarize any experience, project or skill
- Do NOT use markdown (no **, no #)

REQUIRED PLAIN-TEXT LAYOUT:

[Full Name]
[Phone] | [Email] | [LinkedIn] | [GitHub]

EDUCATION
[School Name], [City, State]
[Degree and Major], Expected: [Date]
• [Achievement or scholarship]
• Relevant Courses: [courses]

TECHNICAL SKILLS
Languages: [list]
Technologies: [list]
Tools: [list]

PROFESSIONAL EXPERIENCES
[Job Title], [Start Date] – [End Date]
[Company Name], [City, State]
• [Achievement with metrics]

TECHNICAL PROJECTS
• [Project with technologies used]

FORMATTING RULES:
1. Section headers in ALL CAPS on their own line
2. Job title and company on separate lines
3. Every achievement is a bullet starting with "• "
4. Dates as Month YYYY – Month YYYY
5. One blank line between sections

ORIGINAL RESUME:
{resume_text}

TARGET ROLE: {job_title}

SELECTED KEYWORDS TO INTEGRATE ({keyword_count} total):
{keywords}

JOB DESCRIPTION FOR CONTEXT:
{job_description}

The optimized resume MUST be at least as long as the original.

Return a JSON object with this EXACT schema:
{
  "optimizedResume": "the COMPLETE resume as plain text",
  "atsScore": 85,
  "tips": ["improvement 1", "improvement 2"]
}"#;

pub fn build_resume_edit_prompt(
    resume_text: &str,
    keywords: &[String],
    job_title: &str,
    job_description: &str,
) -> String {
    let job_title = match job_title.trim() {
        "" => "Not specified",
        title => title,
    };
    let job_description: String = match job_description.trim() {
        "" => "Not provided".to_string(),
        text => text.chars().take(MAX_JOB_DESCRIPTION_CHARS).collect(),
    };
    let keyword_lines = keywords
        .iter()
        .map(|keyword| format!("→ {keyword}"))
        .collect::<Vec<_>>()
        .join("\n");

    // The resume goes in last so its text is never scanned for placeholders.
    RESUME_EDIT_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replace("{keyword_count}", &keywords.len().to_string())
        .replace("{keywords}", &keyword_lines)
        .replace("{job_description}", &job_description)
        .replace("{resume_text}", resume_text)
}
