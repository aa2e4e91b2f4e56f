//! Boundary validation for the edit capability's response.
//!
//! The editor is asked for plain text but sometimes answers with a nested object.
//! Everything untyped is resolved here, once, into `EditResult`: either plain text or a
//! canonical `StructuredResume` with every alias already resolved. Nothing downstream
//! branches on JSON shape.
//!
//! Alias resolution order (first key present wins for sections, first non-empty value
//! wins for fields inside an entry):
//! - skills: `skills`, `technicalSkills`, `technical_skills`
//! - experiences: `professionalExperiences`, `experiences`, `workExperience`,
//!   `professional_experiences`
//! - experience title: `title`, `jobTitle`, `position`
//! - experience company: `company`, `employer`
//! - experience dates: `dates`, `dateRange`, `duration`
//! - experience bullets: `responsibilities`, `bullets`, `achievements`, `duties`
//! - projects: `technicalProjects`, `projects`; project title `title`, `name`;
//!   project description `description`, `summary`

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use thiserror::Error;

const SKILLS_KEYS: &[&str] = &["skills", "technicalSkills", "technical_skills"];
const EXPERIENCE_KEYS: &[&str] = &[
    "professionalExperiences",
    "experiences",
    "workExperience",
    "professional_experiences",
];
const PROJECT_KEYS: &[&str] = &["technicalProjects", "projects"];
const TITLE_KEYS: &[&str] = &["title", "jobTitle", "position"];
const COMPANY_KEYS: &[&str] = &["company", "employer"];
const DATE_KEYS: &[&str] = &["dates", "dateRange", "duration"];
const RESPONSIBILITY_KEYS: &[&str] = &["responsibilities", "bullets", "achievements", "duties"];
const PROJECT_TITLE_KEYS: &[&str] = &["title", "name"];
const PROJECT_DESCRIPTION_KEYS: &[&str] = &["description", "summary"];

/// Contact values that are bare labels rather than real links.
const CONTACT_PLACEHOLDERS: &[&str] = &["github", "linkedin"];

#[derive(Debug, Error, PartialEq)]
pub enum EditShapeError {
    #[error("optimizedResume has unsupported type: {0}")]
    UnsupportedType(&'static str),

    #[error("optimizedResume array mixes text and nested values")]
    MixedArray,
}

// ────────────────────────────────────────────────────────────────────────────
// Raw capability response
// ────────────────────────────────────────────────────────────────────────────

/// Envelope returned by the edit capability.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditResponse {
    #[serde(default)]
    pub optimized_resume: Value,
    #[serde(default, deserialize_with = "lenient_score")]
    pub ats_score: u32,
    #[serde(default, deserialize_with = "lenient_text_list")]
    pub tips: Vec<String>,
}

/// Accepts a number or numeric string; anything else scores 0. Clamped to 0..=100.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let score = match &value {
        Value::Number(n) => n.as_f64().unwrap_or_default(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().unwrap_or_default(),
        _ => 0.0,
    };
    Ok(score.round().clamp(0.0, 100.0) as u32)
}

fn lenient_text_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(text_list(&value))
}

// ────────────────────────────────────────────────────────────────────────────
// Canonical tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum EditResult {
    PlainText(String),
    Structured(StructuredResume),
}

impl EditResult {
    pub fn from_value(value: &Value) -> Result<Self, EditShapeError> {
        match value {
            Value::String(text) => Ok(Self::PlainText(text.clone())),
            Value::Object(map) => Ok(Self::Structured(StructuredResume::from_map(map))),
            Value::Array(items) if items.iter().all(Value::is_string) => Ok(Self::PlainText(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join("\n"),
            )),
            Value::Array(_) => Err(EditShapeError::MixedArray),
            Value::Null => Err(EditShapeError::UnsupportedType("null")),
            Value::Bool(_) => Err(EditShapeError::UnsupportedType("boolean")),
            Value::Number(_) => Err(EditShapeError::UnsupportedType("number")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuredResume {
    pub name: Option<String>,
    pub contact: Vec<String>,
    pub education: Vec<EducationBlock>,
    pub skills: Option<SkillsBlock>,
    pub experiences: Vec<Experience>,
    pub projects: Vec<Project>,
    pub leadership: Vec<String>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EducationBlock {
    Detailed(Education),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Education {
    pub institution: Option<String>,
    pub location: Option<String>,
    pub expected_graduation: Option<String>,
    pub degree: Option<String>,
    pub gpa: Option<String>,
    pub honors: Vec<String>,
    pub courses: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkillsBlock {
    /// `(category label, skills)` in source order.
    Categories(Vec<(String, Vec<String>)>),
    Text(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Experience {
    pub title: Option<String>,
    pub dates: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Project {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl StructuredResume {
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let resume = Self {
            name: map.get("name").and_then(scalar_text),
            contact: map.get("contact").map(contact_values).unwrap_or_default(),
            education: map.get("education").map(education_blocks).unwrap_or_default(),
            skills: first_present(map, SKILLS_KEYS).and_then(skills_block),
            experiences: first_present(map, EXPERIENCE_KEYS)
                .map(experiences)
                .unwrap_or_default(),
            projects: first_present(map, PROJECT_KEYS)
                .map(projects)
                .unwrap_or_default(),
            leadership: map.get("leadership").map(text_list).unwrap_or_default(),
            certifications: map.get("certifications").map(text_list).unwrap_or_default(),
        };
        tracing::debug!(
            keys = ?map.keys().collect::<Vec<_>>(),
            experiences = resume.experiences.len(),
            projects = resume.projects.len(),
            "Resolved structured resume"
        );
        resume
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Alias and coercion helpers
// ────────────────────────────────────────────────────────────────────────────

fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| map.get(*key))
}

fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| map.get(*key).and_then(scalar_text))
}

/// Trimmed, non-empty text of a string, number or boolean.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Text of a list entry: scalars as-is, objects as their scalar values joined by ", ".
fn item_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            let parts: Vec<String> = map.values().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        other => scalar_text(other),
    }
}

/// A list of entries, or a single scalar treated as a one-entry list.
fn text_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(item_text).collect(),
        other => item_text(other).into_iter().collect(),
    }
}

fn contact_values(value: &Value) -> Vec<String> {
    let values: Vec<String> = match value {
        Value::Object(map) => map.values().filter_map(scalar_text).collect(),
        other => text_list(other),
    };
    values
        .into_iter()
        .filter(|v| !CONTACT_PLACEHOLDERS.contains(&v.to_lowercase().as_str()))
        .collect()
}

fn education_blocks(value: &Value) -> Vec<EducationBlock> {
    match value {
        Value::Object(map) => vec![EducationBlock::Detailed(education(map))],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(EducationBlock::Detailed(education(map))),
                other => scalar_text(other).map(EducationBlock::Text),
            })
            .collect(),
        other => scalar_text(other)
            .map(EducationBlock::Text)
            .into_iter()
            .collect(),
    }
}

fn education(map: &Map<String, Value>) -> Education {
    Education {
        institution: first_text(map, &["institution", "school", "university"]),
        location: first_text(map, &["location"]),
        expected_graduation: first_text(map, &["expectedGraduation", "graduationDate"]),
        degree: first_text(map, &["degree"]),
        gpa: first_text(map, &["gpa", "GPA"]),
        honors: map.get("honors").map(text_list).unwrap_or_default(),
        courses: map.get("courses").map(text_list).unwrap_or_default(),
    }
}

fn skills_block(value: &Value) -> Option<SkillsBlock> {
    match value {
        Value::Object(map) => {
            let categories: Vec<(String, Vec<String>)> = map
                .iter()
                .map(|(category, skills)| (category_label(category), text_list(skills)))
                .filter(|(_, skills)| !skills.is_empty())
                .collect();
            (!categories.is_empty()).then_some(SkillsBlock::Categories(categories))
        }
        Value::Array(_) => {
            let skills = text_list(value);
            (!skills.is_empty()).then(|| SkillsBlock::Text(skills.join(", ")))
        }
        other => scalar_text(other).map(SkillsBlock::Text),
    }
}

/// `programming_languages` / `programmingLanguages` → `Programming Languages`.
fn category_label(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut previous_lower = false;
    for ch in key.chars() {
        if ch == '_' || ch == '-' {
            spaced.push(' ');
            previous_lower = false;
            continue;
        }
        if ch.is_uppercase() && previous_lower {
            spaced.push(' ');
        }
        previous_lower = ch.is_lowercase() || ch.is_ascii_digit();
        spaced.push(ch);
    }
    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn experiences(value: &Value) -> Vec<Experience> {
    let Value::Array(items) = value else {
        tracing::debug!("Experience section is not a list; skipping");
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|entry| Experience {
            title: first_text(entry, TITLE_KEYS),
            dates: first_text(entry, DATE_KEYS),
            company: first_text(entry, COMPANY_KEYS),
            location: first_text(entry, &["location"]),
            responsibilities: responsibilities(entry),
        })
        .collect()
}

fn responsibilities(entry: &Map<String, Value>) -> Vec<String> {
    RESPONSIBILITY_KEYS
        .iter()
        .filter_map(|key| entry.get(*key))
        .map(|value| match value {
            Value::String(text) => text
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            other => text_list(other),
        })
        .find(|items: &Vec<String>| !items.is_empty())
        .unwrap_or_default()
}

fn projects(value: &Value) -> Vec<Project> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(Project {
                title: first_text(map, PROJECT_TITLE_KEYS),
                description: first_text(map, PROJECT_DESCRIPTION_KEYS),
            }),
            other => scalar_text(other).map(|title| Project {
                title: Some(title),
                description: None,
            }),
        })
        .filter(|project| project.title.is_some() || project.description.is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn structured(value: Value) -> StructuredResume {
        match EditResult::from_value(&value).unwrap() {
            EditResult::Structured(resume) => resume,
            other => panic!("expected structured resume, got {other:?}"),
        }
    }

    #[test]
    fn test_string_is_plain_text() {
        assert_eq!(
            EditResult::from_value(&json!("Jane Doe\nEDUCATION")).unwrap(),
            EditResult::PlainText("Jane Doe\nEDUCATION".into())
        );
    }

    #[test]
    fn test_string_array_is_joined_as_lines() {
        assert_eq!(
            EditResult::from_value(&json!(["Jane Doe", "SKILLS"])).unwrap(),
            EditResult::PlainText("Jane Doe\nSKILLS".into())
        );
    }

    #[test]
    fn test_unrecognized_shapes_are_errors() {
        assert_eq!(
            EditResult::from_value(&Value::Null),
            Err(EditShapeError::UnsupportedType("null"))
        );
        assert_eq!(
            EditResult::from_value(&json!(42)),
            Err(EditShapeError::UnsupportedType("number"))
        );
        assert_eq!(
            EditResult::from_value(&json!(["a", {"b": 1}])),
            Err(EditShapeError::MixedArray)
        );
    }

    #[test]
    fn test_aliases_resolve_in_documented_order() {
        let resume = structured(json!({
            "technicalSkills": {"languages": ["Rust"]},
            "technical_skills": {"ignored": ["Go"]},
            "workExperience": [{
                "jobTitle": "Engineer",
                "employer": "Acme",
                "dateRange": "2020 – 2022",
                "responsibilities": [],
                "achievements": ["Cut costs 30%"]
            }],
            "projects": [{"name": "tailor", "summary": "Resume tooling"}]
        }));

        assert_eq!(
            resume.skills,
            Some(SkillsBlock::Categories(vec![(
                "Languages".into(),
                vec!["Rust".into()]
            )]))
        );
        assert_eq!(
            resume.experiences,
            vec![Experience {
                title: Some("Engineer".into()),
                dates: Some("2020 – 2022".into()),
                company: Some("Acme".into()),
                location: None,
                responsibilities: vec!["Cut costs 30%".into()],
            }]
        );
        assert_eq!(resume.projects[0].title.as_deref(), Some("tailor"));
        assert_eq!(resume.projects[0].description.as_deref(), Some("Resume tooling"));
    }

    #[test]
    fn test_contact_drops_placeholder_labels() {
        let resume = structured(json!({
            "contact": {
                "phone": "555-0100",
                "email": "jane@example.com",
                "github": "GitHub",
                "linkedin": "linkedin.com/in/jane"
            }
        }));
        assert_eq!(
            resume.contact,
            vec!["555-0100", "jane@example.com", "linkedin.com/in/jane"]
        );
    }

    #[test]
    fn test_responsibilities_string_splits_on_lines() {
        let resume = structured(json!({
            "experiences": [{"title": "Dev", "duties": "Built APIs\n\n  Wrote docs  "}]
        }));
        assert_eq!(
            resume.experiences[0].responsibilities,
            vec!["Built APIs", "Wrote docs"]
        );
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(category_label("programming_languages"), "Programming Languages");
        assert_eq!(category_label("cloudPlatforms"), "Cloud Platforms");
        assert_eq!(category_label("tools"), "Tools");
    }

    #[test]
    fn test_envelope_is_lenient_about_score_and_tips() {
        let response: EditResponse = serde_json::from_value(json!({
            "optimizedResume": "text",
            "atsScore": "87%",
            "tips": ["Quantify impact", 3, null]
        }))
        .unwrap();
        assert_eq!(response.ats_score, 87);
        assert_eq!(response.tips, vec!["Quantify impact", "3"]);

        let response: EditResponse =
            serde_json::from_value(json!({"optimizedResume": "text", "atsScore": 140.2})).unwrap();
        assert_eq!(response.ats_score, 100);
        assert!(response.tips.is_empty());
    }
}
