use serde::{Deserialize, Deserializer, Serialize};

/// What kind of thing a keyword names. Unknown labels from a model fall back to `Skill`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum KeywordCategory {
    #[default]
    Skill,
    Tool,
    Methodology,
    Technology,
    DomainKnowledge,
    SoftSkill,
}

impl KeywordCategory {
    pub fn parse(label: &str) -> Self {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "tool" | "tools" => Self::Tool,
            "methodology" | "methodologies" | "process" => Self::Methodology,
            "technology" | "technologies" | "framework" | "platform" => Self::Technology,
            "domainknowledge" | "domain" | "industryterm" | "industry" => Self::DomainKnowledge,
            "softskill" | "softskills" => Self::SoftSkill,
            _ => Self::Skill,
        }
    }
}

impl<'de> Deserialize<'de> for KeywordCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::parse(&label))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl<'de> Deserialize<'de> for KeywordPriority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(match label.trim().to_lowercase().as_str() {
            "high" => Self::High,
            "low" => Self::Low,
            _ => Self::Medium,
        })
    }
}

/// A missing job keyword judged actionable: the candidate can add it by
/// rewording truthful existing content.
///
/// Wire names follow the client contract (`keyword`, `suggestedIntegration`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCandidate {
    #[serde(rename = "keyword", alias = "text")]
    pub text: String,
    #[serde(default)]
    pub category: KeywordCategory,
    #[serde(default)]
    pub priority: KeywordPriority,
    #[serde(
        rename = "suggestedIntegration",
        alias = "integrationHint",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub integration_hint: Option<String>,
}

impl KeywordCandidate {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: KeywordCategory::default(),
            priority: KeywordPriority::default(),
            integration_hint: None,
        }
    }
}

/// A keyword as the optimize endpoint receives it: a bare string or a candidate object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RequestedKeyword {
    Text(String),
    Candidate(KeywordCandidate),
}

impl RequestedKeyword {
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Candidate(candidate) => &candidate.text,
        }
    }

    pub fn into_candidate(self) -> KeywordCandidate {
        match self {
            Self::Text(text) => KeywordCandidate::new(text),
            Self::Candidate(candidate) => candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_candidate_uses_client_field_names() {
        let candidate = KeywordCandidate {
            text: "Kubernetes".into(),
            category: KeywordCategory::Tool,
            priority: KeywordPriority::High,
            integration_hint: Some("Mention in deployment bullet".into()),
        };
        assert_eq!(
            serde_json::to_value(&candidate).unwrap(),
            json!({
                "keyword": "Kubernetes",
                "category": "Tool",
                "priority": "high",
                "suggestedIntegration": "Mention in deployment bullet"
            })
        );
    }

    #[test]
    fn test_model_labels_are_lenient() {
        let candidate: KeywordCandidate = serde_json::from_value(json!({
            "keyword": "Scrum",
            "category": "Methodology",
            "priority": "HIGH"
        }))
        .unwrap();
        assert_eq!(candidate.category, KeywordCategory::Methodology);
        assert_eq!(candidate.priority, KeywordPriority::High);

        assert_eq!(KeywordCategory::parse("Soft Skill"), KeywordCategory::SoftSkill);
        assert_eq!(KeywordCategory::parse("Industry Term"), KeywordCategory::DomainKnowledge);
        assert_eq!(KeywordCategory::parse("???"), KeywordCategory::Skill);
    }

    #[test]
    fn test_requested_keyword_accepts_string_or_object() {
        let keywords: Vec<RequestedKeyword> =
            serde_json::from_value(json!(["SQL", {"keyword": "Airflow", "category": "Tool"}]))
                .unwrap();
        let texts: Vec<&str> = keywords.iter().map(RequestedKeyword::text).collect();
        assert_eq!(texts, vec!["SQL", "Airflow"]);
        assert_eq!(
            keywords[1].clone().into_candidate().category,
            KeywordCategory::Tool
        );
    }
}
