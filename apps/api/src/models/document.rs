use serde::{Deserialize, Serialize};

use crate::text::bullets::count_bullets;
use crate::text::sections::detect_sections;

/// Structural section a header line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionType {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
    Certifications,
    Projects,
    Awards,
    Publications,
    Volunteer,
    Languages,
    Interests,
    References,
    Other,
}

/// A detected section header and the zero-based line it sits on.
/// The section runs until the next marker's line (or end of document).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionMarker {
    /// Header text as it appeared, trimmed, original casing.
    pub display_name: String,
    pub section_type: SectionType,
    pub line_index: usize,
}

/// Output of one extraction call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedDocument {
    pub raw_text: String,
    pub sections: Vec<SectionMarker>,
    pub bullet_count: usize,
}

impl ExtractedDocument {
    pub fn from_text(raw_text: String) -> Self {
        let sections = detect_sections(&raw_text);
        let bullet_count = count_bullets(&raw_text);
        Self {
            raw_text,
            sections,
            bullet_count,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// True when nothing usable came out of extraction.
    pub fn is_empty(&self) -> bool {
        self.raw_text.trim().is_empty()
    }
}

/// Final resume text with structure recomputed from that text alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructedResume {
    pub text: String,
    pub sections: Vec<SectionMarker>,
    pub bullet_count: usize,
}

impl ReconstructedResume {
    /// Sections and bullet count are always derived from `text`, never carried over,
    /// so drift between an edit and its source stays visible.
    pub fn from_text(text: String) -> Self {
        let sections = detect_sections(&text);
        let bullet_count = count_bullets(&text);
        Self {
            text,
            sections,
            bullet_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_type_serializes_camel_case() {
        let json = serde_json::to_string(&SectionType::Certifications).unwrap();
        assert_eq!(json, r#""certifications""#);
    }

    #[test]
    fn test_extracted_document_recomputes_structure() {
        let doc = ExtractedDocument::from_text("EDUCATION\n• BSc Physics\nSKILLS\n• Rust".into());
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.bullet_count, 2);
        assert!(!doc.is_empty());
    }

    #[test]
    fn test_empty_document_has_no_sections() {
        let doc = ExtractedDocument::empty();
        assert!(doc.is_empty());
        assert!(doc.sections.is_empty());
        assert_eq!(doc.bullet_count, 0);
    }

    #[test]
    fn test_reconstructed_resume_marker_serializes_camel_case() {
        let resume = ReconstructedResume::from_text("Jane Doe\n\nSKILLS\n• Go".into());
        let value = serde_json::to_value(&resume).unwrap();
        assert_eq!(value["bulletCount"], 1);
        assert_eq!(value["sections"][0]["lineIndex"], 2);
        assert_eq!(value["sections"][0]["sectionType"], "skills");
        assert_eq!(value["sections"][0]["displayName"], "SKILLS");
    }
}
