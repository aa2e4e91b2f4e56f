//! Section Detector: classifies header lines into typed section markers.
//!
//! A line is a header only if, trimmed and uppercased, it equals one of the known
//! header phrases. Body text that merely contains a header word never matches.

use serde::Serialize;

use crate::models::document::{SectionMarker, SectionType};
use crate::text::bullets::{count_bullets, is_bullet_line};

/// Ordered `(section type, header phrases)` rules. First matching rule wins.
const SECTION_RULES: &[(SectionType, &[&str])] = &[
    (
        SectionType::Contact,
        &[
            "CONTACT",
            "CONTACT INFO",
            "CONTACT INFORMATION",
            "PERSONAL INFORMATION",
            "PERSONAL DETAILS",
        ],
    ),
    (
        SectionType::Summary,
        &[
            "SUMMARY",
            "PROFESSIONAL SUMMARY",
            "CAREER SUMMARY",
            "PROFILE",
            "PROFESSIONAL PROFILE",
            "OBJECTIVE",
            "CAREER OBJECTIVE",
            "ABOUT ME",
        ],
    ),
    (
        SectionType::Experience,
        &[
            "EXPERIENCE",
            "EXPERIENCES",
            "WORK EXPERIENCE",
            "PROFESSIONAL EXPERIENCE",
            "PROFESSIONAL EXPERIENCES",
            "RELEVANT EXPERIENCE",
            "EMPLOYMENT",
            "EMPLOYMENT HISTORY",
            "WORK HISTORY",
        ],
    ),
    (
        SectionType::Education,
        &[
            "EDUCATION",
            "ACADEMIC BACKGROUND",
            "EDUCATIONAL BACKGROUND",
            "ACADEMIC HISTORY",
        ],
    ),
    (
        SectionType::Skills,
        &[
            "SKILLS",
            "TECHNICAL SKILLS",
            "KEY SKILLS",
            "CORE COMPETENCIES",
            "EXPERTISE",
        ],
    ),
    (
        SectionType::Certifications,
        &[
            "CERTIFICATIONS",
            "CERTIFICATES",
            "LICENSES",
            "LICENSES & CERTIFICATIONS",
            "LICENSES AND CERTIFICATIONS",
        ],
    ),
    (
        SectionType::Projects,
        &[
            "PROJECTS",
            "KEY PROJECTS",
            "TECHNICAL PROJECTS",
            "PERSONAL PROJECTS",
            "ACADEMIC PROJECTS",
        ],
    ),
    (
        SectionType::Awards,
        &[
            "AWARDS",
            "HONORS",
            "HONORS & AWARDS",
            "HONORS AND AWARDS",
            "ACHIEVEMENTS",
        ],
    ),
    (SectionType::Publications, &["PUBLICATIONS", "RESEARCH"]),
    (
        SectionType::Volunteer,
        &[
            "VOLUNTEER",
            "VOLUNTEERING",
            "VOLUNTEER EXPERIENCE",
            "COMMUNITY SERVICE",
        ],
    ),
    (SectionType::Languages, &["LANGUAGES"]),
    (
        SectionType::Interests,
        &["INTERESTS", "HOBBIES", "HOBBIES & INTERESTS"],
    ),
    (SectionType::References, &["REFERENCES"]),
    (
        SectionType::Other,
        &[
            "LEADERSHIP",
            "ACTIVITIES",
            "EXTRACURRICULAR ACTIVITIES",
            "AFFILIATIONS",
            "PROFESSIONAL AFFILIATIONS",
            "ADDITIONAL INFORMATION",
        ],
    ),
];

/// Classifies a single line. Internal whitespace runs count as one space.
pub fn classify_header(line: &str) -> Option<SectionType> {
    let normalized = line
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    if normalized.is_empty() {
        return None;
    }
    SECTION_RULES
        .iter()
        .find(|(_, phrases)| phrases.contains(&normalized.as_str()))
        .map(|(section_type, _)| *section_type)
}

/// Scans `text` top to bottom and returns one marker per header line.
/// An empty result means the document is unstructured, not that detection failed.
pub fn detect_sections(text: &str) -> Vec<SectionMarker> {
    text.split('\n')
        .enumerate()
        .filter_map(|(line_index, line)| {
            classify_header(line).map(|section_type| SectionMarker {
                display_name: line.trim().to_string(),
                section_type,
                line_index,
            })
        })
        .collect()
}

/// Bullet count for one detected section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBulletCount {
    pub display_name: String,
    pub section_type: SectionType,
    pub bullet_count: usize,
}

/// Counts canonical bullets strictly between each marker and the next
/// (or the end of the document for the last marker).
pub fn bullets_per_section(text: &str, markers: &[SectionMarker]) -> Vec<SectionBulletCount> {
    let lines: Vec<&str> = text.split('\n').collect();
    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = section_end(markers, i, lines.len());
            let bullet_count = lines
                .get(marker.line_index + 1..end)
                .unwrap_or_default()
                .iter()
                .filter(|line| is_bullet_line(line))
                .count();
            SectionBulletCount {
                display_name: marker.display_name.clone(),
                section_type: marker.section_type,
                bullet_count,
            }
        })
        .collect()
}

/// Returns the trimmed bullet lines of the first section of `section_type`.
pub fn section_bullets(text: &str, section_type: SectionType) -> Vec<String> {
    let markers = detect_sections(text);
    let Some(position) = markers.iter().position(|m| m.section_type == section_type) else {
        return Vec::new();
    };

    let lines: Vec<&str> = text.split('\n').collect();
    let start = markers[position].line_index + 1;
    let end = section_end(&markers, position, lines.len());

    lines
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .filter(|line| is_bullet_line(line))
        .map(|line| line.trim().to_string())
        .collect()
}

fn section_end(markers: &[SectionMarker], index: usize, line_count: usize) -> usize {
    markers
        .get(index + 1)
        .map_or(line_count, |next| next.line_index)
}

/// Side-by-side structure of an original resume and its rewrite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureComparison {
    pub sections_preserved: bool,
    pub original_sections: Vec<SectionType>,
    pub optimized_sections: Vec<SectionType>,
    pub bullet_count_original: usize,
    pub bullet_count_optimized: usize,
}

pub fn compare_structure(original: &str, optimized: &str) -> StructureComparison {
    let original_sections: Vec<SectionType> = detect_sections(original)
        .into_iter()
        .map(|m| m.section_type)
        .collect();
    let optimized_sections: Vec<SectionType> = detect_sections(optimized)
        .into_iter()
        .map(|m| m.section_type)
        .collect();

    StructureComparison {
        sections_preserved: original_sections.len() == optimized_sections.len(),
        original_sections,
        optimized_sections,
        bullet_count_original: count_bullets(original),
        bullet_count_optimized: count_bullets(optimized),
    }
}
