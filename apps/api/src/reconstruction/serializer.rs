//! Canonical plain-text layout for a structured resume.
//!
//! Section order is fixed and independent of the source document:
//! name, contact, EDUCATION, TECHNICAL SKILLS, PROFESSIONAL EXPERIENCES,
//! TECHNICAL PROJECTS, LEADERSHIP, CERTIFICATIONS. Empty sections are omitted.
//! Every header is preceded by a blank line.

use crate::reconstruction::edit_result::{
    Education, EducationBlock, Experience, Project, SkillsBlock, StructuredResume,
};
use crate::text::bullets::CANONICAL_BULLET;

pub const EDUCATION_HEADER: &str = "EDUCATION";
pub const SKILLS_HEADER: &str = "TECHNICAL SKILLS";
pub const EXPERIENCE_HEADER: &str = "PROFESSIONAL EXPERIENCES";
pub const PROJECTS_HEADER: &str = "TECHNICAL PROJECTS";
pub const LEADERSHIP_HEADER: &str = "LEADERSHIP";
pub const CERTIFICATIONS_HEADER: &str = "CERTIFICATIONS";

#[derive(Default)]
struct Layout {
    lines: Vec<String>,
}

impl Layout {
    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    fn bullet(&mut self, text: &str) {
        self.lines.push(format!("{CANONICAL_BULLET} {text}"));
    }

    /// Emits a blank line and `header`, then `body`, but only if `body` adds lines.
    fn section(&mut self, header: &str, body: impl FnOnce(&mut Layout)) {
        let mut inner = Layout::default();
        body(&mut inner);
        if inner.lines.is_empty() {
            return;
        }
        self.lines.push(String::new());
        self.lines.push(header.to_string());
        self.lines.extend(inner.lines);
    }

    fn finish(self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

pub fn serialize_structured(resume: &StructuredResume) -> String {
    let mut layout = Layout::default();

    if let Some(name) = &resume.name {
        layout.line(name.as_str());
    }
    if !resume.contact.is_empty() {
        layout.line(resume.contact.join(" | "));
    }

    layout.section(EDUCATION_HEADER, |out| {
        for block in &resume.education {
            match block {
                EducationBlock::Detailed(education) => write_education(out, education),
                EducationBlock::Text(text) => out.line(text.as_str()),
            }
        }
    });

    layout.section(SKILLS_HEADER, |out| match &resume.skills {
        Some(SkillsBlock::Categories(categories)) => {
            for (category, skills) in categories {
                out.line(format!("{category}: {}", skills.join(", ")));
            }
        }
        Some(SkillsBlock::Text(text)) => out.line(text.as_str()),
        None => {}
    });

    layout.section(EXPERIENCE_HEADER, |out| {
        for experience in &resume.experiences {
            write_experience(out, experience);
        }
    });

    layout.section(PROJECTS_HEADER, |out| {
        for project in &resume.projects {
            write_project(out, project);
        }
    });

    layout.section(LEADERSHIP_HEADER, |out| {
        for item in &resume.leadership {
            out.bullet(item);
        }
    });

    layout.section(CERTIFICATIONS_HEADER, |out| {
        for cert in &resume.certifications {
            out.bullet(cert);
        }
    });

    layout.finish()
}

fn write_education(out: &mut Layout, education: &Education) {
    let mut institution_line: Vec<String> = [&education.institution, &education.location]
        .into_iter()
        .flatten()
        .cloned()
        .collect();
    if let Some(expected) = &education.expected_graduation {
        institution_line.push(format!("Expected: {expected}"));
    }
    if !institution_line.is_empty() {
        out.line(institution_line.join(", "));
    }
    if let Some(degree) = &education.degree {
        out.line(degree.as_str());
    }
    if let Some(gpa) = &education.gpa {
        out.line(format!("GPA: {gpa}"));
    }
    for honor in &education.honors {
        out.bullet(honor);
    }
    if !education.courses.is_empty() {
        out.bullet(&format!("Relevant Courses: {}", education.courses.join(", ")));
    }
}

/// Title line with trailing date range, company line with location, then bullets.
fn write_experience(out: &mut Layout, experience: &Experience) {
    let title_line: Vec<&str> = [&experience.title, &experience.dates]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    if !title_line.is_empty() {
        out.line(title_line.join(", "));
    }
    if let Some(company) = &experience.company {
        match &experience.location {
            Some(location) => out.line(format!("{company}, {location}")),
            None => out.line(company.as_str()),
        }
    }
    for responsibility in &experience.responsibilities {
        out.bullet(responsibility);
    }
}

fn write_project(out: &mut Layout, project: &Project) {
    if let Some(title) = &project.title {
        out.bullet(title);
    }
    if let Some(description) = &project.description {
        out.line(format!("  {description}"));
    }
}
