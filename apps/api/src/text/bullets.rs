//! Bullet Normalizer: rewrites heterogeneous line-initial bullet glyphs to `"• "`.
//!
//! Rules are an ordered table; the first rule whose pattern matches a line wins.
//! Each pattern captures the leading indentation and the text after the glyph run.

use std::sync::LazyLock;

use regex::Regex;

/// The single bullet glyph every recognized variant is mapped to.
pub const CANONICAL_BULLET: char = '•';

struct BulletRule {
    name: &'static str,
    pattern: Regex,
}

impl BulletRule {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            pattern: Regex::new(pattern).expect("bullet rule pattern is a valid literal regex"),
        }
    }
}

static BULLET_RULES: LazyLock<Vec<BulletRule>> = LazyLock::new(|| {
    vec![
        // Dashes, asterisks, geometric shapes, arrows, checkmarks and OCR misreads
        // of punctuation (¡ § ¢ ¤) seen when scanned bullets are recognized as text.
        BulletRule::new(
            "glyph",
            r"^(?P<indent>\s*)[\-–—*▪▫■□◆◇●○◦►▶▸‣⁃∙➢➤➔→⇒✓✔❖>¡§¢¤]+\s+(?P<rest>.*)$",
        ),
        BulletRule::new("canonical", r"^(?P<indent>\s*)•\s+(?P<rest>.*)$"),
        BulletRule::new("middle_dot", r"^(?P<indent>\s*)·\s+(?P<rest>.*)$"),
        // OCR reads hollow circles as a lowercase 'o'; only trust it before a capital.
        BulletRule::new("ocr_letter_o", r"^(?P<indent>\s*)o\s+(?P<rest>[A-Z].*)$"),
    ]
});

static BULLET_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*•\s+").expect("bullet line pattern is a valid literal regex"));

/// Normalizes every bullet-like line in `text` to start with `"• "`,
/// keeping the original indentation. Non-bullet lines pass through untouched.
pub fn normalize_bullets(text: &str) -> String {
    text.split('\n')
        .map(normalize_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_line(line: &str) -> String {
    for rule in BULLET_RULES.iter() {
        if let Some(caps) = rule.pattern.captures(line) {
            let indent = caps.name("indent").map_or("", |m| m.as_str());
            let rest = caps.name("rest").map_or("", |m| m.as_str()).trim();
            tracing::trace!(rule = rule.name, "normalized bullet line");
            return format!("{indent}{CANONICAL_BULLET} {rest}");
        }
    }
    line.to_string()
}

/// True if the line starts (after indentation) with the canonical bullet.
pub fn is_bullet_line(line: &str) -> bool {
    BULLET_LINE.is_match(line)
}

/// Counts lines that start with the canonical bullet.
pub fn count_bullets(text: &str) -> usize {
    text.lines().filter(|line| is_bullet_line(line)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_glyphs_normalize_with_indent_preserved() {
        for glyph in ["-", "*", "●", "○", "►", "▪", "➤", "✓", "–", "—", ">", "¡", "§", "¢", "·"] {
            let line = format!("  {glyph} Text");
            assert_eq!(normalize_bullets(&line), "  • Text", "glyph {glyph:?}");
        }
    }

    #[test]
    fn test_canonical_bullet_maps_to_itself() {
        assert_eq!(normalize_bullets("• Built pipelines"), "• Built pipelines");
        assert_eq!(normalize_bullets("    •   Built pipelines  "), "    • Built pipelines");
    }

    #[test]
    fn test_ocr_letter_o_requires_capital() {
        assert_eq!(normalize_bullets("o Managed a team"), "• Managed a team");
        assert_eq!(normalize_bullets("o and then"), "o and then");
    }

    #[test]
    fn test_non_bullet_lines_pass_through() {
        let text = "EXPERIENCE\nSoftware Engineer, 2020 - 2023\n-5% churn\nplain text";
        assert_eq!(normalize_bullets(text), text);
    }

    #[test]
    fn test_only_line_initial_glyph_run_is_consumed() {
        assert_eq!(
            normalize_bullets("-- Reduced costs - by a lot"),
            "• Reduced costs - by a lot"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "  - one\n\t* two\n● three\nplain\n  o Four\n· five\n",
            "",
            "•\n• \n-\n- ",
            "SKILLS\n  ► Rust, Go\n  ○ SQL",
        ];
        for sample in samples {
            let once = normalize_bullets(sample);
            assert_eq!(normalize_bullets(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn test_line_structure_is_preserved() {
        let text = "a\n\n- b\n";
        assert_eq!(normalize_bullets(text), "a\n\n• b\n");
    }

    #[test]
    fn test_count_bullets() {
        let text = "EXPERIENCE\n• One\n  • Two\n•Three\nnot • a bullet";
        assert_eq!(count_bullets(text), 2);
    }
}
