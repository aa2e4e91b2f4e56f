//! Artifact Cleaner: strips encoding corruption and restores structural line breaks
//! lost during extraction or flattened by a model rewrite.
//!
//! Passes run in a fixed order:
//! 1. strip corrupt glyphs (alone or glued to a `%`, either order)
//! 2. repair mis-decoded UTF-8 punctuation
//! 3. collapse horizontal whitespace, trim line edges, collapse blank-line runs
//! 4. re-glue multi-word headers split by whitespace
//! 5. move known headers that follow other content onto their own line
//! 6. move in-line bullet glyphs onto their own line
//!
//! Output is trimmed. A second pass over cleaned text changes nothing.

use std::sync::LazyLock;

use regex::Regex;

/// Glyphs produced when a bullet font is decoded through the wrong code page.
const CORRUPT_GLYPHS: &str = "ÏïĪīÎîØø";

/// Mis-decoded multi-byte sequences and their intended characters.
/// Longer sequences come first: `â€` alone is a prefix of all the others.
const MOJIBAKE: &[(&str, &str)] = &[
    ("â€¢", "•"),
    ("â€”", "—"),
    ("â€“", "–"),
    ("â€\"", "–"),
    ("â€™", "'"),
    ("â€˜", "'"),
    ("â€œ", "\""),
    ("â€\u{9d}", "\""),
    ("â€", "\""),
];

/// Multi-word headers that extraction sometimes splits across whitespace or lines.
const SPLIT_HEADERS: &[(&str, &str)] = &[
    ("PROFESSIONAL", "EXPERIENCES"),
    ("TECHNICAL", "PROJECTS"),
    ("TECHNICAL", "SKILLS"),
];

/// Headers that must always start a fresh line. Longest first so that
/// `TECHNICAL PROJECTS` wins over the `PROJECTS` inside it.
const ISOLATED_HEADERS: &[&str] = &[
    "PROFESSIONAL EXPERIENCES",
    "TECHNICAL PROJECTS",
    "TECHNICAL SKILLS",
    "CERTIFICATIONS",
    "LEADERSHIP",
    "EDUCATION",
    "PROJECTS",
];

/// Bullet glyphs that get their own line when found mid-line.
const INLINE_BULLETS: &[char] = &['•', '●'];

static CORRUPT_GLYPH_RUN: LazyLock<Regex> = LazyLock::new(|| {
    let set = format!("[{CORRUPT_GLYPHS}]");
    Regex::new(&format!(r"%[ \t]*{set}|{set}[ \t]*%|{set}"))
        .expect("corrupt glyph pattern is a valid regex")
});

static HORIZONTAL_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+").expect("valid literal regex"));

static LINE_EDGE_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" *\n *").expect("valid literal regex"));

static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid literal regex"));

static SPLIT_HEADER_PATTERNS: LazyLock<Vec<(Regex, String)>> = LazyLock::new(|| {
    SPLIT_HEADERS
        .iter()
        .map(|(first, second)| {
            let pattern = Regex::new(&format!(r"\b{first}\s+{second}\b"))
                .expect("split header pattern is a valid regex");
            (pattern, format!("{first} {second}"))
        })
        .collect()
});

static INLINE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = ISOLATED_HEADERS.join("|");
    Regex::new(&format!(r"\b(?:{alternatives})\b")).expect("header pattern is a valid regex")
});

/// Runs every cleaning pass over `text` and returns the trimmed result.
pub fn clean_artifacts(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let original_len = text.chars().count();

    let text = strip_corrupt_glyphs(text);
    let text = repair_mojibake(&text);
    let text = collapse_whitespace(&text);
    let text = reglue_split_headers(&text);
    let text = isolate_headers(&text);
    let text = isolate_inline_bullets(&text);
    let cleaned = text.trim().to_string();

    tracing::debug!(
        original_len,
        cleaned_len = cleaned.chars().count(),
        "cleaned encoding artifacts"
    );
    cleaned
}

fn strip_corrupt_glyphs(text: &str) -> String {
    CORRUPT_GLYPH_RUN.replace_all(text, "").into_owned()
}

fn repair_mojibake(text: &str) -> String {
    MOJIBAKE
        .iter()
        .fold(text.to_string(), |acc, (bad, good)| acc.replace(bad, good))
}

fn collapse_whitespace(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = HORIZONTAL_WS.replace_all(&text, " ");
    let text = LINE_EDGE_WS.replace_all(&text, "\n");
    BLANK_LINE_RUN.replace_all(&text, "\n\n").into_owned()
}

fn reglue_split_headers(text: &str) -> String {
    SPLIT_HEADER_PATTERNS
        .iter()
        .fold(text.to_string(), |acc, (pattern, joined)| {
            pattern.replace_all(&acc, joined.as_str()).into_owned()
        })
}

/// Puts a blank line before every known header that trails other content on its line.
fn isolate_headers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let mut cursor = 0;
        for found in INLINE_HEADER.find_iter(line) {
            if line[..found.start()].trim().is_empty() {
                continue;
            }
            out.push_str(line[cursor..found.start()].trim_end());
            out.push_str("\n\n");
            cursor = found.start();
        }
        out.push_str(&line[cursor..]);
    }
    out
}

/// Starts a new line before any bullet glyph that has content ahead of it on its line.
fn isolate_inline_bullets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut line_has_content = false;
    for ch in text.chars() {
        if INLINE_BULLETS.contains(&ch) && line_has_content {
            let trimmed_len = out.trim_end_matches([' ', '\t']).len();
            out.truncate(trimmed_len);
            out.push('\n');
            line_has_content = false;
        }
        match ch {
            '\n' => line_has_content = false,
            c if !c.is_whitespace() => line_has_content = true,
            _ => {}
        }
        out.push(ch);
    }
    out
}
