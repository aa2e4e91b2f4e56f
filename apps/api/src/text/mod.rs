// Text normalization and structure detection shared by extraction and reconstruction.

pub mod bullets;
pub mod cleaner;
pub mod sections;

/// Cleans encoding artifacts, then normalizes bullets. Cleaning runs first so
/// bullets it moves to line start are normalized too.
pub fn normalize_document(raw: &str) -> String {
    bullets::normalize_bullets(&cleaner::clean_artifacts(raw))
}
