use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub const BASE_RESUME_SNAPSHOT: &str = "baseResume.txt";
pub const OPTIMIZED_RESUME_SNAPSHOT: &str = "optimizedResume.txt";

/// Writes plain-text debug snapshots of extracted and optimized resumes.
///
/// Disabled when no directory is configured. Writes go to a temp file in the target
/// directory and are renamed into place, so readers never observe a partial file.
/// Failures are logged and swallowed.
#[derive(Debug, Clone, Default)]
pub struct SnapshotWriter {
    dir: Option<PathBuf>,
}

impl SnapshotWriter {
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    pub async fn write(&self, name: &'static str, text: &str) {
        let Some(dir) = self.dir.clone() else {
            return;
        };
        let text = text.to_string();

        let result = tokio::task::spawn_blocking(move || persist_atomically(&dir, name, &text)).await;
        match result {
            Ok(Ok(path)) => debug!(?path, "Wrote snapshot"),
            Ok(Err(e)) => warn!("Failed to write snapshot {name}: {e}"),
            Err(e) => warn!("Snapshot worker failed for {name}: {e}"),
        }
    }
}

fn persist_atomically(dir: &Path, name: &str, text: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    let target = dir.join(name);
    file.persist(&target).map_err(|e| e.error)?;
    Ok(target)
}
