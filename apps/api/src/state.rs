use std::sync::Arc;

use crate::config::Config;
use crate::extraction::pipeline::ExtractionPipeline;
use crate::extraction::snapshot::SnapshotWriter;
use crate::keywords::filter::KeywordClassifier;
use crate::keywords::matcher::KeywordMatcher;
use crate::reconstruction::reconstructor::{ReconstructionSettings, ResumeEditor};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub extraction: ExtractionPipeline,
    pub keyword_matcher: KeywordMatcher,
    /// `None` without an API key: the filter runs rule-based only.
    pub classifier: Option<Arc<dyn KeywordClassifier>>,
    /// `None` without an API key: optimize answers `success: false`.
    pub editor: Option<Arc<dyn ResumeEditor>>,
    pub reconstruction: ReconstructionSettings,
    pub snapshots: SnapshotWriter,
}
