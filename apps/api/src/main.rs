mod config;
mod errors;
mod extraction;
mod keywords;
mod llm_client;
mod models;
mod reconstruction;
mod routes;
mod state;
mod text;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::ocr::TesseractOcr;
use crate::extraction::pdf::PdfTextExtractor;
use crate::extraction::pipeline::{ExtractionPipeline, ExtractionSettings};
use crate::extraction::snapshot::SnapshotWriter;
use crate::keywords::filter::{KeywordClassifier, LlmKeywordClassifier};
use crate::keywords::matcher::KeywordMatcher;
use crate::llm_client::LlmClient;
use crate::reconstruction::reconstructor::{
    LlmResumeEditor, ReconstructionSettings, ResumeEditor,
};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Tailor API v{}", env!("CARGO_PKG_VERSION"));

    // LLM-backed capabilities exist only when a key is configured
    let (classifier, editor): (
        Option<Arc<dyn KeywordClassifier>>,
        Option<Arc<dyn ResumeEditor>>,
    ) = match config.anthropic_api_key.clone() {
        Some(api_key) => {
            let llm = LlmClient::new(api_key, config.llm_max_attempts)
                .context("Failed to build LLM HTTP client")?;
            info!(
                "LLM client initialized (model: {}, attempts: {})",
                llm_client::MODEL,
                config.llm_max_attempts
            );
            let classifier: Arc<dyn KeywordClassifier> =
                Arc::new(LlmKeywordClassifier::new(llm.clone()));
            let editor: Arc<dyn ResumeEditor> = Arc::new(LlmResumeEditor::new(llm));
            (Some(classifier), Some(editor))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set: keyword filtering is rule-based and optimize is disabled");
            (None, None)
        }
    };

    let extraction = ExtractionPipeline::new(
        Arc::new(PdfTextExtractor),
        Arc::new(TesseractOcr::default()),
        ExtractionSettings::from_config(&config),
    );
    info!(
        "Extraction: OCR fallback below {} chars, {} dpi, {} pages max",
        config.min_extracted_chars, config.ocr_dpi, config.ocr_max_pages
    );

    let snapshots = SnapshotWriter::new(config.snapshot_dir.clone());
    if snapshots.is_enabled() {
        info!("Writing text snapshots to {:?}", config.snapshot_dir);
    }

    // Build app state
    let state = AppState {
        extraction,
        keyword_matcher: KeywordMatcher::from_config(&config),
        classifier,
        editor,
        reconstruction: ReconstructionSettings::from_config(&config),
        snapshots,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
