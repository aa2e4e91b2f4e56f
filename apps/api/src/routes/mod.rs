pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::extraction::handlers::handle_extract;
use crate::keywords::handlers::{handle_analyze, handle_filter};
use crate::reconstruction::handlers::handle_optimize;
use crate::state::AppState;

/// Headroom over `MAX_FILE_SIZE` for multipart framing and JSON bodies.
const BODY_LIMIT_HEADROOM: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_file_size + BODY_LIMIT_HEADROOM;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/resume/extract", post(handle_extract))
        .route("/api/v1/resume/analyze", post(handle_analyze))
        .route("/api/v1/resume/optimize", post(handle_optimize))
        .route("/api/v1/keywords/filter", post(handle_filter))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
