//! HTTP routes for the analysis endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{analyze, health, insight, AnalysisAppState};

/// Creates the analysis API router.
///
/// # Routes
///
/// - `POST /analyze` - Analyze a transcript into sections
/// - `POST /insight` - Derive insights from sections
/// - `GET /health` - Liveness probe
pub fn transcript_routes(state: AnalysisAppState) -> Router {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/insight", post(insight))
        .route("/health", get(health))
        .with_state(state)
}
