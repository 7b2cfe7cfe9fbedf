//! HTTP routes for the workbench pages.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::transcript::AnalysisAppState;

use super::handlers::{index, run_analyze, run_insight};

/// Creates the workbench router.
///
/// # Routes
///
/// - `GET /` - Empty workbench
/// - `POST /workbench/analyze` - Analyze the submitted text and re-render
/// - `POST /workbench/insight` - Derive insights from the carried analysis
pub fn workbench_routes(state: AnalysisAppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/workbench/analyze", post(run_analyze))
        .route("/workbench/insight", post(run_insight))
        .with_state(state)
}
