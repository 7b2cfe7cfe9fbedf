//! HTTP handlers for the analysis endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::application::AnalysisService;
use crate::domain::transcript::{parse_analysis, AnalysisError};

use super::dto::{AnalyzeRequest, ErrorResponse, InsightRequest};

/// Message for an `analysis` value that is not an array of sections.
pub const ANALYSIS_MALFORMED: &str = "analysis 필드 형식이 올바르지 않습니다.";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Shared state for the analysis endpoints and the workbench.
#[derive(Clone)]
pub struct AnalysisAppState {
    pub service: Arc<AnalysisService>,
}

impl AnalysisAppState {
    pub fn new(service: Arc<AnalysisService>) -> Self {
        Self { service }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /analyze - Analyze a transcript
pub async fn analyze(
    State(state): State<AnalysisAppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return handle_rejection(rejection),
    };
    let text = req.text.unwrap_or_default();

    match state.service.analyze_json(&text).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => handle_analysis_error(e, false),
    }
}

/// POST /insight - Derive insights from an analysis
pub async fn insight(
    State(state): State<AnalysisAppState>,
    body: Result<Json<InsightRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return handle_rejection(rejection),
    };

    let analysis = match req.analysis {
        Some(value) => match parse_analysis(value) {
            Some(sections) => Some(sections),
            None => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::new(ANALYSIS_MALFORMED)),
                )
                    .into_response()
            }
        },
        None => None,
    };

    match state.service.get_insight_json(analysis.as_ref()).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(e) => handle_analysis_error(e, true),
    }
}

/// GET /health - Liveness probe
pub async fn health() -> &'static str {
    "ok"
}

// ════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════

/// Unreadable bodies are 400, except oversized ones which keep their 413.
fn handle_rejection(rejection: JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "Rejected request body");
    let status = match rejection.status() {
        StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(ErrorResponse::new(rejection.body_text()))).into_response()
}

/// Maps an analysis error to a status and body. Only the insight endpoint
/// echoes the raw model output.
fn handle_analysis_error(error: AnalysisError, include_raw: bool) -> Response {
    match error {
        AnalysisError::Validation(message) => {
            (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
        }
        AnalysisError::Parse { message, raw } => {
            let body = if include_raw {
                ErrorResponse::new(message).with_raw_content(raw)
            } else {
                ErrorResponse::new(message)
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
        e @ AnalysisError::Transport(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(e.to_string())),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::AIError;

    #[test]
    fn validation_maps_to_bad_request() {
        let response = handle_analysis_error(AnalysisError::validation("text 필드가 필요합니다."), false);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_maps_to_internal_error() {
        let response = handle_analysis_error(AnalysisError::parse("파싱 오류", "prose"), true);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn transport_maps_to_internal_error() {
        let response = handle_analysis_error(
            AnalysisError::Transport(AIError::network("connection reset")),
            false,
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn health_returns_ok() {
        assert_eq!(health().await, "ok");
    }
}
