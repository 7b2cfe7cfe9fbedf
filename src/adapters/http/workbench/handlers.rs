//! HTTP handlers for the workbench pages.
//!
//! Each request rebuilds a `UiController` from the submitted form, runs at
//! most one action against the in-process service and renders the page.

use axum::{extract::State, response::Html, Form};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::adapters::http::transcript::AnalysisAppState;
use crate::application::UiController;
use crate::domain::transcript::{parse_analysis, AnalysisResult};

use super::page::{render_page, WorkbenchAction};

/// Form posted by the analyze button.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub text: String,
}

/// Form posted by the insight button.
///
/// `analyzed_text` is the input the carried `analysis` was produced from.
#[derive(Debug, Default, Deserialize)]
pub struct InsightForm {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub analyzed_text: Option<String>,
    #[serde(default)]
    pub analysis: Option<String>,
}

/// GET / - Empty workbench
pub async fn index() -> Html<String> {
    Html(render_page(&UiController::new(), &[], None))
}

/// POST /workbench/analyze - Run the analyze action
pub async fn run_analyze(
    State(state): State<AnalysisAppState>,
    Form(form): Form<AnalyzeForm>,
) -> Html<String> {
    let mut controller = UiController::new();
    controller.set_input(form.text);

    let ran = controller
        .run_analyze(&*state.service)
        .await
        .then_some(WorkbenchAction::Analyze);
    let notices = controller.take_notices();

    Html(render_page(&controller, &notices, ran))
}

/// POST /workbench/insight - Run the get-insight action
pub async fn run_insight(
    State(state): State<AnalysisAppState>,
    Form(form): Form<InsightForm>,
) -> Html<String> {
    let analysis = form.analysis.as_deref().and_then(carried_analysis);
    let analyzed_text = form.analyzed_text.unwrap_or_else(|| form.text.clone());

    let mut controller = UiController::restore(analyzed_text, analysis);
    controller.set_input(form.text);

    let ran = controller
        .run_get_insight(&*state.service)
        .await
        .then_some(WorkbenchAction::Insight);
    let notices = controller.take_notices();

    Html(render_page(&controller, &notices, ran))
}

/// Decodes the analysis carried in the hidden form field.
fn carried_analysis(raw: &str) -> Option<AnalysisResult> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => parse_analysis(value),
        Err(e) => {
            debug!(error = %e, "Discarding malformed carried analysis");
            None
        }
    }
}
