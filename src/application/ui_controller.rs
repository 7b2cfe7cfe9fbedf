//! UiController - State machine behind the analysis workbench.
//!
//! Holds the transcript input, the last analysis, the last insights and a
//! busy flag shared by both actions. Each action is split into a `begin_*`
//! step (guard and state transition) and a `complete_*` step (apply the
//! outcome), so the single suspend point in between is explicit. The `run_*`
//! helpers do both around one gateway call.
//!
//! A trigger fired while its action is disabled is a no-op; nothing queues.

use serde::Serialize;
use tracing::debug;

use crate::domain::transcript::{
    AnalysisError, AnalysisResult, InsightResult, RenderedInsight, RenderedSection,
    SectionRenderer,
};
use crate::ports::AnalysisGateway;

/// Alert shown when the analyze action fails.
pub const ANALYZE_FAILED_NOTICE: &str = "분석 중 오류 발생";

/// Alert shown when the insight action fails for reasons other than parsing.
pub const INSIGHT_FAILED_NOTICE: &str = "인사이트 생성 중 오류 발생";

/// A user-visible alert raised by an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Per-session workbench state.
#[derive(Debug, Clone, Default)]
pub struct UiController {
    input: String,
    analysis: Option<AnalysisResult>,
    insights: Option<InsightResult>,
    busy: bool,
    notices: Vec<Notice>,
    renderer: SectionRenderer,
}

impl UiController {
    /// Creates an empty controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a controller from state carried by the client between requests.
    pub fn restore(input: impl Into<String>, analysis: Option<AnalysisResult>) -> Self {
        Self {
            input: input.into(),
            analysis,
            ..Self::default()
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn insights(&self) -> Option<&InsightResult> {
        self.insights.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Replaces the input. Both results are discarded when the text changes.
    pub fn set_input(&mut self, input: impl Into<String>) {
        let input = input.into();
        if input != self.input {
            self.analysis = None;
            self.insights = None;
        }
        self.input = input;
    }

    /// Whether the analyze action may fire.
    pub fn can_analyze(&self) -> bool {
        !self.busy && !self.input.is_empty()
    }

    /// Whether the get-insight action may fire.
    pub fn can_get_insight(&self) -> bool {
        !self.busy && self.analysis.is_some()
    }

    /// Starts the analyze action.
    ///
    /// Returns the text to analyze, or `None` if the action is disabled.
    pub fn begin_analyze(&mut self) -> Option<String> {
        if !self.can_analyze() {
            debug!("Analyze ignored: action disabled");
            return None;
        }
        self.busy = true;
        self.insights = None;
        Some(self.input.clone())
    }

    /// Applies the outcome of the analyze action and clears the busy flag.
    pub fn complete_analyze(&mut self, outcome: Result<Option<AnalysisResult>, AnalysisError>) {
        self.analysis = match outcome {
            Ok(result) => result,
            Err(e) => {
                debug!(error = %e, "Analyze failed");
                self.notices.push(Notice::new(ANALYZE_FAILED_NOTICE));
                None
            }
        };
        self.busy = false;
    }

    /// Starts the get-insight action.
    ///
    /// Returns the analysis to send, or `None` if the action is disabled.
    pub fn begin_get_insight(&mut self) -> Option<AnalysisResult> {
        if !self.can_get_insight() {
            debug!("Get insight ignored: action disabled");
            return None;
        }
        self.busy = true;
        self.analysis.clone()
    }

    /// Applies the outcome of the get-insight action and clears the busy flag.
    pub fn complete_get_insight(&mut self, outcome: Result<Option<InsightResult>, AnalysisError>) {
        self.insights = match outcome {
            Ok(result) => result,
            Err(AnalysisError::Parse { message, raw }) => {
                self.notices
                    .push(Notice::new(format!("인사이트 실패: {}\n{}", message, raw)));
                None
            }
            Err(e) => {
                debug!(error = %e, "Get insight failed");
                self.notices.push(Notice::new(INSIGHT_FAILED_NOTICE));
                None
            }
        };
        self.busy = false;
    }

    /// Runs the analyze action against a gateway. Returns whether it fired.
    pub async fn run_analyze(&mut self, gateway: &dyn AnalysisGateway) -> bool {
        let Some(text) = self.begin_analyze() else {
            return false;
        };
        let outcome = gateway.analyze(&text).await;
        self.complete_analyze(outcome);
        true
    }

    /// Runs the get-insight action against a gateway. Returns whether it fired.
    pub async fn run_get_insight(&mut self, gateway: &dyn AnalysisGateway) -> bool {
        let Some(analysis) = self.begin_get_insight() else {
            return false;
        };
        let outcome = gateway.get_insight(&analysis).await;
        self.complete_get_insight(outcome);
        true
    }

    /// Drains the alerts raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// The current analysis, ready for display.
    pub fn rendered_analysis(&self) -> Option<Vec<RenderedSection>> {
        self.analysis
            .as_ref()
            .map(|sections| self.renderer.render_analysis(sections))
    }

    /// The current insights, ready for display.
    pub fn rendered_insights(&self) -> Option<Vec<RenderedInsight>> {
        self.insights.as_ref().map(|items| {
            items
                .iter()
                .enumerate()
                .map(|(index, item)| self.renderer.render_insight(index, item))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::application::AnalysisService;
    use crate::domain::transcript::{InsightItem, Presentation, Section};
    use crate::ports::AIError;
    use serde_json::json;
    use std::sync::Arc;

    fn sections() -> AnalysisResult {
        vec![Section::new("1. 전처리", json!([{"speaker": "T1", "text": "안녕"}]))]
    }

    #[test]
    fn analyze_is_disabled_for_empty_input() {
        let mut controller = UiController::new();
        assert!(!controller.can_analyze());
        assert_eq!(controller.begin_analyze(), None);
        assert!(!controller.is_busy());
    }

    #[test]
    fn begin_analyze_sets_busy_and_clears_insights() {
        let mut controller = UiController::restore("T1: 안녕", Some(sections()));
        controller.complete_get_insight(Ok(Some(vec![InsightItem::new("a", "b")])));

        assert_eq!(controller.begin_analyze(), Some("T1: 안녕".to_string()));
        assert!(controller.is_busy());
        assert!(controller.insights().is_none());
    }

    #[test]
    fn triggers_are_no_ops_while_busy() {
        let mut controller = UiController::restore("T1: 안녕", Some(sections()));
        controller.begin_analyze().unwrap();

        assert!(!controller.can_analyze());
        assert!(!controller.can_get_insight());
        assert_eq!(controller.begin_analyze(), None);
        assert_eq!(controller.begin_get_insight(), None);
    }

    #[test]
    fn complete_analyze_stores_result_and_clears_busy() {
        let mut controller = UiController::restore("T1: 안녕", None);
        controller.begin_analyze();
        controller.complete_analyze(Ok(Some(sections())));

        assert!(!controller.is_busy());
        assert_eq!(controller.analysis(), Some(&sections()));
        assert!(controller.can_get_insight());
        assert!(controller.take_notices().is_empty());
    }

    #[test]
    fn complete_analyze_with_absent_shape_stores_none_silently() {
        let mut controller = UiController::restore("T1: 안녕", Some(sections()));
        controller.begin_analyze();
        controller.complete_analyze(Ok(None));

        assert!(controller.analysis().is_none());
        assert!(controller.take_notices().is_empty());
    }

    #[test]
    fn failed_analyze_alerts_and_clears_result() {
        let mut controller = UiController::restore("T1: 안녕", Some(sections()));
        controller.begin_analyze();
        controller.complete_analyze(Err(AnalysisError::Transport(AIError::network("reset"))));

        assert!(controller.analysis().is_none());
        assert!(!controller.is_busy());
        assert_eq!(
            controller.take_notices(),
            vec![Notice::new(ANALYZE_FAILED_NOTICE)]
        );
        assert!(controller.take_notices().is_empty());
    }

    #[test]
    fn insight_parse_failure_alerts_with_raw_content() {
        let mut controller = UiController::restore("T1: 안녕", Some(sections()));
        controller.begin_get_insight().unwrap();
        controller.complete_get_insight(Err(AnalysisError::parse("파싱 오류", "not json")));

        assert!(controller.insights().is_none());
        assert_eq!(
            controller.take_notices()[0].message,
            "인사이트 실패: 파싱 오류\nnot json"
        );
    }

    #[test]
    fn insight_transport_failure_alerts_generically() {
        let mut controller = UiController::restore("T1: 안녕", Some(sections()));
        controller.begin_get_insight().unwrap();
        controller.complete_get_insight(Err(AnalysisError::Transport(
            AIError::AuthenticationFailed,
        )));

        assert_eq!(
            controller.take_notices(),
            vec![Notice::new(INSIGHT_FAILED_NOTICE)]
        );
    }

    #[test]
    fn changing_input_discards_results() {
        let mut controller = UiController::restore("T1: 안녕", Some(sections()));
        controller.set_input("T1: 안녕");
        assert!(controller.analysis().is_some());

        controller.set_input("T1: 반가워요");
        assert!(controller.analysis().is_none());
        assert!(controller.insights().is_none());
    }

    #[test]
    fn rendered_analysis_uses_section_renderer() {
        let controller = UiController::restore("x", Some(sections()));
        let rendered = controller.rendered_analysis().unwrap();

        assert_eq!(rendered[0].title, "전처리");
        assert!(matches!(rendered[0].body, Presentation::Table { .. }));
        assert!(controller.rendered_insights().is_none());
    }

    #[tokio::test]
    async fn run_actions_through_service() {
        let provider = MockAIProvider::new()
            .with_response(json!([{"title": "1. 전처리", "content": ["T1: 안녕"]}]).to_string())
            .with_response(json!([{"idea": "칭찬", "description": "구체적으로"}]).to_string());
        let service = AnalysisService::new(Arc::new(provider.clone()));

        let mut controller = UiController::new();
        controller.set_input("T1: 안녕");

        assert!(controller.run_analyze(&service).await);
        assert_eq!(controller.analysis().map(Vec::len), Some(1));

        assert!(controller.run_get_insight(&service).await);
        let insights = controller.rendered_insights().unwrap();
        assert_eq!(insights[0].title, "칭찬");
        assert_eq!(insights[0].body, "구체적으로");
        assert!(!controller.is_busy());
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn run_get_insight_without_analysis_does_not_call_gateway() {
        let provider = MockAIProvider::new().with_error(MockError::AuthenticationFailed);
        let service = AnalysisService::new(Arc::new(provider.clone()));

        let mut controller = UiController::restore("T1: 안녕", None);
        assert!(!controller.run_get_insight(&service).await);
        assert_eq!(provider.call_count(), 0);
    }
}
