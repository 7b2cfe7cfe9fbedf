//! AnalysisService - Runs the analyze and insight passes.
//!
//! Both passes follow the same protocol:
//! 1. Validate input
//! 2. Build the prompt
//! 3. Issue exactly one completion request
//! 4. Sanitize and parse the model output
//! 5. Check the top-level shape
//!
//! Nothing is retried or cached. A response that parses but has the wrong
//! shape is an absent result, not an error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::domain::transcript::{
    build_analysis_prompt, build_insight_prompt, parse_analysis, parse_insights, AnalysisError,
    AnalysisResult, InsightResult, ResponseSanitizer, ANALYSIS_TEMPERATURE, INSIGHT_TEMPERATURE,
};
use crate::ports::{AIProvider, AnalysisGateway, CompletionRequest, Operation};

/// Message for a missing or empty transcript.
pub const TEXT_REQUIRED: &str = "text 필드가 필요합니다.";

/// Message for a missing analysis.
pub const ANALYSIS_REQUIRED: &str = "analysis 필드가 필요합니다.";

/// Message when the analysis pass output is not JSON.
pub const ANALYZE_PARSE_FAILED: &str = "AI 응답 파싱 오류";

/// Message when the insight pass output is not JSON.
pub const INSIGHT_PARSE_FAILED: &str = "파싱 오류";

/// Orchestrates prompt building, the provider call and response parsing.
pub struct AnalysisService {
    provider: Arc<dyn AIProvider>,
    sanitizer: ResponseSanitizer,
}

impl AnalysisService {
    /// Creates a new service over the given provider.
    pub fn new(provider: Arc<dyn AIProvider>) -> Self {
        Self {
            provider,
            sanitizer: ResponseSanitizer::new(),
        }
    }

    /// Analyzes a classroom dialogue transcript.
    ///
    /// # Errors
    ///
    /// - `Validation` if `text` is empty or whitespace only
    /// - `Transport` if the provider call fails
    /// - `Parse` if the model output is not valid JSON
    pub async fn analyze(&self, text: &str) -> Result<Option<AnalysisResult>, AnalysisError> {
        Ok(self.analyze_json(text).await?.and_then(parse_analysis))
    }

    /// Same as [`analyze`](Self::analyze), but returns the accepted model
    /// output untouched instead of the typed sections.
    pub async fn analyze_json(&self, text: &str) -> Result<Option<Value>, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::validation(TEXT_REQUIRED));
        }

        let request = CompletionRequest::new(
            Operation::Analyze,
            build_analysis_prompt(text),
            ANALYSIS_TEMPERATURE,
        );

        let value = self.complete_json(request, ANALYZE_PARSE_FAILED).await?;
        if parse_analysis(value.clone()).is_none() {
            warn!("Analysis output is not an array of sections");
            return Ok(None);
        }

        info!(sections = array_len(&value), "Analysis completed");
        Ok(Some(value))
    }

    /// Turns a previous analysis into insights.
    ///
    /// # Errors
    ///
    /// - `Validation` if `analysis` is absent
    /// - `Transport` if the provider call fails
    /// - `Parse` carrying the raw model output if it is not valid JSON
    pub async fn get_insight(
        &self,
        analysis: Option<&AnalysisResult>,
    ) -> Result<Option<InsightResult>, AnalysisError> {
        Ok(self.get_insight_json(analysis).await?.and_then(parse_insights))
    }

    /// Same as [`get_insight`](Self::get_insight), but returns the accepted
    /// model output untouched.
    pub async fn get_insight_json(
        &self,
        analysis: Option<&AnalysisResult>,
    ) -> Result<Option<Value>, AnalysisError> {
        let analysis = analysis.ok_or_else(|| AnalysisError::validation(ANALYSIS_REQUIRED))?;

        let request = CompletionRequest::new(
            Operation::Insight,
            build_insight_prompt(analysis),
            INSIGHT_TEMPERATURE,
        );

        let value = self.complete_json(request, INSIGHT_PARSE_FAILED).await?;
        if parse_insights(value.clone()).is_none() {
            warn!("Insight output is not an array of insight items");
            return Ok(None);
        }

        info!(insights = array_len(&value), "Insight completed");
        Ok(Some(value))
    }

    /// Issues the completion request and sanitizes its output.
    async fn complete_json(
        &self,
        request: CompletionRequest,
        parse_message: &str,
    ) -> Result<Value, AnalysisError> {
        let trace_id = request.metadata.trace_id.clone();
        let operation = request.metadata.operation;

        let response = self.provider.complete(request).await.map_err(|e| {
            error!(trace_id = %trace_id, operation = %operation, error = %e, "Completion failed");
            AnalysisError::Transport(e)
        })?;

        debug!(
            trace_id = %trace_id,
            operation = %operation,
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Completion received"
        );

        self.sanitizer.sanitize(&response.content).map_err(|e| {
            error!(
                trace_id = %trace_id,
                operation = %operation,
                error = %e,
                raw = %e.raw(),
                "Model output failed to parse"
            );
            AnalysisError::parse(parse_message, e.raw())
        })
    }
}

fn array_len(value: &Value) -> usize {
    value.as_array().map_or(0, Vec::len)
}

#[async_trait]
impl AnalysisGateway for AnalysisService {
    async fn analyze(&self, text: &str) -> Result<Option<AnalysisResult>, AnalysisError> {
        AnalysisService::analyze(self, text).await
    }

    async fn get_insight(
        &self,
        analysis: &AnalysisResult,
    ) -> Result<Option<InsightResult>, AnalysisError> {
        AnalysisService::get_insight(self, Some(analysis)).await
    }
}
