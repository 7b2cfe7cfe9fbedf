//! Analysis Gateway Port - How the UI controller reaches the analysis passes.
//!
//! The in-process [`AnalysisService`](crate::application::AnalysisService)
//! implements it directly; the HTTP client adapter implements it over the
//! `/analyze` and `/insight` endpoints.

use async_trait::async_trait;

use crate::domain::transcript::{AnalysisError, AnalysisResult, InsightResult};

/// Port for running the two analysis passes.
///
/// `Ok(None)` means the model answered with valid JSON of the wrong shape; the
/// caller treats it as an absent result, not a failure.
#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Runs the transcript analysis pass.
    async fn analyze(&self, text: &str) -> Result<Option<AnalysisResult>, AnalysisError>;

    /// Runs the insight pass over a previous analysis.
    async fn get_insight(
        &self,
        analysis: &AnalysisResult,
    ) -> Result<Option<InsightResult>, AnalysisError>;
}
