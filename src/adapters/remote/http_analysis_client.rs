//! HttpAnalysisClient - AnalysisGateway over the JSON analysis API.
//!
//! Lets a `UiController` run against a remote server instead of an in-process
//! `AnalysisService`. Success bodies must be the bare result array; anything
//! else that still decodes as JSON is treated as an absent result.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::transcript::{
    parse_analysis, parse_insights, AnalysisError, AnalysisResult, InsightResult,
};
use crate::ports::{AIError, AnalysisGateway};

/// Client for `POST /analyze` and `POST /insight`.
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    base_url: String,
    timeout: Duration,
    client: Client,
}

#[derive(Serialize)]
struct AnalyzeBody<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct InsightBody<'a> {
    analysis: &'a AnalysisResult,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "rawContent", default)]
    raw_content: Option<String>,
}

impl HttpAnalysisClient {
    /// Creates a client for the server rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`AIError::InvalidRequest`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            timeout,
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, AnalysisError> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.timeout.as_secs() as u32,
                    }
                } else {
                    AIError::network(e.to_string())
                }
            })?;

        Self::read_body(response).await
    }

    async fn read_body(response: Response) -> Result<Value, AnalysisError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AIError::network(format!("Failed to read response: {}", e)))?;

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| {
                AnalysisError::Transport(AIError::parse(format!("Malformed response body: {}", e)))
            });
        }

        Err(Self::classify_failure(status, &text))
    }

    /// Maps a non-success status and body to an error.
    fn classify_failure(status: StatusCode, body: &str) -> AnalysisError {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        debug!(status = status.as_u16(), "Analysis request failed");

        match (status, parsed) {
            (StatusCode::BAD_REQUEST, Some(err)) => AnalysisError::Validation(err.error),
            (_, Some(ErrorBody {
                error,
                raw_content: Some(raw),
            })) => AnalysisError::parse(error, raw),
            (s, Some(err)) if s.is_server_error() => {
                AnalysisError::Transport(AIError::unavailable(err.error))
            }
            (s, _) => AnalysisError::Transport(AIError::unavailable(format!(
                "Unexpected status {}: {}",
                s.as_u16(),
                body
            ))),
        }
    }
}

#[async_trait]
impl AnalysisGateway for HttpAnalysisClient {
    async fn analyze(&self, text: &str) -> Result<Option<AnalysisResult>, AnalysisError> {
        let value = self.post("/analyze", &AnalyzeBody { text }).await?;
        let result = parse_analysis(value);
        if result.is_none() {
            warn!("Analyze response is not an array of sections");
        }
        Ok(result)
    }

    async fn get_insight(
        &self,
        analysis: &AnalysisResult,
    ) -> Result<Option<InsightResult>, AnalysisError> {
        let value = self.post("/insight", &InsightBody { analysis }).await?;
        let result = parse_insights(value);
        if result.is_none() {
            warn!("Insight response is not an array of insight items");
        }
        Ok(result)
    }
}
