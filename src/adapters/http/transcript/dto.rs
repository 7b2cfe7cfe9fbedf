//! HTTP DTOs for the analysis endpoints.
//!
//! Success bodies are the bare result arrays (or `null` for an absent
//! result); only failures use an object envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to analyze a transcript.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// Request to derive insights from an analysis.
///
/// `analysis` is kept as raw JSON so a missing value and a malformed one can be
/// told apart.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InsightRequest {
    #[serde(default)]
    pub analysis: Option<Value>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Error body: `{ "error": ... }`, plus `rawContent` for insight parse failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(
        rename = "rawContent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub raw_content: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            raw_content: None,
        }
    }

    pub fn with_raw_content(mut self, raw: impl Into<String>) -> Self {
        self.raw_content = Some(raw.into());
        self
    }
}
