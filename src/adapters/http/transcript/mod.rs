//! HTTP adapter for the transcript analysis API.

mod dto;
mod handlers;
mod routes;

pub use dto::{AnalyzeRequest, ErrorResponse, InsightRequest};
pub use handlers::{AnalysisAppState, ANALYSIS_MALFORMED};
pub use routes::transcript_routes;
