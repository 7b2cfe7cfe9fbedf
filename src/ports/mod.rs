//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - LLM text completion
//! - `AnalysisGateway` - The analyze/insight passes as seen by the UI controller

mod ai_provider;
mod analysis_gateway;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Operation,
    ProviderInfo, RequestMetadata, TokenUsage,
};
pub use analysis_gateway::AnalysisGateway;
