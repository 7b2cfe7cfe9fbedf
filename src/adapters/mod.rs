//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `ai` - AI providers (OpenAI, mock)
//! - `http` - JSON API and server-rendered workbench (axum)
//! - `remote` - Analysis gateway over HTTP (reqwest)

pub mod ai;
pub mod http;
pub mod remote;

pub use ai::{MockAIProvider, OpenAIConfig, OpenAIProvider};
pub use http::{app_router, AnalysisAppState};
pub use remote::HttpAnalysisClient;
