//! Application layer - Orchestration between the domain and ports.
//!
//! - `AnalysisService` - Runs the analyze and insight passes against an AI provider
//! - `UiController` - Workbench state machine driving an `AnalysisGateway`

mod analysis_service;
mod ui_controller;

pub use analysis_service::{
    AnalysisService, ANALYSIS_REQUIRED, ANALYZE_PARSE_FAILED, INSIGHT_PARSE_FAILED, TEXT_REQUIRED,
};
pub use ui_controller::{Notice, UiController, ANALYZE_FAILED_NOTICE, INSIGHT_FAILED_NOTICE};
