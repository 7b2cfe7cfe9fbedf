//! HTTP adapters - JSON API and workbench pages.
//!
//! `app_router` assembles both routers behind the shared middleware stack:
//! request tracing, CORS, a request timeout and a body size limit.

pub mod transcript;
pub mod workbench;

pub use transcript::{transcript_routes, AnalysisAppState};
pub use workbench::workbench_routes;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::ServerConfig;

/// Builds the complete application router.
pub fn app_router(state: AnalysisAppState, config: &ServerConfig) -> Router {
    Router::new()
        .merge(transcript_routes(state.clone()))
        .merge(workbench_routes(state))
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(TimeoutLayer::new(config.request_timeout()))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
}

/// Permissive unless an origin list is configured.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins = config.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
