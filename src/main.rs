//! Classroom Lens server binary.

use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use classroom_lens::adapters::{app_router, AnalysisAppState, OpenAIProvider};
use classroom_lens::application::AnalysisService;
use classroom_lens::config::{AppConfig, ConfigError, ServerConfig, ValidationError};
use classroom_lens::ports::AIError;

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to create AI provider: {0}")]
    Provider(#[from] AIError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = AppConfig::load();

    let log_level = match &config {
        Ok(config) => config.server.log_level.clone(),
        Err(_) => ServerConfig::default().log_level,
    };
    init_tracing(&log_level);

    let result = match config {
        Ok(config) => run(config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server failed to start");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(fallback: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    config.validate()?;

    let openai = config
        .ai
        .openai()
        .ok_or(ValidationError::MissingRequired("OPENAI_API_KEY"))?;
    let provider = OpenAIProvider::new(openai)?;
    let service = AnalysisService::new(Arc::new(provider));

    let app = app_router(AnalysisAppState::new(Arc::new(service)), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, model = %config.ai.model, "Classroom Lens listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
