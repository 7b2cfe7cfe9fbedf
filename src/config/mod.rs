//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CLASSROOM_LENS` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use classroom_lens::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr().unwrap());
//! ```

mod ai;
mod error;
mod server;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;

use serde::Deserialize;
use std::env;

const ENV_PREFIX: &str = "CLASSROOM_LENS";

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, limits)
    #[serde(default)]
    pub server: ServerConfig,

    /// AI provider configuration (OpenAI)
    #[serde(default)]
    pub ai: AiConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Seeds defaults from the unprefixed `OPENAI_API_KEY` and `PORT`
    /// 3. Reads environment variables with the `CLASSROOM_LENS` prefix, which win
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CLASSROOM_LENS__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CLASSROOM_LENS__AI__OPENAI_API_KEY=...` -> `ai.openai_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    fn from_env() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Ok(key) = env::var("OPENAI_API_KEY") {
            builder = builder.set_default("ai.openai_api_key", key)?;
        }
        if let Ok(port) = env::var("PORT") {
            builder = builder.set_default("server.port", port)?;
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix(ENV_PREFIX)
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "CLASSROOM_LENS__AI__OPENAI_API_KEY",
        "CLASSROOM_LENS__AI__MODEL",
        "CLASSROOM_LENS__SERVER__PORT",
        "CLASSROOM_LENS__SERVER__CORS_ORIGINS",
        "OPENAI_API_KEY",
        "PORT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn api_key(config: &AppConfig) -> Option<String> {
        config
            .ai
            .openai_api_key
            .as_ref()
            .map(|k| k.expose_secret().clone())
    }

    #[test]
    fn test_load_from_prefixed_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CLASSROOM_LENS__AI__OPENAI_API_KEY", "sk-prefixed");
        env::set_var("CLASSROOM_LENS__AI__MODEL", "gpt-4o-mini");
        let result = AppConfig::from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(api_key(&config).as_deref(), Some("sk-prefixed"));
        assert_eq!(config.ai.model, "gpt-4o-mini");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::from_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.ai.openai_api_key.is_none());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("OPENAI_API_KEY"))
        );
    }

    #[test]
    fn test_unprefixed_fallbacks() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("OPENAI_API_KEY", "sk-plain");
        env::set_var("PORT", "3000");
        let result = AppConfig::from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(api_key(&config).as_deref(), Some("sk-plain"));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_prefixed_values_win_over_fallbacks() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("OPENAI_API_KEY", "sk-plain");
        env::set_var("PORT", "3000");
        env::set_var("CLASSROOM_LENS__AI__OPENAI_API_KEY", "sk-prefixed");
        env::set_var("CLASSROOM_LENS__SERVER__PORT", "8081");
        let result = AppConfig::from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(api_key(&config).as_deref(), Some("sk-prefixed"));
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn test_cors_origins_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var(
            "CLASSROOM_LENS__SERVER__CORS_ORIGINS",
            "http://localhost:3000",
        );
        let result = AppConfig::from_env();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.cors_origins_list(), vec!["http://localhost:3000"]);
    }
}
