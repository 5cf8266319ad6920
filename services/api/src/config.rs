use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

use quizgen_core::generator::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Base URL of the OpenAI-compatible generation endpoint.
    pub api_base: String,
    /// Fixed model identifier sent with every generation call.
    pub chat_model: String,
    /// Location of the local settings document (credential + user identity).
    pub settings_path: PathBuf,
    /// How long answer feedback stays on screen before auto-advancing.
    pub feedback_dwell: Duration,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Every variable has a default; only malformed values fail.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let api_base = std::env::var("GENERATION_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let chat_model =
            std::env::var("CHAT_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let settings_path = std::env::var("SETTINGS_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./settings.json"));

        let dwell_str =
            std::env::var("FEEDBACK_DWELL_MS").unwrap_or_else(|_| "1500".to_string());
        let feedback_dwell = dwell_str
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "FEEDBACK_DWELL_MS".to_string(),
                    format!("'{}' is not a duration in milliseconds", dwell_str),
                )
            })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            api_base,
            chat_model,
            settings_path,
            feedback_dwell,
            log_level,
        })
    }
}
