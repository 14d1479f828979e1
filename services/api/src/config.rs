//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_CHAT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_CHAT_API_BASE: &str = "https://api.groq.com/openai/v1";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub data_dir: PathBuf,
    pub rules_path: Option<PathBuf>,
    pub seed_demo_data: bool,
    pub chat_api_key: Option<String>,
    pub chat_model: String,
    pub chat_api_base: String,
    pub chat_timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        // --- Server Settings ---
        let bind_address_str = match var("BIND_ADDRESS") {
            Some(address) => address,
            None => format!("0.0.0.0:{}", var("PORT").unwrap_or_else(|| "3000".to_string())),
        };
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Storage Settings ---
        let data_dir = var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./data"));
        let rules_path = var("RULES_PATH").map(PathBuf::from);

        let seed_demo_data = match var("SEED_DEMO_DATA") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ConfigError::InvalidValue(
                    "SEED_DEMO_DATA".to_string(),
                    format!("'{}' is not true or false", raw),
                )
            })?,
        };

        // --- Chat Service Settings (all optional) ---
        let chat_api_key = var("GROQ_API_KEY");
        let chat_model = var("GROQ_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let chat_api_base = var("GROQ_API_URL")
            .map(|url| api_base(&url))
            .unwrap_or_else(|| DEFAULT_CHAT_API_BASE.to_string());

        let chat_timeout = match var("CHAT_TIMEOUT_SECS") {
            None => Duration::from_secs(15),
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "CHAT_TIMEOUT_SECS".to_string(),
                        format!("'{}' is not a positive number of seconds", raw),
                    )
                })?,
        };

        Ok(Self {
            bind_address,
            log_level,
            data_dir,
            rules_path,
            seed_demo_data,
            chat_api_key,
            chat_model,
            chat_api_base,
            chat_timeout,
        })
    }

    pub fn remote_chat_configured(&self) -> bool {
        self.chat_api_key.is_some()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Accepts either the API base or the full chat-completions URL.
fn api_base(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    url.strip_suffix("/chat/completions")
        .unwrap_or(url)
        .to_string()
}
