//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use tracing::Level;

const GEMINI_OPENAI_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which OpenAI-compatible endpoint serves note generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmSettings {
    pub api_key: String,
    /// `None` uses the OpenAI default.
    pub api_base: Option<String>,
    pub note_model: String,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// Without a database URL the service keeps history in memory.
    pub database_url: Option<String>,
    pub log_level: Level,
    pub cors_origin: String,
    pub llm: LlmSettings,
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
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, so loading can be tested
    /// without touching the process environment.
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // --- Load Server and Database Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let database_url = var("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin =
            var("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:3000".to_string());

        // --- Load the Model Provider ---
        // An OpenAI key wins; a Gemini key alone routes through Gemini's
        // OpenAI-compatible endpoint.
        let llm = match (var("OPENAI_API_KEY"), var("GEMINI_API_KEY")) {
            (Some(api_key), _) => LlmSettings {
                api_key,
                api_base: var("LLM_API_BASE"),
                note_model: var("NOTE_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            },
            (None, Some(api_key)) => LlmSettings {
                api_key,
                api_base: Some(
                    var("LLM_API_BASE").unwrap_or_else(|| GEMINI_OPENAI_BASE.to_string()),
                ),
                note_model: var("NOTE_MODEL")
                    .unwrap_or_else(|| "gemini-flash-latest".to_string()),
            },
            (None, None) => {
                return Err(ConfigError::MissingVar(
                    "OPENAI_API_KEY or GEMINI_API_KEY".to_string(),
                ))
            }
        };

        Ok(Self {
            bind_address,
            database_url,
            log_level,
            cors_origin,
            llm,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_with_only_a_key() {
        let config = load(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.database_url, None);
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.llm.note_model, "gpt-4o-mini");
        assert_eq!(config.llm.api_base, None);
    }

    #[test]
    fn gemini_key_selects_gemini_endpoint() {
        let config = load(&[("GEMINI_API_KEY", "g-test")]).unwrap();
        assert_eq!(config.llm.api_base.as_deref(), Some(GEMINI_OPENAI_BASE));
        assert_eq!(config.llm.note_model, "gemini-flash-latest");
    }

    #[test]
    fn missing_keys_are_reported() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingVar(_))));
    }

    #[test]
    fn invalid_values_are_reported() {
        let bad_addr = load(&[("OPENAI_API_KEY", "k"), ("BIND_ADDRESS", "nowhere")]);
        assert!(matches!(bad_addr, Err(ConfigError::InvalidValue(ref v, _)) if v == "BIND_ADDRESS"));

        let bad_level = load(&[("OPENAI_API_KEY", "k"), ("RUST_LOG", "chatty")]);
        assert!(matches!(bad_level, Err(ConfigError::InvalidValue(ref v, _)) if v == "RUST_LOG"));
    }
}
