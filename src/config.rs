//! Process configuration read once at startup.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::gemini::DEFAULT_BASE_URL;
use crate::llm::DEFAULT_MODELS;

/// Credential used when `GEMINI_API_KEY` is unset, for local demos against
/// a mock backend. Real generation requires a real key.
pub const DEMO_API_KEY: &str = "demo-api-key";

pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
pub const BASE_URL_ENV_VAR: &str = "GEMINI_BASE_URL";
pub const MODELS_ENV_VAR: &str = "COURSEGEN_MODELS";
pub const BIND_ENV_VAR: &str = "COURSEGEN_BIND_ADDR";
pub const TIMEOUT_ENV_VAR: &str = "COURSEGEN_BACKEND_TIMEOUT";
pub const CORS_ENV_VAR: &str = "CORS_ORIGINS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Default timeout for one backend call (2 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    pub gemini_base_url: String,
    pub models: Vec<String>,
    pub bind_addr: SocketAddr,
    pub backend_timeout: Duration,
    pub cors_origins: Vec<String>,
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub bind: Option<String>,
    pub models: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(&ConfigOverrides::default())
    }

    /// Read the environment, letting non-empty `overrides` win before any
    /// value is validated.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let api_key = match non_empty_var(API_KEY_ENV_VAR) {
            Some(key) => key,
            None => {
                warn!(
                    "{} is not set, falling back to the demo key; generation will fail against the real API",
                    API_KEY_ENV_VAR
                );
                DEMO_API_KEY.to_string()
            }
        };

        let cli_models: Vec<String> = overrides
            .models
            .iter()
            .map(|m| m.trim())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect();
        let models = if !cli_models.is_empty() {
            cli_models
        } else {
            match non_empty_var(MODELS_ENV_VAR) {
                Some(raw) => parse_list(&raw),
                None => DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            }
        };
        if models.is_empty() {
            return Err(ConfigError::NoModels);
        }

        let bind_raw = overrides
            .bind
            .clone()
            .or_else(|| non_empty_var(BIND_ENV_VAR))
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = parse_bind_addr(&bind_raw)?;

        let cors_origins = non_empty_var(CORS_ENV_VAR)
            .map(|raw| parse_list(&raw))
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| vec!["*".to_string()]);

        Ok(Self {
            api_key,
            gemini_base_url: non_empty_var(BASE_URL_ENV_VAR)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            models,
            bind_addr,
            backend_timeout: backend_timeout(),
            cors_origins,
        })
    }
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::InvalidValue {
            name: BIND_ENV_VAR.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Split a comma-separated list, dropping blank entries.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Get the configured backend timeout.
///
/// Reads `COURSEGEN_BACKEND_TIMEOUT` (seconds) if set, otherwise uses the
/// default of 120 seconds. Invalid values log a warning and use the default.
fn backend_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
