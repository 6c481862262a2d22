//! Error types for coursegen modules using thiserror.

use thiserror::Error;

/// Errors from a single generation backend operation.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Model '{model}' is not available: {reason}")]
    SessionUnavailable { model: String, reason: String },

    #[error("Rate limited by backend (429 Too Many Requests): {0}")]
    RateLimited(String),

    #[error("Backend request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Backend returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Backend request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Backend returned an unreadable payload: {0}")]
    InvalidPayload(String),

    #[error("Backend call failed: {0}")]
    Other(String),
}

impl BackendError {
    /// Whether this failure carries a rate-limit signature.
    ///
    /// Besides the explicit variant and an upstream 429, an upstream body or
    /// opaque error mentioning "too many requests" or gRPC's
    /// `RESOURCE_EXHAUSTED` counts. Transport, timeout and payload errors
    /// never do, whatever their message says.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            BackendError::RateLimited(_) => true,
            BackendError::Upstream { status: 429, .. } => true,
            BackendError::Upstream { body: message, .. } | BackendError::Other(message) => {
                has_rate_limit_signature(message)
            }
            BackendError::SessionUnavailable { .. }
            | BackendError::Request(_)
            | BackendError::Timeout(_)
            | BackendError::InvalidPayload(_) => false,
        }
    }
}

fn has_rate_limit_signature(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    lowered.contains("too many requests") || lowered.contains("resource_exhausted")
}

/// Errors from the course generation pipeline.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("No suitable backend model could be initialized (tried: {})", .tried.join(", "))]
    NoBackendAvailable { tried: Vec<String> },

    #[error("Backend rate limit persisted after {attempts} attempts: {source}")]
    RateLimited {
        attempts: u32,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Backend(BackendError),

    #[error("Backend returned an empty response")]
    EmptyResponse,

    #[error("Could not recover JSON from backend response: {0}")]
    UnparsableResponse(String),
}

/// Requests rejected before any generation work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("topic must not be empty")]
    EmptyTopic,
}

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Model preference list is empty")]
    NoModels,
}
