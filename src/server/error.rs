//! Mapping pipeline failures to HTTP responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

use crate::error::{GenerationError, RequestError};

/// Error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

/// Errors surfaced by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error("{detail}")]
    InvalidRequest { status: StatusCode, detail: String },
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Generation(GenerationError::RateLimited { .. }) => {
                StatusCode::TOO_MANY_REQUESTS
            }
            ApiError::Generation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Request(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidRequest { status, .. } => *status,
        }
    }

    /// Client-facing message. Generation failures carry the underlying
    /// cause so problems can be diagnosed from the browser.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Generation(GenerationError::NoBackendAvailable { .. }) => {
                "No suitable Gemini model found. Check API key permissions.".to_string()
            }
            ApiError::Generation(GenerationError::RateLimited { .. }) => {
                "System busy (Rate Limit). Please try again later.".to_string()
            }
            ApiError::Generation(err) => format!("AI generation failed: {}", err),
            ApiError::Request(err) => err.to_string(),
            ApiError::InvalidRequest { detail, .. } => detail.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        match &self {
            ApiError::Generation(GenerationError::NoBackendAvailable { .. }) => {
                error!("Backend configuration error: {}", self);
            }
            ApiError::Generation(GenerationError::RateLimited { .. }) => {
                warn!("Generation throttled: {}", self);
            }
            ApiError::Generation(_) => error!("AI generation failed: {}", self),
            ApiError::Request(_) | ApiError::InvalidRequest { .. } => {
                warn!("Rejected request: {}", detail)
            }
        }

        (status, Json(ErrorDetail { detail })).into_response()
    }
}
