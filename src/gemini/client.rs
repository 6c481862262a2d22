//! Gemini `generateContent` REST client.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::llm::{GenerationBackend, GenerationSession};

/// Public Gemini API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Longest error body kept in a [`BackendError`].
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Backend that talks to the Gemini REST API over HTTP.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiBackend {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(BackendError::Request)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            timeout,
        })
    }
}

impl GenerationBackend for GeminiBackend {
    fn create_session(&self, model: &str) -> Result<Arc<dyn GenerationSession>, BackendError> {
        let unavailable = |reason: &str| BackendError::SessionUnavailable {
            model: model.to_string(),
            reason: reason.to_string(),
        };

        if self.api_key.trim().is_empty() {
            return Err(unavailable("API key is not configured"));
        }
        if !is_valid_model_id(model) {
            return Err(unavailable("invalid model identifier"));
        }

        Ok(Arc::new(GeminiSession {
            client: self.client.clone(),
            endpoint: format!("{}/v1beta/models/{}:generateContent", self.base_url, model),
            api_key: self.api_key.clone(),
            timeout_secs: self.timeout.as_secs(),
        }))
    }
}

/// Model ids are path segments such as `gemini-2.0-flash`.
fn is_valid_model_id(model: &str) -> bool {
    !model.is_empty()
        && model
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
}

struct GeminiSession {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout_secs: u64,
}

#[async_trait]
impl GenerationSession for GeminiSession {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, BackendError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::from_prompt(prompt))
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            warn!("Gemini returned {}: {}", status, body);

            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(BackendError::RateLimited(body));
            }
            return Err(BackendError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| self.request_error(e))?;

        let text = payload.text();
        if text.is_none() {
            debug!(
                "Gemini response had no text (finish reason: {:?})",
                payload.finish_reason()
            );
        }
        Ok(text)
    }
}

impl GeminiSession {
    fn request_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout_secs)
        } else if err.is_decode() {
            BackendError::InvalidPayload(err.to_string())
        } else {
            BackendError::Request(err)
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        (!text.is_empty()).then_some(text)
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }
}
