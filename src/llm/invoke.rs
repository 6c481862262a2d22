//! Calling a generation session with rate-limit aware retries.

use tracing::debug;

use crate::error::GenerationError;

use super::backend::GenerationSession;
use super::retry::{RetryPolicy, retry_with_backoff};

/// Send `prompt` to `session` and return the raw response text.
///
/// Only rate-limited failures are retried, following `policy`. Any other
/// backend failure is returned after a single attempt. A call that succeeds
/// without producing text yields `EmptyResponse`.
pub async fn invoke(
    session: &dyn GenerationSession,
    prompt: &str,
    policy: &RetryPolicy,
) -> Result<String, GenerationError> {
    let response = retry_with_backoff(
        policy,
        || async {
            session
                .generate(prompt)
                .await
                .map_err(GenerationError::Backend)
        },
        is_rate_limited,
        |e, attempts| match e {
            GenerationError::Backend(source) => GenerationError::RateLimited { attempts, source },
            other => other,
        },
    )
    .await?;

    match response {
        Some(text) if !text.trim().is_empty() => {
            debug!("Backend response length: {} chars", text.len());
            Ok(text)
        }
        _ => Err(GenerationError::EmptyResponse),
    }
}

fn is_rate_limited(error: &GenerationError) -> bool {
    matches!(error, GenerationError::Backend(source) if source.is_rate_limited())
}
