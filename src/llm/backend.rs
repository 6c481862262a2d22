//! Traits at the seam between the pipeline and a concrete text-generation provider.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::BackendError;

/// A provider able to open generation sessions for named models.
///
/// Creating a session must not perform a generation call; it only checks
/// that the model can be addressed with the current configuration.
#[cfg_attr(test, mockall::automock)]
pub trait GenerationBackend: Send + Sync {
    fn create_session(&self, model: &str) -> Result<Arc<dyn GenerationSession>, BackendError>;
}

/// A session bound to one model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationSession: Send + Sync {
    /// Send the instruction text and return the generated text, if any.
    ///
    /// `Ok(None)` means the call succeeded but produced no text.
    async fn generate(&self, prompt: &str) -> Result<Option<String>, BackendError>;
}
