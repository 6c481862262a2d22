//! Model selection over an ordered preference list.

use std::fmt;
use std::sync::Arc;

use tracing::{info, warn};

use crate::error::GenerationError;

use super::backend::{GenerationBackend, GenerationSession};

/// Models to try, most preferred first.
pub const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-flash-latest",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
    "gemini-pro",
];

/// A session opened for the first model that could be instantiated.
pub struct SelectedModel {
    pub model: String,
    pub session: Arc<dyn GenerationSession>,
}

impl fmt::Debug for SelectedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedModel")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// Picks a working model from an ordered candidate list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelector {
    candidates: Vec<String>,
}

impl ModelSelector {
    pub fn new(candidates: Vec<String>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Open a session for the first candidate the backend accepts.
    ///
    /// Instantiation failures are logged and skipped. Only when every
    /// candidate fails does this return `NoBackendAvailable`.
    pub fn select(&self, backend: &dyn GenerationBackend) -> Result<SelectedModel, GenerationError> {
        for model in &self.candidates {
            match backend.create_session(model) {
                Ok(session) => {
                    info!("Successfully initialized model: {}", model);
                    return Ok(SelectedModel {
                        model: model.clone(),
                        session,
                    });
                }
                Err(e) => {
                    warn!("Model {} not available: {}", model, e);
                }
            }
        }

        Err(GenerationError::NoBackendAvailable {
            tried: self.candidates.clone(),
        })
    }
}

impl Default for ModelSelector {
    fn default() -> Self {
        ModelSelector::new(DEFAULT_MODELS.iter().map(|m| m.to_string()).collect())
    }
}
