//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use coursegen::{BackendError, GenerationBackend, GenerationSession};

/// Get the path to test fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Get the path to a response fixture.
pub fn response_fixture(name: &str) -> PathBuf {
    fixtures_dir().join("responses").join(name)
}

/// Read a fixture file as a string.
pub fn read_fixture(path: PathBuf) -> String {
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {:?}: {}", path, e))
}

/// Scripted reply for one backend call.
pub type Reply = Result<Option<String>, BackendError>;

/// Backend whose sessions replay a fixed script of replies.
///
/// Models listed as unavailable fail to instantiate. Every call to
/// `generate` takes the next scripted reply; once the script runs out,
/// `last` answers every further call, given the prompt.
#[derive(Clone)]
pub struct ScriptedBackend {
    unavailable: Vec<String>,
    replies: Arc<Mutex<Vec<Reply>>>,
    last: Arc<dyn Fn(&str) -> Reply + Send + Sync>,
    calls: Arc<AtomicU32>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedBackend {
    pub fn new(
        mut replies: Vec<Reply>,
        last: impl Fn(&str) -> Reply + Send + Sync + 'static,
    ) -> Self {
        replies.reverse();
        Self {
            unavailable: Vec::new(),
            replies: Arc::new(Mutex::new(replies)),
            last: Arc::new(last),
            calls: Arc::new(AtomicU32::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A backend that always answers with `text`.
    pub fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::new(Vec::new(), move |_| Ok(Some(text.clone())))
    }

    pub fn with_unavailable(mut self, models: &[&str]) -> Self {
        self.unavailable = models.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl GenerationBackend for ScriptedBackend {
    fn create_session(&self, model: &str) -> Result<Arc<dyn GenerationSession>, BackendError> {
        if self.unavailable.iter().any(|m| m == model) {
            return Err(BackendError::SessionUnavailable {
                model: model.to_string(),
                reason: "disabled in test".to_string(),
            });
        }
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl GenerationSession for ScriptedBackend {
    async fn generate(&self, prompt: &str) -> Result<Option<String>, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        let next = self.replies.lock().unwrap().pop();
        next.unwrap_or_else(|| (self.last)(prompt))
    }
}
