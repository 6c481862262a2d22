//! Generation backend abstraction, model selection, retry and response extraction.

pub mod backend;
pub mod invoke;
pub mod json;
pub mod retry;
pub mod selector;

pub use backend::{GenerationBackend, GenerationSession};
pub use invoke::invoke;
pub use json::{CourseDraft, extract_draft, extract_json_value};
pub use retry::{RetryPolicy, retry_with_backoff};
pub use selector::{DEFAULT_MODELS, ModelSelector, SelectedModel};
