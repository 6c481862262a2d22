//! End-to-end course generation for a single request.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::GenerationError;
use crate::llm::{GenerationBackend, ModelSelector, RetryPolicy, extract_draft, invoke};

use super::clock::{Clock, SystemClock};
use super::normalize::normalize;
use super::prompt::build_course_prompt;
use super::types::{CourseStructure, GenerationRequest};

/// Runs select → prompt → invoke → extract → normalize.
///
/// Holds only read-only configuration, so one instance can serve any number
/// of concurrent requests; each call keeps its own retry state.
pub struct CourseGenerator {
    backend: Arc<dyn GenerationBackend>,
    selector: ModelSelector,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl CourseGenerator {
    pub fn new(backend: Arc<dyn GenerationBackend>, selector: ModelSelector) -> Self {
        Self {
            backend,
            selector,
            retry: RetryPolicy::default(),
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Generate a course outline for `request`.
    ///
    /// The result is not persisted; storing it is up to the caller.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<CourseStructure, GenerationError> {
        let selected = self.selector.select(self.backend.as_ref())?;

        let prompt = build_course_prompt(request);
        debug!("Course prompt length: {} chars", prompt.len());

        let raw = invoke(selected.session.as_ref(), &prompt, &self.retry).await?;
        let draft = extract_draft(&raw, request.topic())?;

        let request_time = self.clock.now_epoch_secs();
        let course = normalize(&draft, request.topic(), request_time);

        info!(
            "Generated course '{}' with {} modules using {}",
            course.title,
            course.modules.len(),
            selected.model
        );
        Ok(course)
    }
}
