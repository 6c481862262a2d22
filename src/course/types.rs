//! Request and output types for course generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RequestError;

/// Audience used when the request does not name one.
pub const DEFAULT_AUDIENCE: &str = "Beginners";

/// A request to generate a course outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub topic: String,
    #[serde(default, alias = "targetAudience")]
    pub target_audience: Option<String>,
}

impl GenerationRequest {
    pub fn new(topic: impl Into<String>, target_audience: Option<&str>) -> Self {
        Self {
            topic: topic.into(),
            target_audience: target_audience.map(str::to_string),
        }
    }

    /// The topic with surrounding whitespace removed.
    pub fn topic(&self) -> &str {
        self.topic.trim()
    }

    /// The requested audience, or [`DEFAULT_AUDIENCE`] when missing or blank.
    pub fn audience(&self) -> &str {
        match self.target_audience.as_deref().map(str::trim) {
            Some(audience) if !audience.is_empty() => audience,
            _ => DEFAULT_AUDIENCE,
        }
    }

    /// Reject requests that cannot produce a meaningful course.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.topic().is_empty() {
            return Err(RequestError::EmptyTopic);
        }
        Ok(())
    }
}

/// Kind of a lesson item within a module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    #[default]
    Text,
    Video,
    Quiz,
    File,
}

impl ContentKind {
    /// Map a backend-provided label, defaulting unknown labels to `Text`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "video" => ContentKind::Video,
            "quiz" => ContentKind::Quiz,
            "file" => ContentKind::File,
            _ => ContentKind::Text,
        }
    }
}

/// A single lesson item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub title: String,
    pub text: String,
    pub icon: String,
}

/// A course module with its lessons and quiz.
///
/// Quiz questions are passed through as emitted by the backend
/// (`{question, options, correctAnswer}`), without per-question checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: String,
    pub title: String,
    pub content: Vec<ContentItem>,
    pub quiz: Vec<Value>,
}

/// The validated course outline returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseStructure {
    pub title: String,
    pub description: String,
    pub modules: Vec<Module>,
    pub final_exam: Vec<Value>,
}
