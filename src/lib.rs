//! coursegen - an HTTP service that generates validated course outlines with Gemini.
//!
//! # Overview
//!
//! coursegen prompts a text-generation backend for a course outline (modules,
//! lessons, quizzes, final exam), recovers the JSON from its free-form reply,
//! and normalizes it into a [`CourseStructure`] that is always safe to render.

pub mod config;
pub mod course;
pub mod error;
pub mod gemini;
pub mod llm;
pub mod server;

// Re-export commonly used types
pub use config::Config;
pub use course::{CourseGenerator, CourseStructure, GenerationRequest};
pub use error::{BackendError, ConfigError, GenerationError, RequestError};
pub use gemini::GeminiBackend;
pub use llm::{GenerationBackend, GenerationSession, ModelSelector, RetryPolicy};
