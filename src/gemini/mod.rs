//! Google Gemini generation backend.

pub mod client;

pub use client::{DEFAULT_BASE_URL, GeminiBackend};
