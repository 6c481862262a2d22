//! Tolerant JSON recovery from LLM responses.
//!
//! Providers are asked for bare JSON but often add a sentence of prose or a
//! markdown fence around it. Extraction takes everything from the first `{`
//! to the last `}` in the text. This is deliberately not brace-balanced, so
//! prose that itself contains braces can defeat it; the whole text is then
//! tried as a fallback.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::GenerationError;

/// Loosely-typed course object recovered from a response.
pub type CourseDraft = Map<String, Value>;

/// Parse the JSON value carried by `response`.
///
/// Tries, in order:
/// 1. The substring from the first `{` to the last `}`
/// 2. The whole trimmed text
pub fn extract_json_value(response: &str) -> Result<Value, serde_json::Error> {
    let trimmed = response.trim();

    if let Some(candidate) = outer_braces(trimmed) {
        match serde_json::from_str(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => debug!("Brace-delimited candidate did not parse: {}", e),
        }
    }

    serde_json::from_str(trimmed)
}

/// Recover a course draft from `response`.
///
/// A parsed value that is not an object is wrapped as
/// `{"title": topic, "modules": <value if it is an array, else []>}`.
pub fn extract_draft(response: &str, topic: &str) -> Result<CourseDraft, GenerationError> {
    let value = extract_json_value(response).map_err(|e| {
        let truncated: String = response.chars().take(200).collect();
        GenerationError::UnparsableResponse(format!("{}. Response: {}", e, truncated))
    })?;

    match value {
        Value::Object(draft) => Ok(draft),
        other => {
            debug!("Response JSON is not an object, wrapping it");
            let modules = match other {
                Value::Array(items) => Value::Array(items),
                _ => Value::Array(Vec::new()),
            };
            let mut draft = Map::new();
            draft.insert("title".to_string(), Value::String(topic.to_string()));
            draft.insert("modules".to_string(), modules);
            Ok(draft)
        }
    }
}

/// Slice from the first `{` through the last `}`, if the pair is ordered.
fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
