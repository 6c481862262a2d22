//! Reshaping an untrusted draft into a [`CourseStructure`].
//!
//! Every accessor here is total: missing keys, wrong types and empty strings
//! fall back to defaults instead of failing the request.

use serde_json::{Map, Value};
use tracing::debug;

use crate::llm::CourseDraft;

use super::types::{ContentItem, ContentKind, CourseStructure, Module};

/// Keys searched, in order, when the draft has no `modules` array.
pub const MODULE_FALLBACK_KEYS: &[&str] = &["Modules", "course_modules", "lessons", "sections"];

pub const DEFAULT_LESSON_TITLE: &str = "New Lesson";
pub const DEFAULT_LESSON_TEXT: &str = "Lesson Content";
pub const DEFAULT_ICON: &str = "📄";

/// Characters of lesson text used as a title when none is given.
const DERIVED_TITLE_CHARS: usize = 50;

/// Build the course contract from `draft`.
///
/// Module ids are `mod-<request_time>-<index>`, where `index` is the
/// module's position in the draft's module list (skipped entries still
/// consume an index).
pub fn normalize(draft: &CourseDraft, topic: &str, request_time: i64) -> CourseStructure {
    let title = non_empty_str(draft, "title")
        .map(str::to_string)
        .unwrap_or_else(|| topic.to_string());
    let description = non_empty_str(draft, "description")
        .map(str::to_string)
        .unwrap_or_else(|| format!("Course about {}", topic));

    let modules = locate_modules(draft)
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match entry {
            Value::Object(module) => normalize_module(module, index, request_time),
            _ => {
                debug!("Skipping non-object module at index {}", index);
                None
            }
        })
        .collect();

    CourseStructure {
        title,
        description,
        modules,
        final_exam: array_or_empty(draft, "finalExam"),
    }
}

fn locate_modules(draft: &CourseDraft) -> &[Value] {
    if let Some(Value::Array(modules)) = draft.get("modules") {
        return modules;
    }

    MODULE_FALLBACK_KEYS
        .iter()
        .find_map(|key| match draft.get(*key) {
            Some(Value::Array(modules)) => {
                debug!("Using '{}' as the module list", key);
                Some(modules.as_slice())
            }
            _ => None,
        })
        .unwrap_or(&[])
}

fn normalize_module(module: &Map<String, Value>, index: usize, request_time: i64) -> Option<Module> {
    let title = module_title(module, index);
    if title.is_empty() {
        debug!("Dropping module {} with an empty title", index);
        return None;
    }

    let content = match module.get("content") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_object().map(normalize_content_item))
            .collect(),
        _ => Vec::new(),
    };

    Some(Module {
        id: module_id(request_time, index),
        title,
        content,
        quiz: array_or_empty(module, "quiz"),
    })
}

/// Stable identifier for the module at `index` of one generation.
pub fn module_id(request_time: i64, index: usize) -> String {
    format!("mod-{}-{}", request_time, index)
}

/// Resolve a module title.
///
/// Only an absent key becomes "Module N". A present title that is null,
/// zero, `false`, blank or not a scalar resolves empty, which drops the
/// module. Other numbers and `true` are stringified.
fn module_title(module: &Map<String, Value>, index: usize) -> String {
    match module.get("title") {
        None => format!("Module {}", index + 1),
        Some(Value::String(title)) => title.trim().to_string(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => true.to_string(),
        Some(_) => String::new(),
    }
}

fn normalize_content_item(item: &Map<String, Value>) -> ContentItem {
    let text = non_empty_str(item, "text");
    let title = non_empty_str(item, "title")
        .map(str::to_string)
        .or_else(|| text.map(|t| t.chars().take(DERIVED_TITLE_CHARS).collect()))
        .unwrap_or_else(|| DEFAULT_LESSON_TITLE.to_string());

    ContentItem {
        kind: non_empty_str(item, "type")
            .map(ContentKind::from_label)
            .unwrap_or_default(),
        title,
        text: text.unwrap_or(DEFAULT_LESSON_TEXT).to_string(),
        icon: non_empty_str(item, "icon").unwrap_or(DEFAULT_ICON).to_string(),
    }
}

/// A string field that is present and not blank, returned unmodified.
fn non_empty_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

fn array_or_empty(map: &Map<String, Value>, key: &str) -> Vec<Value> {
    match map.get(key) {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}
