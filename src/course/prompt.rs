//! Prompt construction for course generation.

use super::types::GenerationRequest;

pub const MIN_MODULES: usize = 4;
pub const MAX_MODULES: usize = 8;
pub const MIN_CONTENT_ITEMS: usize = 3;
pub const MAX_CONTENT_ITEMS: usize = 5;
pub const MIN_QUIZ_QUESTIONS: usize = 2;
pub const MAX_QUIZ_QUESTIONS: usize = 4;
pub const MIN_EXAM_QUESTIONS: usize = 5;
pub const MAX_EXAM_QUESTIONS: usize = 10;

/// Longest topic or audience text interpolated into the prompt.
const MAX_FIELD_CHARS: usize = 200;

/// Build the instruction text asking the backend for a course outline.
///
/// The output is a pure function of the request: the same topic and
/// audience always produce the same prompt.
pub fn build_course_prompt(request: &GenerationRequest) -> String {
    let topic = sanitize_for_prompt(request.topic());
    let audience = sanitize_for_prompt(request.audience());

    format!(
        r#"Act as an expert educational curriculum designer.
Create a comprehensive, structured course outline for the topic: "{topic}".
Target Audience: {audience}.

The output MUST be valid, parseable JSON with exactly this structure:
{{
  "title": "Engaging Course Title",
  "description": "Compelling 2-sentence description.",
  "modules": [
    {{
      "title": "Module 1: Title",
      "content": [
        {{ "type": "text", "title": "Lesson title", "text": "Full lesson body...", "icon": "📄" }},
        {{ "type": "video", "title": "Video title", "text": "What the video covers...", "icon": "📽️" }},
        {{ "type": "quiz", "title": "Checkpoint title", "text": "What the checkpoint reviews...", "icon": "❓" }}
      ],
      "quiz": [
        {{ "question": "Question text?", "options": ["A", "B", "C", "D"], "correctAnswer": "A" }}
      ]
    }}
  ],
  "finalExam": [
    {{ "question": "Question text?", "options": ["A", "B", "C", "D"], "correctAnswer": "A" }}
  ]
}}

## Instructions
1. Create between {MIN_MODULES} and {MAX_MODULES} modules.
2. Each module has {MIN_CONTENT_ITEMS}-{MAX_CONTENT_ITEMS} content items mixing "text", "video" and "quiz" types.
3. Each module has {MIN_QUIZ_QUESTIONS}-{MAX_QUIZ_QUESTIONS} quiz questions; "correctAnswer" must be one of "options".
4. The final exam has {MIN_EXAM_QUESTIONS}-{MAX_EXAM_QUESTIONS} questions covering the whole course.
5. Lesson "text" must be genuine educational content written for the target audience, not placeholder text.
6. Return only the raw JSON object. No explanations before or after it, and no Markdown formatting or code fences (like ```json)."#
    )
}

/// Neutralize markdown structure in user-provided text before it enters a prompt.
pub fn sanitize_for_prompt(text: &str) -> String {
    text.replace("```", "'''")
        .replace("##", "//")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_FIELD_CHARS)
        .collect()
}
