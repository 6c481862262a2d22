//! Route table and handlers.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tracing::info;

use crate::course::{CourseStructure, GenerationRequest};

use super::error::ApiError;
use super::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/", get(root))
        .route("/api/health", get(health))
        .route("/api/ai/generate-course", post(generate_course))
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({"message": "Welcome to AI Course Backend"}))
}

async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// Generate a full course structure for the requested topic.
///
/// # Returns
/// - `200 OK` - The normalized course structure
/// - `400 Bad Request` - Empty topic or malformed body
/// - `429 Too Many Requests` - Backend rate limit persisted through retries
/// - `500 Internal Server Error` - No usable model, or generation failed
async fn generate_course(
    State(state): State<AppState>,
    payload: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<CourseStructure>, ApiError> {
    let Json(request) = payload?;

    request.validate()?;

    info!(
        "Generating course for topic '{}' (audience: {})",
        request.topic(),
        request.audience()
    );

    let course = state.generator.generate(&request).await?;
    Ok(Json(course))
}
