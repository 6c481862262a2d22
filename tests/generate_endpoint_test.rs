//! Integration tests for the HTTP generation endpoint.
//!
//! The router is driven in-process with `tower::ServiceExt::oneshot`
//! against a scripted backend, so no network or API key is needed.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::time::Instant;
use tower::ServiceExt;

use common::ScriptedBackend;
use coursegen::course::FixedClock;
use coursegen::server::{AppState, build_app};
use coursegen::{BackendError, CourseGenerator, CourseStructure, ModelSelector};

const NOW: i64 = 1_700_000_000;

fn app(backend: ScriptedBackend) -> axum::Router {
    let generator = CourseGenerator::new(Arc::new(backend), ModelSelector::default())
        .with_clock(Arc::new(FixedClock(NOW)));
    build_app(AppState::new(generator), &["*".to_string()])
}

fn generate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/ai/generate-course")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_generates_course_structure() {
    let backend = ScriptedBackend::always(
        r#"{"title": "", "modules": [{"title": "Intro", "content": [{"type": "text", "text": "Learn the basics of cameras."}]}]}"#,
    );

    let (status, body) = send(
        app(backend.clone()),
        generate_request(json!({"topic": "Photography Basics", "target_audience": "Teens"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let course: CourseStructure = serde_json::from_value(body.clone()).unwrap();
    assert_eq!(course.title, "Photography Basics");
    assert_eq!(course.description, "Course about Photography Basics");
    assert_eq!(course.modules[0].id, "mod-1700000000-0");
    assert_eq!(course.modules[0].content[0].title, "Learn the basics of cameras.");
    assert_eq!(course.modules[0].content[0].icon, "📄");
    assert_eq!(body["finalExam"], json!([]));
    assert_eq!(body["modules"][0]["quiz"], json!([]));

    assert_eq!(backend.calls(), 1);
    let prompts = backend.prompts();
    assert!(prompts[0].contains("Photography Basics"));
    assert!(prompts[0].contains("Target Audience: Teens."));
}

#[tokio::test]
async fn test_falls_back_to_next_available_model() {
    let backend = ScriptedBackend::always(r#"{"title": "Chess", "modules": []}"#)
        .with_unavailable(&["gemini-2.5-flash", "gemini-flash-latest"]);

    let (status, body) = send(app(backend), generate_request(json!({"topic": "Chess"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Chess");
}

#[tokio::test]
async fn test_no_available_model_is_server_error() {
    let backend = ScriptedBackend::always("{}").with_unavailable(coursegen::llm::DEFAULT_MODELS);

    let (status, body) = send(app(backend.clone()), generate_request(json!({"topic": "Chess"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["detail"],
        "No suitable Gemini model found. Check API key permissions."
    );
    assert_eq!(backend.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_then_success() {
    let backend = ScriptedBackend::new(
        vec![
            Err(BackendError::RateLimited("quota".to_string())),
            Err(BackendError::RateLimited("quota".to_string())),
        ],
        |_| Ok(Some(r#"{"title": "Knots"}"#.to_string())),
    );

    let (status, body) = send(app(backend.clone()), generate_request(json!({"topic": "Knots"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Knots");
    assert_eq!(backend.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_persistent_rate_limit_is_429() {
    let backend = ScriptedBackend::new(Vec::new(), |_| {
        Err(BackendError::Upstream {
            status: 429,
            body: "Too Many Requests".to_string(),
        })
    });

    let (status, body) = send(app(backend.clone()), generate_request(json!({"topic": "Knots"}))).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["detail"],
        "System busy (Rate Limit). Please try again later."
    );
    assert_eq!(backend.calls(), 3);
}

#[tokio::test]
async fn test_backend_error_reports_cause() {
    let backend = ScriptedBackend::new(Vec::new(), |_| {
        Err(BackendError::Upstream {
            status: 400,
            body: "API key not valid. Please pass a valid API key.".to_string(),
        })
    });

    let (status, body) = send(app(backend.clone()), generate_request(json!({"topic": "Knots"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("AI generation failed: "));
    assert!(detail.contains("API key not valid"));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_server_error_mentioning_429_is_not_retried() {
    let backend = ScriptedBackend::new(Vec::new(), |_| {
        Err(BackendError::Upstream {
            status: 500,
            body: "Internal error, request id 84291".to_string(),
        })
    });

    let start = Instant::now();
    let (status, body) = send(app(backend.clone()), generate_request(json!({"topic": "Knots"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("AI generation failed: ")
    );
    assert_eq!(backend.calls(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_unparsable_response_is_server_error() {
    let backend = ScriptedBackend::always("I would rather write a poem.");

    let (status, body) = send(app(backend), generate_request(json!({"topic": "Knots"}))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .contains("Could not recover JSON")
    );
}

#[tokio::test]
async fn test_empty_topic_is_bad_request() {
    let backend = ScriptedBackend::always("{}");

    let (status, body) = send(app(backend.clone()), generate_request(json!({"topic": "   "}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "topic must not be empty");
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_missing_topic_is_rejected() {
    let backend = ScriptedBackend::always("{}");

    let (status, body) = send(app(backend), generate_request(json!({"target_audience": "Adults"}))).await;

    assert!(status.is_client_error());
    assert!(body["detail"].as_str().is_some());
}

#[tokio::test]
async fn test_root_and_health() {
    let request = Request::builder().uri("/api/").body(Body::empty()).unwrap();
    let (status, body) = send(app(ScriptedBackend::always("{}")), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to AI Course Backend");

    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(ScriptedBackend::always("{}")), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let backend = ScriptedBackend::always(r#"{"title": "Shared", "modules": [{"title": "One"}]}"#);
    let app = app(backend.clone());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                send(app, generate_request(json!({"topic": format!("Topic {}", i)}))).await
            })
        })
        .collect();

    for handle in handles {
        let (status, body) = tokio_test::assert_ok!(handle.await);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["modules"][0]["id"], "mod-1700000000-0");
    }
    assert_eq!(backend.calls(), 8);
}

#[tokio::test(start_paused = true)]
async fn test_backoff_does_not_delay_other_requests() {
    let backend = ScriptedBackend::new(Vec::new(), |prompt| {
        if prompt.contains("Throttled") {
            Err(BackendError::RateLimited("quota".to_string()))
        } else {
            Ok(Some(r#"{"title": "Fast"}"#.to_string()))
        }
    });
    let app = app(backend.clone());
    let start = Instant::now();

    let throttled = async {
        let result = send(app.clone(), generate_request(json!({"topic": "Throttled"}))).await;
        (result, start.elapsed())
    };
    let fast = async {
        let result = send(app.clone(), generate_request(json!({"topic": "Fast"}))).await;
        (result, start.elapsed())
    };
    let (((throttled_status, _), throttled_took), ((fast_status, fast_body), fast_took)) =
        tokio::join!(throttled, fast);

    assert_eq!(fast_status, StatusCode::OK);
    assert_eq!(fast_body["title"], "Fast");
    assert!(fast_took < Duration::from_secs(1));

    assert_eq!(throttled_status, StatusCode::TOO_MANY_REQUESTS);
    assert!(throttled_took >= Duration::from_secs(3));
    assert_eq!(backend.calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_request_stops_retrying() {
    let backend = ScriptedBackend::new(Vec::new(), |_| {
        Err(BackendError::RateLimited("quota".to_string()))
    });

    let request = send(app(backend.clone()), generate_request(json!({"topic": "Knots"})));
    let outcome = tokio::time::timeout(Duration::from_millis(500), request).await;
    assert!(outcome.is_err());
    assert_eq!(backend.calls(), 1);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(backend.calls(), 1);
}
