//! Integration tests for the analysis HTTP API.
//!
//! These tests drive the full router with a stubbed model:
//! 1. The JSON endpoints answer with the bare result arrays
//! 2. Missing fields and unparseable model output map to the documented errors
//! 3. `HttpAnalysisClient` round-trips against a live in-process server

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use classroom_lens::adapters::ai::MockAIProvider;
use classroom_lens::adapters::{app_router, AnalysisAppState, HttpAnalysisClient};
use classroom_lens::application::{AnalysisService, UiController, INSIGHT_FAILED_NOTICE};
use classroom_lens::config::ServerConfig;
use classroom_lens::domain::transcript::{AnalysisError, ResponseSanitizer, Section};
use classroom_lens::ports::AnalysisGateway;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(provider: &MockAIProvider) -> Router {
    let service = AnalysisService::new(Arc::new(provider.clone()));
    app_router(
        AnalysisAppState::new(Arc::new(service)),
        &ServerConfig::default(),
    )
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn four_sections() -> Value {
    json!([
        {
            "title": "1. 전처리",
            "content": [
                {"speaker": "T1", "stage": "도입", "text": "안녕하세요"}
            ]
        },
        {
            "title": "2. 유형 분류",
            "content": [{"id": 1, "types": ["인사"]}]
        },
        {
            "title": "3. 질문 분석",
            "content": []
        },
        {
            "title": "4. 상호작용 분석",
            "content": {"teacherCount": 1, "studentCount": 0, "sentimentRatio": 1.0}
        }
    ])
}

/// Serves the app on an ephemeral local port and returns its base URL.
async fn spawn_server(provider: &MockAIProvider) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app(provider);
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

// =============================================================================
// JSON API
// =============================================================================

#[tokio::test]
async fn analyze_returns_model_sections_verbatim() {
    let provider = MockAIProvider::new().with_response(four_sections().to_string());

    let response = app(&provider)
        .oneshot(post_json("/analyze", json!({"text": "T1: 안녕하세요"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, four_sections());
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn analyze_without_text_is_rejected() {
    let provider = MockAIProvider::new();

    let response = app(&provider)
        .oneshot(post_json("/analyze", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "text 필드가 필요합니다."})
    );
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn fenced_model_output_is_sanitized() {
    let raw = "```json\n[1,2,3]\n```";
    assert_eq!(
        ResponseSanitizer::new().sanitize(raw).unwrap(),
        json!([1, 2, 3])
    );

    let fenced_sections = format!("```json\n{}\n```", four_sections());
    let provider = MockAIProvider::new().with_response(fenced_sections);
    let response = app(&provider)
        .oneshot(post_json("/analyze", json!({"text": "T1: 안녕하세요"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, four_sections());
}

#[tokio::test]
async fn insight_prose_is_reported_with_raw_content() {
    let prose = "이 수업에서는 학생 참여가 돋보였습니다.";
    let provider = MockAIProvider::new().with_response(prose);

    let response = app(&provider)
        .oneshot(post_json("/insight", json!({"analysis": four_sections()})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"error": "파싱 오류", "rawContent": prose})
    );
}

#[tokio::test]
async fn insight_without_analysis_is_rejected() {
    let provider = MockAIProvider::new();

    let response = app(&provider)
        .oneshot(post_json("/insight", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "analysis 필드가 필요합니다."})
    );
}

// =============================================================================
// HTTP client round trip
// =============================================================================

#[tokio::test]
async fn client_round_trips_analysis_and_insight() {
    let provider = MockAIProvider::new()
        .with_response(four_sections().to_string())
        .with_response(
            json!([{"title": "5. 인사이트 도출", "content": "개방형 질문을 늘리세요"}]).to_string(),
        );
    let base_url = spawn_server(&provider).await;
    let client = HttpAnalysisClient::new(base_url, Duration::from_secs(10)).unwrap();

    let analysis = client.analyze("T1: 안녕하세요").await.unwrap().unwrap();
    assert_eq!(analysis.len(), 4);
    assert_eq!(analysis[3].title, "4. 상호작용 분석");

    let insights = client.get_insight(&analysis).await.unwrap().unwrap();
    assert_eq!(insights[0].body(), "개방형 질문을 늘리세요");

    let calls = provider.get_calls();
    assert!(calls[1].prompt.contains("\"teacherCount\": 1"));
}

#[tokio::test]
async fn client_maps_server_errors() {
    let provider = MockAIProvider::new().with_response("not json at all");
    let base_url = spawn_server(&provider).await;
    let client = HttpAnalysisClient::new(base_url, Duration::from_secs(10)).unwrap();

    let err = client.analyze("   ").await.unwrap_err();
    assert!(matches!(err, AnalysisError::Validation(ref m) if m == "text 필드가 필요합니다."));

    let analysis = vec![Section::new("1. 전처리", json!([]))];
    let err = client.get_insight(&analysis).await.unwrap_err();
    assert_eq!(err.to_string(), "파싱 오류");
    assert_eq!(err.raw_content(), Some("not json at all"));
}

#[tokio::test]
async fn client_treats_wrong_shape_as_absent() {
    let provider = MockAIProvider::new().with_response(r#"{"result": "ok"}"#);
    let base_url = spawn_server(&provider).await;
    let client = HttpAnalysisClient::new(base_url, Duration::from_secs(10)).unwrap();

    assert_eq!(client.analyze("T1: 안녕").await.unwrap(), None);
}

#[tokio::test]
async fn controller_runs_against_remote_gateway() {
    let provider = MockAIProvider::new()
        .with_response(four_sections().to_string())
        .with_response("Sorry, I cannot help with that.");
    let base_url = spawn_server(&provider).await;
    let client = HttpAnalysisClient::new(base_url, Duration::from_secs(10)).unwrap();

    let mut controller = UiController::new();
    controller.set_input("T1: 안녕하세요");
    assert!(controller.run_analyze(&client).await);
    assert_eq!(controller.rendered_analysis().map(|s| s.len()), Some(4));

    assert!(controller.run_get_insight(&client).await);
    let notices = controller.take_notices();
    assert_eq!(
        notices[0].message,
        "인사이트 실패: 파싱 오류\nSorry, I cannot help with that."
    );
    assert_ne!(notices[0].message, INSIGHT_FAILED_NOTICE);
    assert!(controller.insights().is_none());
}
