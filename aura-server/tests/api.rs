//! Integration tests for aura-server.

use async_trait::async_trait;
use aura_analysis::{
    ChatRequest, ChatResponse, Provider, ProviderError, SentimentAnalyzer, TokenUsage,
};
use aura_common::Config;
use aura_server::{build_router, cors_layer, AppState};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const PAYLOAD: &str = r#"{"sentiment": 0.7, "sentiment_type": "positive", "energy": 0.6,
    "keywords": ["sunny", "walk"], "dominant_emotion": "joy"}"#;

/// Always answers with the same payload and counts calls.
struct FixedProvider {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl Provider for FixedProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ChatResponse {
            provider: "fixed".into(),
            model: request.model,
            content: PAYLOAD.into(),
            usage: TokenUsage::default(),
            finish_reason: Some("stop".into()),
            latency_ms: 1,
        })
    }
}

fn test_app() -> (axum::Router, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = Arc::new(FixedProvider {
        calls: Arc::clone(&calls),
    });
    let config = Config::default();
    let analyzer = SentimentAnalyzer::from_config(provider, &config);
    let app = build_router(AppState::new(Arc::new(analyzer), &config))
        .layer(cors_layer(&config.cors.origins));
    (app, calls)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_process_text_returns_analysis() {
    let (app, calls) = test_app();

    let (status, json) = send(
        app,
        post_json("/process_text", serde_json::json!({"text": "A sunny walk in the park"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sentiment"], 0.7);
    assert_eq!(json["sentiment_type"], "positive");
    assert_eq!(json["energy"], 0.6);
    assert_eq!(json["keywords"], serde_json::json!(["sunny", "walk"]));
    assert_eq!(json["dominant_emotion"], "joy");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_process_text_rejects_blank_text() {
    let (app, calls) = test_app();

    let (status, json) = send(app, post_json("/process_text", serde_json::json!({"text": "   \n\t"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "EMPTY_TEXT");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_process_text_rejects_overlong_text() {
    let (app, calls) = test_app();
    let text = "x".repeat(5001);

    let (status, json) = send(app, post_json("/process_text", serde_json::json!({ "text": text }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "TEXT_TOO_LONG");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_process_text_rejects_malformed_body() {
    let (app, _) = test_app();

    let (status, json) = send(app, post_json("/process_text", serde_json::json!({"body": "hi"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "INVALID_REQUEST");
}

#[tokio::test]
async fn test_batch_over_limit_is_rejected_without_analysis() {
    let (app, calls) = test_app();
    let texts: Vec<String> = (0..11).map(|i| format!("text number {i}")).collect();

    let (status, json) = send(app, post_json("/batch_process", serde_json::json!(texts))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "BATCH_TOO_LARGE");
    assert_eq!(json["error"]["message"], "Maximum 10 texts allowed per batch");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_batch_skips_blank_items() {
    let (app, calls) = test_app();
    let texts = serde_json::json!([
        "one", "", "two", "   ", "three", "four", "\t", "five", "six", "seven"
    ]);

    let (status, json) = send(app, post_json("/batch_process", texts)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 7);
    assert_eq!(json["status"], "completed");
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 7);
    assert_eq!(results[0]["text"], "one");
    assert_eq!(results[1]["text"], "two");
    assert_eq!(results[6]["text"], "seven");
    assert_eq!(results[0]["analysis"]["dominant_emotion"], "joy");
    assert_eq!(calls.load(Ordering::SeqCst), 7);
}

#[tokio::test]
async fn test_batch_previews_long_text() {
    let (app, _) = test_app();
    let long = "a".repeat(80);

    let (status, json) = send(app, post_json("/batch_process", serde_json::json!([long]))).await;

    assert_eq!(status, StatusCode::OK);
    let preview = json["results"][0]["text"].as_str().unwrap();
    assert_eq!(preview, format!("{}...", "a".repeat(50)));
}

#[tokio::test]
async fn test_empty_batch_completes() {
    let (app, calls) = test_app();

    let (status, json) = send(app, post_json("/batch_process", serde_json::json!([]))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 0);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_metrics_count_every_request() {
    let (app, _) = test_app();

    for _ in 0..3 {
        let response = app
            .clone()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let (status, json) = send(
        app,
        Request::builder().uri("/metrics").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_requests"], 4);
    assert!(json["requests_per_hour"].as_f64().unwrap() > 0.0);
    assert!(json["start_time"].is_string());
    assert!(json["current_time"].is_string());
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/process_text")
                .header(header::ORIGIN, "http://localhost:3000")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_cors_ignores_unknown_origin() {
    let (app, _) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/process_text")
                .header(header::ORIGIN, "http://evil.example")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
