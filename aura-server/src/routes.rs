//! HTTP API routes.

use crate::error::ApiError;
use crate::metrics::ServiceMetrics;
use aura_analysis::{validate_batch, AnalysisRequest, AnalysisResult, SentimentAnalyzer};
use aura_common::logging::generate_request_id;
use aura_common::util::truncate_with_ellipsis;
use aura_common::Config;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderValue,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Instrument;

const SERVICE_NAME: &str = "Sentiment Aura API";

/// Characters of each input echoed back in batch results.
const PREVIEW_CHARS: usize = 50;

const ENDPOINTS: &[&str] = &["/", "/process_text", "/batch_process", "/health", "/status", "/metrics"];

/// Static configuration summary reported by `/status`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub model: String,
    pub cors_origins: Vec<String>,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub rate_limit_per_minute: u32,
    pub max_keywords: usize,
}

impl ServiceInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            model: config.llm.model.clone(),
            cors_origins: config.cors.origins.clone(),
            timeout_seconds: config.llm.timeout_secs,
            max_retries: config.llm.max_retries,
            rate_limit_per_minute: config.server.rate_limit_per_minute,
            max_keywords: config.analysis.max_keywords,
        }
    }
}

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<SentimentAnalyzer>,
    pub metrics: Arc<ServiceMetrics>,
    pub info: Arc<ServiceInfo>,
}

impl AppState {
    pub fn new(analyzer: Arc<SentimentAnalyzer>, config: &Config) -> Self {
        Self {
            analyzer,
            metrics: Arc::new(ServiceMetrics::new()),
            info: Arc::new(ServiceInfo::from_config(config)),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/status", get(status))
        .route("/metrics", get(metrics))
        // Analysis
        .route("/process_text", post(process_text))
        .route("/batch_process", post(batch_process))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state.metrics),
            count_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured origins; unparsable origins are skipped.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn count_requests(
    State(metrics): State<Arc<ServiceMetrics>>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    metrics.record_request();
    next.run(request).await
}

// ============ Service Info ============

async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/status",
        "status": "ready"
    }))
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.metrics.uptime().as_secs(),
        "total_requests": state.metrics.total_requests()
    }))
}

async fn status(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "model": state.info.model,
        "provider": state.analyzer.provider_name(),
        "endpoints": ENDPOINTS,
        "configuration": state.info.as_ref(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}

// ============ Analysis ============

#[derive(Debug, Deserialize)]
struct ProcessTextRequest {
    text: String,
}

async fn process_text(
    State(state): State<AppState>,
    payload: Result<Json<ProcessTextRequest>, JsonRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    let Json(body) = payload?;
    let request = AnalysisRequest::new(&body.text)?;

    let span = tracing::info_span!("process_text", request_id = %generate_request_id());
    async move {
        tracing::info!(chars = request.text().chars().count(), "Analyzing text");
        Ok(Json(state.analyzer.analyze(&request).await))
    }
    .instrument(span)
    .await
}

#[derive(Debug, Serialize)]
struct BatchItem {
    text: String,
    analysis: AnalysisResult,
}

#[derive(Debug, Serialize)]
struct BatchResponse {
    results: Vec<BatchItem>,
    count: usize,
    status: &'static str,
}

async fn batch_process(
    State(state): State<AppState>,
    payload: Result<Json<Vec<String>>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(texts) = payload?;
    let requests = validate_batch(&texts)?;

    let span = tracing::info_span!("batch_process", request_id = %generate_request_id());
    async move {
        tracing::info!(
            submitted = texts.len(),
            accepted = requests.len(),
            "Analyzing batch"
        );
        let analyses = state.analyzer.analyze_batch(&requests).await;

        let results: Vec<BatchItem> = requests
            .iter()
            .zip(analyses)
            .map(|(request, analysis)| BatchItem {
                text: truncate_with_ellipsis(request.text(), PREVIEW_CHARS),
                analysis,
            })
            .collect();

        Ok(Json(BatchResponse {
            count: results.len(),
            results,
            status: "completed",
        }))
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use aura_analysis::{ChatRequest, ChatResponse, Provider, ProviderError};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct UnreachableProvider;

    #[async_trait]
    impl Provider for UnreachableProvider {
        fn name(&self) -> &str {
            "unreachable"
        }

        async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
            Err(ProviderError {
                provider: "unreachable".into(),
                model: request.model,
                message: "not available in tests".into(),
                status_code: None,
            })
        }
    }

    fn test_app() -> Router {
        let config = Config::default();
        let analyzer = SentimentAnalyzer::from_config(Arc::new(UnreachableProvider), &config);
        build_router(AppState::new(Arc::new(analyzer), &config))
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_root() {
        let (status, json) = get_json(test_app(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ready");
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, json) = get_json(test_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        // The health request itself is counted
        assert_eq!(json["total_requests"], 1);
    }

    #[tokio::test]
    async fn test_status_reports_configuration() {
        let (status, json) = get_json(test_app(), "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["provider"], "unreachable");
        assert_eq!(json["configuration"]["max_retries"], 3);
        assert_eq!(json["configuration"]["timeout_seconds"], 30);
        assert_eq!(json["endpoints"].as_array().unwrap().len(), ENDPOINTS.len());
        assert!(chrono::DateTime::parse_from_rfc3339(json["timestamp"].as_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let response = test_app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        // Construction must not panic on a header-invalid origin.
        let _layer = cors_layer(&["http://localhost:3000".into(), "bad\norigin".into()]);
    }
}
