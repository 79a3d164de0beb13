mod rate_limit;

use std::env;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::extract::{Json, State};
use axum::http::{HeaderValue, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{body::Body, Router};
use buddy_agents::ReviewAnalyzer;
use buddy_core::SentimentResult;
use buddy_ml::{LanguagePrediction, ReviewMlStack};
use buddy_observability::AppMetrics;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::rate_limit::IpRateLimiter;

const MAX_BATCH_TEXTS: usize = 64;

#[derive(Clone)]
pub struct ApiState {
    pub analyzer: Arc<ReviewAnalyzer>,
    pub metrics: Arc<AppMetrics>,
    pub api_key: String,
    pub limiter: IpRateLimiter,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: buddy_observability::MetricsSnapshot,
    capabilities: HealthCapabilities,
}

#[derive(Debug, Serialize)]
struct HealthCapabilities {
    classifier_model: &'static str,
    burn_enabled: bool,
    language_detection: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct AnalyzeRequest {
    text: String,
    include_aspects: Option<bool>,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    analysis_id: String,
    #[serde(flatten)]
    result: SentimentResult,
}

#[derive(Debug, Clone, Deserialize)]
struct AnalyzeBatchRequest {
    texts: Vec<String>,
    include_aspects: Option<bool>,
}

#[derive(Debug, Serialize)]
struct BatchEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<SentimentResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnalyzeBatchResponse {
    batch_id: String,
    entries: Vec<BatchEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct DetectLanguageRequest {
    text: String,
}

#[derive(Debug, Serialize)]
struct DetectLanguageResponse {
    #[serde(flatten)]
    prediction: LanguagePrediction,
}

pub fn build_app() -> Result<Router> {
    let metrics = AppMetrics::shared();
    let analyzer = Arc::new(ReviewAnalyzer::new(
        ReviewMlStack::shared().clone(),
        metrics.clone(),
    ));

    let api_key = env::var("BUDDY_API_KEY").unwrap_or_else(|_| "dev-buddy-key".to_string());
    let rate_limit_window = Duration::from_secs(
        env::var("BUDDY_API_RATE_LIMIT_WINDOW_SECONDS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(60),
    );
    let rate_limit_max = env::var("BUDDY_API_RATE_LIMIT_MAX")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(120);

    let state = ApiState {
        analyzer,
        metrics,
        api_key,
        limiter: IpRateLimiter::new(rate_limit_window, rate_limit_max),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/v1/reviews/analyze", post(analyze))
        .route("/v1/reviews/analyze_batch", post(analyze_batch))
        .route("/v1/language/detect", post(detect_language))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        capabilities: HealthCapabilities {
            classifier_model: state.analyzer.classifier_model(),
            burn_enabled: state.analyzer.burn_enabled(),
            language_detection: true,
        },
    };
    (StatusCode::OK, Json(payload))
}

async fn analyze(
    State(state): State<ApiState>,
    Json(input): Json<AnalyzeRequest>,
) -> Response {
    let include_aspects = input.include_aspects.unwrap_or(false);

    match state.analyzer.analyze(&input.text, include_aspects) {
        Ok(result) => (
            StatusCode::OK,
            Json(AnalyzeResponse {
                analysis_id: uuid::Uuid::new_v4().to_string(),
                result,
            }),
        )
            .into_response(),
        Err(error) => analysis_failed(error).into_response(),
    }
}

async fn analyze_batch(
    State(state): State<ApiState>,
    Json(input): Json<AnalyzeBatchRequest>,
) -> Response {
    if input.texts.len() > MAX_BATCH_TEXTS {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "batch_too_large",
                "max_texts": MAX_BATCH_TEXTS
            })),
        )
            .into_response();
    }

    let include_aspects = input.include_aspects.unwrap_or(false);
    let entries = state
        .analyzer
        .analyze_batch(&input.texts, include_aspects)
        .into_iter()
        .map(|outcome| match outcome {
            Ok(result) => BatchEntry {
                result: Some(result),
                error: None,
            },
            Err(error) => BatchEntry {
                result: None,
                error: Some(error.to_string()),
            },
        })
        .collect();

    (
        StatusCode::OK,
        Json(AnalyzeBatchResponse {
            batch_id: uuid::Uuid::new_v4().to_string(),
            entries,
        }),
    )
        .into_response()
}

async fn detect_language(
    State(state): State<ApiState>,
    Json(input): Json<DetectLanguageRequest>,
) -> impl IntoResponse {
    let prediction = state.analyzer.detect_language(&input.text);
    (StatusCode::OK, Json(DetectLanguageResponse { prediction }))
}

fn analysis_failed(error: buddy_ml::ClassificationError) -> impl IntoResponse {
    tracing::error!(%error, "review analysis failed");
    (
        StatusCode::BAD_GATEWAY,
        Json(serde_json::json!({
            "error": "analysis_failed",
            "message": "analysis failed, try again"
        })),
    )
}

async fn api_key_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());

    if presented != Some(state.api_key.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "invalid_api_key" })),
        )
            .into_response();
    }

    next.run(request).await
}

async fn rate_limit_middleware(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("local")
        .to_string();

    if !state.limiter.allow(&key) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(serde_json::json!({ "error": "rate_limited" })),
        )
            .into_response();
    }

    next.run(request).await
}

fn build_cors_layer() -> CorsLayer {
    let origins = env::var("BUDDY_ALLOWED_ORIGINS")
        .ok()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| origin.trim().parse::<HeaderValue>().ok())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
