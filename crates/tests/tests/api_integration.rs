use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use buddy_api::build_app;
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn health_is_public() {
    let app = build_app().expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_reports_classifier_capabilities() {
    let app = build_app().expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(parsed["status"], "ok");
    assert!(parsed["capabilities"]["classifier_model"].is_string());
    assert!(parsed["metrics"].get("analyses_total").is_some());
}

#[tokio::test]
async fn analyze_requires_api_key() {
    let app = build_app().expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/reviews/analyze")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "text": "The hotel was amazing"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn analyze_returns_scored_review() {
    let app = build_app().expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/reviews/analyze")
        .header("content-type", "application/json")
        .header("x-api-key", "dev-buddy-key")
        .body(Body::from(
            json!({
                "text": "The hotel was amazing and the staff were wonderful."
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(parsed.get("analysis_id").is_some());
    assert!(parsed.get("label").is_some());
    let score = parsed["score"].as_u64().expect("score should be a number");
    assert!((1..=5).contains(&score));
    let confidence = parsed["confidence_adjusted"]
        .as_f64()
        .expect("confidence should be a number");
    assert!(confidence <= 100.0);
}

#[tokio::test]
async fn analyze_includes_aspects_on_request() {
    let app = build_app().expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/reviews/analyze")
        .header("content-type", "application/json")
        .header("x-api-key", "dev-buddy-key")
        .body(Body::from(
            json!({
                "text": "The staff were friendly and helpful. The room was clean and spacious.",
                "include_aspects": true
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    let aspects = parsed["aspects"].as_object().expect("aspects object");
    assert!(aspects.contains_key("service"));
    assert!(aspects.contains_key("accommodation"));
}

#[tokio::test]
async fn analyze_batch_keeps_input_order() {
    let app = build_app().expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/reviews/analyze_batch")
        .header("content-type", "application/json")
        .header("x-api-key", "dev-buddy-key")
        .body(Body::from(
            json!({
                "texts": [
                    "The food was delicious.",
                    "The bus was delayed and the driver was rude."
                ]
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert!(parsed.get("batch_id").is_some());
    let entries = parsed["entries"].as_array().expect("entries array");
    assert_eq!(entries.len(), 2);

    let first = entries[0]["result"]["score"].as_u64().unwrap();
    let second = entries[1]["result"]["score"].as_u64().unwrap();
    assert!(first > second);
}

#[tokio::test]
async fn analyze_batch_rejects_oversized_input() {
    let app = build_app().expect("app should build");

    let texts: Vec<String> = (0..65).map(|i| format!("review number {i}")).collect();
    let request = Request::builder()
        .method("POST")
        .uri("/v1/reviews/analyze_batch")
        .header("content-type", "application/json")
        .header("x-api-key", "dev-buddy-key")
        .body(Body::from(json!({ "texts": texts }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn detect_language_identifies_scripts() {
    let app = build_app().expect("app should build");

    let request = Request::builder()
        .method("POST")
        .uri("/v1/language/detect")
        .header("content-type", "application/json")
        .header("x-api-key", "dev-buddy-key")
        .body(Body::from(
            json!({
                "text": "ホテルはとても綺麗でした"
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(parsed["language"], "japanese");
    assert!(parsed["confidence"].as_f64().unwrap() > 0.5);
}
