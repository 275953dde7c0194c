use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::workflows::marketing::router::analyze_handler;
use crate::workflows::marketing::TaskDispatcher;

fn analyze_request(body: Value) -> Request<Body> {
    Request::post("/api/analyze")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("encode body")))
        .expect("request")
}

#[tokio::test]
async fn analyze_route_scores_wrapped_leads() {
    let router = open_router(TaskDispatcher::offline());

    let response = router
        .oneshot(analyze_request(json!({
            "leads": { "leads": [{ "name": "Ada", "title": "CEO", "annual_revenue": 2000000 }] },
            "task": "score",
        })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload,
        json!({
            "insights": [{
                "lead": { "name": "Ada", "title": "CEO", "annual_revenue": 2000000 },
                "score": "High",
                "score_value": 10,
            }]
        })
    );
}

#[tokio::test]
async fn analyze_route_defaults_to_insights() {
    let router = open_router(TaskDispatcher::offline());

    let response = router
        .oneshot(analyze_request(json!({ "leads": [{ "name": "Bo" }] })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entries = payload["insights"].as_array().expect("insight list");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["score"], json!("Low"));
    assert_eq!(entries[0]["tactics"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn analyze_handler_rejects_malformed_leads() {
    let response = analyze_handler(
        State(TaskDispatcher::offline()),
        axum::body::Bytes::from_static(br#"{"leads": [{"annual_revenue": "plenty"}]}"#),
    )
    .await;

    let err = response.err().expect("malformed lead rejected");
    let response = axum::response::IntoResponse::into_response(err);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    let message = payload["error"].as_str().expect("error message");
    assert!(message.contains("lead #0"), "{message}");
}

#[tokio::test]
async fn analyze_route_rejects_non_json_bodies() {
    let router = open_router(TaskDispatcher::offline());

    let response = router
        .oneshot(
            Request::post("/api/analyze")
                .body(Body::from("leads=Ada"))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert!(payload.get("error").is_some());
}

#[tokio::test]
async fn analyze_route_passes_gateway_errors_through() {
    let dispatcher = dispatcher_with(ScriptedGateway::failing("connection refused"));
    let router = open_router(dispatcher);

    let response = router
        .oneshot(analyze_request(json!({ "leads": [], "task": "market" })))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "insights": { "error": "connection refused" } }));
}

#[tokio::test]
async fn gate_rejects_missing_and_unknown_keys() {
    let router = gated_router(TaskDispatcher::offline());

    let missing = router
        .clone()
        .oneshot(analyze_request(json!({ "task": "score" })))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        read_json_body(missing).await,
        json!({ "error": "Invalid or missing API key" })
    );

    let mut request = analyze_request(json!({ "task": "score" }));
    request
        .headers_mut()
        .insert("x-api-key", "wrong".parse().expect("header value"));
    let unknown = router.oneshot(request).await.expect("route executes");
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn gate_accepts_configured_key_and_leaves_health_open() {
    let router = gated_router(TaskDispatcher::offline());

    let mut request = analyze_request(json!({ "task": "score", "leads": [] }));
    request
        .headers_mut()
        .insert("x-api-key", "demo-key".parse().expect("header value"));
    let accepted = router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes");
    assert_eq!(accepted.status(), StatusCode::OK);
    assert_eq!(read_json_body(accepted).await, json!({ "insights": [] }));

    let health = router
        .oneshot(
            Request::get("/api/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(read_json_body(health).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn preflight_skips_the_gate_and_sets_cors_headers() {
    let router = gated_router(TaskDispatcher::offline());

    let response = router
        .oneshot(
            Request::options("/api/analyze")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|value| value.to_str().ok()),
        Some("*")
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_HEADERS)
            .and_then(|value| value.to_str().ok()),
        Some("Content-Type, X-API-Key")
    );
}
