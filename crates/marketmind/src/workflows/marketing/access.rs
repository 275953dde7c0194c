use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::AccessConfig;

pub const API_KEY_HEADER: &str = "x-api-key";

const UNGATED_PATHS: [&str; 1] = ["/api/health"];

/// Rejects `/api/*` calls that do not carry a configured `X-API-Key`.
///
/// Preflight requests and the health probe pass through. With no keys configured the
/// gate is open.
pub async fn require_api_key(
    State(access): State<Arc<AccessConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let gated = path.starts_with("/api/") && !UNGATED_PATHS.contains(&path.as_str());
    if !gated || request.method() == Method::OPTIONS || access.is_open() {
        return next.run(request).await;
    }

    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match presented.and_then(|key| access.role_for(key)) {
        Some(role) => {
            debug!(%role, %path, "api key accepted");
            next.run(request).await
        }
        None => {
            warn!(%path, "rejected request with invalid or missing api key");
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid or missing API key" })),
            )
                .into_response()
        }
    }
}

/// Adds permissive CORS headers so browser frontends on other origins can call the API.
pub async fn cors_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type, X-API-Key"),
    );
    response
}
