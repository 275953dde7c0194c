use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use super::access::{cors_headers, require_api_key};
use super::dispatch::TaskDispatcher;
use super::request::{AnalyzeRequest, AnalyzeResponse};
use crate::config::AccessConfig;
use crate::error::AppError;

/// Router exposing the analysis API behind the API-key gate.
pub fn marketing_router(dispatcher: TaskDispatcher, access: AccessConfig) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route(
            "/api/analyze",
            post(analyze_handler).options(preflight_handler),
        )
        .layer(middleware::from_fn_with_state(
            Arc::new(access),
            require_api_key,
        ))
        .layer(middleware::from_fn(cors_headers))
        .with_state(dispatcher)
}

pub(crate) async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn preflight_handler() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Runs the dispatcher on a blocking worker since a provider call blocks for a full round trip.
pub(crate) async fn analyze_handler(
    State(dispatcher): State<TaskDispatcher>,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let request = AnalyzeRequest::from_slice(&body)?;
    let response = tokio::task::spawn_blocking(move || dispatcher.handle(request)).await?;
    Ok(Json(response))
}
