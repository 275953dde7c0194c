use crate::infra::{AppState, StaticRoot};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json, Router};
use marketmind::config::AccessConfig;
use marketmind::workflows::marketing::{marketing_router, TaskDispatcher};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::debug;

pub(crate) fn with_service_routes(
    dispatcher: TaskDispatcher,
    access: AccessConfig,
    static_dir: Option<PathBuf>,
) -> Router {
    let router = marketing_router(dispatcher, access)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint));

    match static_dir {
        Some(dir) => router
            .fallback(static_asset)
            .layer(Extension(StaticRoot(dir))),
        None => router,
    }
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn static_asset(Extension(root): Extension<StaticRoot>, uri: Uri) -> Response {
    let Some(mut path) = resolve_static_path(&root.0, uri.path()) else {
        return not_found();
    };
    if tokio::fs::metadata(&path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
    {
        path.push("index.html");
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.essence_str().to_string())], bytes).into_response()
        }
        Err(err) => {
            debug!(path = %path.display(), error = %err, "static asset unavailable");
            not_found()
        }
    }
}

/// Maps a request path onto the static root, refusing anything that could escape it.
pub(crate) fn resolve_static_path(root: &Path, request_path: &str) -> Option<PathBuf> {
    let mut resolved = root.to_path_buf();
    for segment in request_path.split('/').filter(|segment| !segment.is_empty()) {
        if segment == "." || segment == ".." || segment.contains('\\') || segment.contains(':') {
            return None;
        }
        resolved.push(segment);
    }
    Some(resolved)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "not found" }))).into_response()
}
