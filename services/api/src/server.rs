use crate::cli::ServeArgs;
use crate::infra::{build_dispatcher, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use marketmind::config::AppConfig;
use marketmind::error::AppError;
use marketmind::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(dir) = args.static_dir.take() {
        config.server.static_dir = Some(dir);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dispatcher = build_dispatcher(&config.llm);
    if dispatcher.llm_enabled() {
        info!(model = %config.llm.model, "LLM gateway enabled");
    } else {
        info!("OPENAI_API_KEY not set; serving heuristic analysis only");
    }
    if config.access.is_open() {
        warn!("APP_API_KEYS not set; /api routes accept unauthenticated requests");
    }

    let app = with_service_routes(
        dispatcher,
        config.access.clone(),
        config.server.static_dir.clone(),
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "marketing analysis service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
