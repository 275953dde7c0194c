use marketmind::config::LlmConfig;
use marketmind::workflows::marketing::{gateway_from_config, TaskDispatcher};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::runtime::Handle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Directory holding the optional browser frontend.
#[derive(Debug, Clone)]
pub(crate) struct StaticRoot(pub(crate) PathBuf);

/// Must be called from inside the tokio runtime; the gateway blocks on it.
pub(crate) fn build_dispatcher(config: &LlmConfig) -> TaskDispatcher {
    TaskDispatcher::new(gateway_from_config(config, Handle::current()))
}
