use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::config::AccessConfig;
use crate::workflows::marketing::gateway::{Completion, LlmGateway};
use crate::workflows::marketing::{marketing_router, Lead, TaskDispatcher};

/// Gateway returning a fixed reply and recording every prompt it receives.
#[derive(Debug)]
pub(super) struct ScriptedGateway {
    reply: Completion,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedGateway {
    pub(super) fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Completion::Text(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(super) fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Completion::Failed(message.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(super) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl LlmGateway for ScriptedGateway {
    fn is_enabled(&self) -> bool {
        true
    }

    fn complete(&self, prompt: &str, system_prompt: &str) -> Completion {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((prompt.to_string(), system_prompt.to_string()));
        self.reply.clone()
    }
}

pub(super) fn dispatcher_with(gateway: Arc<ScriptedGateway>) -> TaskDispatcher {
    TaskDispatcher::new(gateway)
}

pub(super) fn lead(name: &str, company: &str, title: &str, revenue: f64) -> Lead {
    Lead {
        name: Some(name.to_string()),
        company: Some(company.to_string()),
        title: Some(title.to_string()),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        annual_revenue: revenue,
        ..Lead::default()
    }
}

pub(super) fn sample_leads() -> Vec<Lead> {
    vec![
        lead("Ada", "Initech", "CEO", 2_000_000.0),
        lead("Bo", "Globex", "Marketing Manager", 250_000.0),
        lead("Cy", "Hooli", "Analyst", 50_000.0),
    ]
}

pub(super) fn open_router(dispatcher: TaskDispatcher) -> axum::Router {
    marketing_router(dispatcher, AccessConfig::default())
}

pub(super) fn gated_router(dispatcher: TaskDispatcher) -> axum::Router {
    marketing_router(dispatcher, AccessConfig::parse("demo-key:demo"))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
