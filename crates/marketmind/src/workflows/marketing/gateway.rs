use std::fmt::Debug;
use std::sync::Arc;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::config::LlmConfig;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant that outputs valid JSON.";
pub const TEMPERATURE: f32 = 0.6;
pub const MAX_TOKENS: u32 = 800;
pub const NOT_CONFIGURED: &str = "OpenAI not configured";

/// Outcome of a single completion call.
///
/// Serializes as `{"raw": text}` or `{"error": message}`, the payload callers see when
/// the text cannot be used as structured output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Completion {
    #[serde(rename = "raw")]
    Text(String),
    #[serde(rename = "error")]
    Failed(String),
}

impl Completion {
    pub fn into_value(self) -> Value {
        match self {
            Completion::Text(text) => serde_json::json!({ "raw": text }),
            Completion::Failed(message) => serde_json::json!({ "error": message }),
        }
    }
}

/// Boundary to the external text-completion provider.
///
/// Implementations never fail: transport and provider problems come back as
/// [`Completion::Failed`]. `complete` blocks the calling thread for one round trip.
pub trait LlmGateway: Debug + Send + Sync {
    fn is_enabled(&self) -> bool;
    fn complete(&self, prompt: &str, system_prompt: &str) -> Completion;
}

/// Gateway used when no credential is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGateway;

impl LlmGateway for DisabledGateway {
    fn is_enabled(&self) -> bool {
        false
    }

    fn complete(&self, _prompt: &str, _system_prompt: &str) -> Completion {
        Completion::Failed(NOT_CONFIGURED.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("OpenAI not configured")]
    NotConfigured,
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("provider returned no choices")]
    EmptyChoices,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible providers.
///
/// Holds a handle to the service runtime and blocks on it, so `complete` must be called
/// from a blocking worker rather than from async code.
pub struct OpenAiGateway {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    handle: Handle,
}

impl OpenAiGateway {
    pub fn new(config: &LlmConfig, handle: Handle) -> Result<Self, GatewayError> {
        let api_key = config.api_key.clone().ok_or(GatewayError::NotConfigured)?;
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            handle,
        })
    }

    async fn send(&self, prompt: &str, system_prompt: &str) -> Result<String, GatewayError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Status { status, body });
        }

        let reply: ChatResponse = response.json().await?;
        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or(GatewayError::EmptyChoices)?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

impl Debug for OpenAiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiGateway")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmGateway for OpenAiGateway {
    fn is_enabled(&self) -> bool {
        true
    }

    fn complete(&self, prompt: &str, system_prompt: &str) -> Completion {
        match self.handle.block_on(self.send(prompt, system_prompt)) {
            Ok(text) => {
                debug!(model = %self.model, chars = text.len(), "completion received");
                Completion::Text(text)
            }
            Err(err) => {
                warn!(model = %self.model, error = %err, "completion request failed");
                Completion::Failed(err.to_string())
            }
        }
    }
}

/// Picks the provider-backed gateway when a credential is present, otherwise the
/// disabled one. A client that cannot be built is treated like a missing credential.
pub fn gateway_from_config(config: &LlmConfig, handle: Handle) -> Arc<dyn LlmGateway> {
    if !config.is_configured() {
        return Arc::new(DisabledGateway);
    }

    match OpenAiGateway::new(config, handle) {
        Ok(gateway) => Arc::new(gateway),
        Err(err) => {
            warn!(error = %err, "completion client unavailable; using heuristics only");
            Arc::new(DisabledGateway)
        }
    }
}
