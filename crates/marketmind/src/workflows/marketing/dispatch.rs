use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::domain::{
    BusinessInsight, CampaignOutline, Lead, LeadInsight, MarketContext, MarketSummary, Pitch,
    ScoredLead,
};
use super::gateway::{Completion, DisabledGateway, LlmGateway, DEFAULT_SYSTEM_PROMPT};
use super::heuristics;
use super::prompts;
use super::request::{AnalyzeRequest, AnalyzeResponse};

/// Named operation a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    Score,
    Pitch,
    Campaign,
    Market,
    Business,
    Insights,
}

impl Task {
    pub const DEFAULT: &'static str = "insights";

    /// Resolves a task identifier. Anything unrecognised runs the combined insights task.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "score" => Self::Score,
            "pitch" => Self::Pitch,
            "campaign" => Self::Campaign,
            "market" => Self::Market,
            "business" => Self::Business,
            _ => Self::Insights,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Pitch => "pitch",
            Self::Campaign => "campaign",
            Self::Market => "market",
            Self::Business => "business",
            Self::Insights => "insights",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional task inputs. Keys this service does not interpret are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<MarketContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub competitors: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brief: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Task-dependent result payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskResult {
    Scores(Vec<ScoredLead>),
    Pitches(Vec<Pitch>),
    Campaign(CampaignOutline),
    Market(MarketSummary),
    Business(BusinessInsight),
    Insights(Vec<LeadInsight>),
    /// Structured output parsed from the provider's reply.
    Generated(Value),
    /// Provider reply that was not usable structured output, or the provider failure.
    Passthrough(Completion),
}

/// How a single request will be served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    Heuristic,
    Llm { prompt: String },
}

/// Routes each task to the completion provider or the local heuristics.
///
/// The provider path is taken whenever the gateway is enabled and the task has a prompt.
/// Once taken, an unusable reply is returned as-is; the heuristics are not retried.
#[derive(Debug, Clone)]
pub struct TaskDispatcher {
    gateway: Arc<dyn LlmGateway>,
}

impl TaskDispatcher {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self { gateway }
    }

    /// Dispatcher that only ever uses the heuristics.
    pub fn offline() -> Self {
        Self::new(Arc::new(DisabledGateway))
    }

    pub fn llm_enabled(&self) -> bool {
        self.gateway.is_enabled()
    }

    pub fn strategy(&self, task: Task, leads: &[Lead], params: &TaskParams) -> Strategy {
        if !self.gateway.is_enabled() {
            return Strategy::Heuristic;
        }
        match prompts::for_task(task, leads, params) {
            Some(prompt) => Strategy::Llm { prompt },
            None => Strategy::Heuristic,
        }
    }

    /// Runs one task. Blocks for the duration of the provider round trip when one is made.
    pub fn dispatch(&self, task: Task, leads: &[Lead], params: &TaskParams) -> TaskResult {
        match self.strategy(task, leads, params) {
            Strategy::Heuristic => {
                debug!(%task, leads = leads.len(), "serving task from heuristics");
                heuristic(task, leads, params)
            }
            Strategy::Llm { prompt } => {
                debug!(%task, leads = leads.len(), "serving task from completion provider");
                self.complete(task, &prompt)
            }
        }
    }

    pub fn handle(&self, request: AnalyzeRequest) -> AnalyzeResponse {
        let task = Task::parse(&request.task);
        let params = request.params.unwrap_or_default();
        info!(
            requested = %request.task,
            %task,
            leads = request.leads.len(),
            "dispatching analysis"
        );

        AnalyzeResponse {
            insights: self.dispatch(task, &request.leads, &params),
        }
    }

    fn complete(&self, task: Task, prompt: &str) -> TaskResult {
        match self.gateway.complete(prompt, DEFAULT_SYSTEM_PROMPT) {
            Completion::Text(text) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => TaskResult::Generated(value),
                Err(err) => {
                    warn!(%task, error = %err, "completion was not valid JSON; returning raw text");
                    TaskResult::Passthrough(Completion::Text(text))
                }
            },
            Completion::Failed(message) => {
                warn!(%task, error = %message, "completion unavailable; returning gateway error");
                TaskResult::Passthrough(Completion::Failed(message))
            }
        }
    }
}

/// Heuristic counterpart of every task.
pub fn heuristic(task: Task, leads: &[Lead], params: &TaskParams) -> TaskResult {
    match task {
        Task::Score => TaskResult::Scores(heuristics::score_leads(leads)),
        Task::Pitch => TaskResult::Pitches(heuristics::create_pitches(leads)),
        Task::Campaign => {
            TaskResult::Campaign(heuristics::campaign_outline(leads, params.goal.as_deref()))
        }
        Task::Market => TaskResult::Market(heuristics::analyze_market(
            params.industry.as_deref(),
            params.competitors.as_deref(),
        )),
        Task::Business => {
            TaskResult::Business(heuristics::business_insights(leads, params.market.as_ref()))
        }
        Task::Insights => TaskResult::Insights(heuristics::lead_insights(leads)),
    }
}
