//! Lead scoring, pitch drafting, campaign planning, and market summaries.
//!
//! Requests flow through [`TaskDispatcher`], which serves each task either from the
//! completion provider behind [`LlmGateway`] or from the deterministic heuristics.

pub mod access;
pub mod dispatch;
pub mod domain;
pub mod gateway;
pub mod heuristics;
pub mod prompts;
pub mod request;
pub mod router;

#[cfg(test)]
mod tests;

pub use dispatch::{heuristic, Strategy, Task, TaskDispatcher, TaskParams, TaskResult};
pub use domain::{
    BusinessInsight, CampaignOutline, CampaignPlan, Lead, LeadInsight, MarketContext,
    MarketSummary, Pitch, ScoreLabel, ScoredLead,
};
pub use gateway::{
    gateway_from_config, Completion, DisabledGateway, GatewayError, LlmGateway, OpenAiGateway,
};
pub use request::{AnalyzeRequest, AnalyzeResponse, RequestError};
pub use router::marketing_router;
