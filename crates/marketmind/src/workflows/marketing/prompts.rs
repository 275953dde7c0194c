use serde::Serialize;

use super::dispatch::{Task, TaskParams};
use super::domain::{Lead, MarketContext};

/// Builds the user prompt for an LLM-eligible task. Scoring never goes to the provider.
pub fn for_task(task: Task, leads: &[Lead], params: &TaskParams) -> Option<String> {
    match task {
        Task::Score => None,
        Task::Pitch => Some(pitch_prompt(leads)),
        Task::Campaign => Some(campaign_prompt(leads, params.goal.as_deref())),
        Task::Market => Some(market_prompt(params)),
        Task::Business => Some(business_prompt(leads, params.market.as_ref())),
        Task::Insights => Some(insights_prompt(leads)),
    }
}

pub fn pitch_prompt(leads: &[Lead]) -> String {
    format!(
        "Given the following lead, produce a concise sales pitch (1-2 sentences) and three subject lines. \
         Return a JSON object with keys: pitch, subject_lines.\n\nLead:\n{}",
        render(&leads)
    )
}

pub fn campaign_prompt(leads: &[Lead], goal: Option<&str>) -> String {
    format!(
        "Create a concise 3-step outreach campaign for the following leads and goal. \
         Return JSON with keys: goal, channels, cadence_days, email_subjects, steps.\n\nLeads:\n{}\n\nGoal:\n{}",
        render(&leads),
        goal.unwrap_or("not specified")
    )
}

#[derive(Serialize)]
struct MarketInput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    industry: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    competitors: Option<&'a [serde_json::Value]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    brief: Option<&'a str>,
}

pub fn market_prompt(params: &TaskParams) -> String {
    let input = MarketInput {
        industry: params.industry.as_deref(),
        competitors: params.competitors.as_deref(),
        brief: params.brief.as_deref(),
    };
    format!(
        "You are a market analyst. Given the following inputs (industry, competitors, brief), produce a short market summary, \
         top 3 trends, and top 3 competitors with one-line notes. Return a JSON object.\n\nInput:\n{}",
        render(&input)
    )
}

pub fn business_prompt(leads: &[Lead], market: Option<&MarketContext>) -> String {
    format!(
        "Act as a senior business analyst. Given leads and optional market context, produce top 3 strategic recommendations \
         and a short executive summary. Return JSON with keys: summary, recommendations.\n\nLeads:\n{}\n\nMarket:\n{}",
        render(&leads),
        render(&market)
    )
}

pub fn insights_prompt(leads: &[Lead]) -> String {
    format!(
        "You are an AI marketing analyst. Given leads data (JSON), produce for each lead: \
         a score (High/Medium/Low), a 1-line pitch, two tactical outreach suggestions, and a short messaging example. \
         Return a JSON array where each element contains these fields.\n\nLeads:\n{}",
        render(&leads)
    )
}

fn render<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string())
}
