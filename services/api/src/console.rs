//! Interactive companion client: collects leads at the terminal and submits them
//! to a running service over HTTP.

use clap::Args;
use dialoguer::Input;
use marketmind::error::AppError;
use marketmind::workflows::marketing::{AnalyzeRequest, Lead, Task, TaskParams};
use reqwest::header::HeaderValue;
use serde_json::Value;
use std::io;
use std::time::Duration;

const DEFAULT_TITLE: &str = "Business Owner";
const DEFAULT_GOAL: &str = "Increase engagement and conversion";
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);
const ANALYZE_TIMEOUT: Duration = Duration::from_secs(30);
const RULE: &str = "==================================================";

#[derive(Args, Debug)]
pub(crate) struct ConsoleArgs {
    /// Base URL of a running marketmind service
    #[arg(long, default_value = "http://localhost:8000")]
    pub(crate) base_url: String,
    /// API key sent as X-API-Key on analysis requests
    #[arg(long)]
    pub(crate) api_key: Option<String>,
}

/// Source of answers for the lead prompts.
pub(crate) trait Prompt {
    fn ask(&mut self, label: &str) -> io::Result<String>;
}

#[derive(Debug, Default)]
struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, label: &str) -> io::Result<String> {
        let answer: String = Input::new()
            .with_prompt(label)
            .allow_empty(true)
            .interact_text()
            .map_err(|err| io::Error::other(err.to_string()))?;
        Ok(answer.trim().to_string())
    }
}

#[derive(Debug, Clone)]
struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl BackendClient {
    fn new(args: ConsoleArgs) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: args.base_url.trim_end_matches('/').to_string(),
            api_key: args.api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    async fn is_healthy(&self) -> bool {
        self.http
            .get(format!("{}/api/health", self.base_url))
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<Reply, reqwest::Error> {
        let mut builder = self
            .http
            .post(format!("{}/api/analyze", self.base_url))
            .timeout(ANALYZE_TIMEOUT)
            .json(request);
        if let Some(key) = self.api_key.as_deref() {
            if let Ok(value) = HeaderValue::from_str(key) {
                builder = builder.header("X-API-Key", value);
            }
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(Reply {
            success: status.is_success(),
            status: status.to_string(),
            body,
        })
    }
}

#[derive(Debug)]
struct Reply {
    success: bool,
    status: String,
    body: String,
}

pub(crate) async fn run_console(args: ConsoleArgs) -> Result<(), AppError> {
    let client = BackendClient::new(args);
    let mut prompt = TerminalPrompt;

    print_banner();
    println!("Checking server connection...");
    if !client.is_healthy().await {
        println!("Cannot connect to backend server at {}", client.base_url);
        println!("Start it with: marketmind-api serve");
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            format!("backend unreachable at {}", client.base_url),
        )));
    }
    println!("Connected to MarketMind");

    loop {
        print_menu();
        let choice = prompt.ask("Select an option (1-6)")?;
        let request = match choice.as_str() {
            "1" => {
                println!("\nCampaign Generator\n{RULE}");
                let leads = collect_leads(&mut prompt)?;
                let goal = prompt.ask(
                    "Campaign goal (e.g. 'Increase brand awareness', 'Generate 50 qualified leads')",
                )?;
                AnalyzeRequest::new(leads, Task::Campaign).with_params(TaskParams {
                    goal: Some(or_default(goal, DEFAULT_GOAL)),
                    ..TaskParams::default()
                })
            }
            "2" => {
                println!("\nSales Pitch Generator\n{RULE}");
                AnalyzeRequest::new(collect_leads(&mut prompt)?, Task::Pitch)
            }
            "3" => {
                println!("\nLead Scoring\n{RULE}");
                AnalyzeRequest::new(collect_leads(&mut prompt)?, Task::Score)
            }
            "4" => {
                println!("\nMarket Analysis\n{RULE}");
                AnalyzeRequest::new(Vec::new(), Task::Market)
                    .with_params(collect_market_params(&mut prompt)?)
            }
            "5" => {
                println!("\nBusiness Insights\n{RULE}");
                AnalyzeRequest::new(collect_leads(&mut prompt)?, Task::Business)
            }
            "6" => {
                println!("\nThank you for using MarketMind!");
                return Ok(());
            }
            _ => {
                println!("Invalid choice. Please select 1-6");
                continue;
            }
        };

        println!("\nWorking on it...");
        match client.analyze(&request).await {
            Ok(reply) if reply.success => {
                println!("\nDone\n{RULE}");
                println!("{}", render_insights(&reply.body));
            }
            Ok(reply) => {
                println!("Error: {}", reply.status);
                println!("{}", reply.body);
            }
            Err(err) => println!("Error: {err}"),
        }
    }
}

/// Prompts until the user stops adding leads; a blank name ends entry once one lead exists.
pub(crate) fn collect_leads(prompt: &mut dyn Prompt) -> io::Result<Vec<Lead>> {
    let mut leads = Vec::new();
    println!("\nEnter Lead Information\n{RULE}");

    loop {
        println!("\n--- Lead #{} ---", leads.len() + 1);
        let name = prompt.ask("Lead name (or company name)")?;
        if name.is_empty() {
            if leads.is_empty() {
                println!("Please enter at least one lead name");
                continue;
            }
            println!("Lead entry complete");
            break;
        }

        let company = prompt.ask("Company name")?;
        let title = prompt.ask("Job title (e.g. CEO, CMO, Manager)")?;
        let email = prompt.ask("Email address")?;
        let revenue = prompt.ask("Annual revenue in $ (e.g. 1000000, or blank for unknown)")?;
        let annual_revenue = parse_revenue(&revenue).unwrap_or_else(|| {
            println!("Invalid revenue format, setting to 0");
            0.0
        });

        leads.push(Lead {
            company: Some(or_default(company, &name)),
            title: Some(or_default(title, DEFAULT_TITLE)),
            email: Some(or_default(email, &default_email(&name))),
            annual_revenue,
            name: Some(name),
            ..Lead::default()
        });

        let more = prompt.ask("Add another lead? (yes/no)")?.to_lowercase();
        if more != "yes" && more != "y" {
            break;
        }
    }

    Ok(leads)
}

fn collect_market_params(prompt: &mut dyn Prompt) -> io::Result<TaskParams> {
    let industry = prompt.ask("Industry (blank for general)")?;
    let competitors = prompt.ask("Competitors, comma separated (optional)")?;
    let competitors: Vec<Value> = competitors
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| Value::String(name.to_string()))
        .collect();

    Ok(TaskParams {
        industry: (!industry.is_empty()).then_some(industry),
        competitors: (!competitors.is_empty()).then_some(competitors),
        ..TaskParams::default()
    })
}

pub(crate) fn default_email(name: &str) -> String {
    format!("{}@example.com", name.to_lowercase().replace(' ', "."))
}

/// Blank means unknown (0); `None` flags input that is not a non-negative amount.
pub(crate) fn parse_revenue(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Pretty-prints the `insights` member of a reply, or the whole body when absent.
pub(crate) fn render_insights(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };
    let insights = match value {
        Value::Object(mut map) if map.contains_key("insights") => {
            map.remove("insights").unwrap_or(Value::Null)
        }
        other => other,
    };
    match insights {
        Value::String(text) => text,
        other => serde_json::to_string_pretty(&other).unwrap_or_else(|_| other.to_string()),
    }
}

fn or_default(answer: String, fallback: &str) -> String {
    if answer.is_empty() {
        fallback.to_string()
    } else {
        answer
    }
}

fn print_banner() {
    println!("{RULE}");
    println!("  MarketMind console");
    println!("  Campaigns, pitches, lead scoring and market insights");
    println!("{RULE}");
}

fn print_menu() {
    println!("\nMain Menu\n{RULE}");
    println!("1. Generate Marketing Campaign");
    println!("2. Generate Sales Pitch");
    println!("3. Score Leads");
    println!("4. Analyze Market");
    println!("5. Business Insights");
    println!("6. Exit");
    println!("{RULE}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct ScriptedPrompt {
        answers: VecDeque<String>,
    }

    impl ScriptedPrompt {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|answer| answer.to_string()).collect(),
            }
        }
    }

    impl Prompt for ScriptedPrompt {
        fn ask(&mut self, label: &str) -> io::Result<String> {
            self.answers.pop_front().ok_or_else(|| {
                io::Error::new(io::ErrorKind::UnexpectedEof, format!("no answer for '{label}'"))
            })
        }
    }

    #[test]
    fn blank_answers_take_documented_defaults() {
        let mut prompt = ScriptedPrompt::new(&["Jordan Lee", "", "", "", "", "no"]);

        let leads = collect_leads(&mut prompt).expect("leads collected");

        assert_eq!(leads.len(), 1);
        let lead = &leads[0];
        assert_eq!(lead.name.as_deref(), Some("Jordan Lee"));
        assert_eq!(lead.company.as_deref(), Some("Jordan Lee"));
        assert_eq!(lead.title.as_deref(), Some("Business Owner"));
        assert_eq!(lead.email.as_deref(), Some("jordan.lee@example.com"));
        assert_eq!(lead.annual_revenue, 0.0);
    }

    #[test]
    fn blank_first_name_is_refused_and_blank_later_name_ends_entry() {
        let mut prompt = ScriptedPrompt::new(&[
            "",
            "Ada",
            "Initech",
            "CEO",
            "ada@initech.com",
            "2000000",
            "y",
            "",
        ]);

        let leads = collect_leads(&mut prompt).expect("leads collected");

        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].company.as_deref(), Some("Initech"));
        assert_eq!(leads[0].annual_revenue, 2_000_000.0);
    }

    #[test]
    fn invalid_revenue_becomes_zero() {
        let mut prompt = ScriptedPrompt::new(&["Bo", "Globex", "CMO", "", "lots", "no"]);
        let leads = collect_leads(&mut prompt).expect("leads collected");
        assert_eq!(leads[0].annual_revenue, 0.0);
        assert_eq!(leads[0].email.as_deref(), Some("bo@example.com"));
    }

    #[test]
    fn revenue_parsing_rules() {
        assert_eq!(parse_revenue(""), Some(0.0));
        assert_eq!(parse_revenue(" 1000000 "), Some(1_000_000.0));
        assert_eq!(parse_revenue("-5"), None);
        assert_eq!(parse_revenue("1e400"), None);
        assert_eq!(parse_revenue("a lot"), None);
    }

    #[test]
    fn market_params_split_competitors() {
        let mut prompt = ScriptedPrompt::new(&["fintech", "Globex, Hooli ,"]);
        let params = collect_market_params(&mut prompt).expect("params collected");
        assert_eq!(params.industry.as_deref(), Some("fintech"));
        assert_eq!(
            params.competitors,
            Some(vec![Value::from("Globex"), Value::from("Hooli")])
        );

        let mut blank = ScriptedPrompt::new(&["", ""]);
        let params = collect_market_params(&mut blank).expect("params collected");
        assert!(params.industry.is_none());
        assert!(params.competitors.is_none());
    }

    #[test]
    fn render_prefers_insights_member() {
        let rendered = render_insights(r#"{"insights": {"total_leads": 1}}"#);
        assert_eq!(rendered, "{\n  \"total_leads\": 1\n}");
        assert_eq!(render_insights(r#"{"insights": "plain"}"#), "plain");
        assert_eq!(render_insights("not json"), "not json");
    }

    #[test]
    fn default_email_lowercases_and_dots_spaces() {
        assert_eq!(default_email("Mary Ann Smith"), "mary.ann.smith@example.com");
    }
}
