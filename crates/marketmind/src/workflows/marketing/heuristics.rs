//! Deterministic marketing heuristics used whenever the completion provider is not in play.
//!
//! Every function here is total: partially populated leads fall back to defaults and
//! empty inputs produce well-formed, if sparse, results.

use serde_json::Value;

use super::domain::{
    BusinessInsight, CampaignOutline, CampaignPlan, Lead, LeadInsight, MarketContext,
    MarketSummary, Pitch, ScoreLabel, ScoredLead,
};

pub const DEFAULT_GOAL: &str = "pipeline generation";
pub const DEFAULT_INDUSTRY: &str = "general";

const CHANNELS: [&str; 3] = ["email", "linkedin", "phone"];
const CADENCE_DAYS: [u32; 3] = [0, 3, 10];
const CAMPAIGN_STEPS: [&str; 3] = [
    "Send short case-study email (day 0)",
    "LinkedIn connection + message (day 3)",
    "Follow-up email with calendar link (day 10)",
];
const MARKET_TRENDS: [&str; 3] = [
    "pricing pressure",
    "digital transformation",
    "shorter buying cycles",
];
const OUTREACH_TACTICS: [&str; 2] = [
    "Email with a short case study and specific ROI numbers",
    "LinkedIn outreach referencing a mutual connection or recent news",
];
const BUSINESS_RECOMMENDATION: &str =
    "Prioritize high-value accounts for ABM and craft industry-specific case studies.";

/// Scores each lead by revenue band, adding one point for executive titles.
///
/// The title bonus only moves `score_value`; the label stays tied to revenue.
pub fn score_leads(leads: &[Lead]) -> Vec<ScoredLead> {
    leads
        .iter()
        .map(|lead| {
            let score = ScoreLabel::from_revenue(lead.annual_revenue);
            let bonus = u32::from(lead.has_executive_title());
            ScoredLead {
                lead: lead.clone(),
                score,
                score_value: score.base_value() + bonus,
            }
        })
        .collect()
}

pub fn create_pitch(lead: &Lead) -> Pitch {
    let name = lead.addressee();
    let pitch = format!(
        "Hi {name}, we help companies like yours increase revenue while reducing acquisition costs. Would you be open to a 10-minute call?"
    );
    let variations = vec![
        pitch.clone(),
        format!(
            "{name}, quick note: we've helped peers in your industry increase pipeline by 30% in 6 months. Interested in a short chat?"
        ),
        format!(
            "Hello {name}, can I share a short case study showing measurable ROI we delivered for similar companies?"
        ),
    ];

    Pitch {
        lead: lead.clone(),
        pitch,
        variations,
    }
}

pub fn create_pitches(leads: &[Lead]) -> Vec<Pitch> {
    leads.iter().map(create_pitch).collect()
}

/// Builds the fixed three-touch outreach plan. The first subject line names the first
/// lead's company when there is one.
pub fn generate_campaign(leads: &[Lead], goal: Option<&str>) -> CampaignPlan {
    let goal = goal
        .map(str::trim)
        .filter(|goal| !goal.is_empty())
        .unwrap_or(DEFAULT_GOAL);
    let audience = leads
        .first()
        .and_then(Lead::company)
        .unwrap_or("companies");

    CampaignPlan {
        goal: goal.to_string(),
        channels: CHANNELS.iter().map(ToString::to_string).collect(),
        cadence_days: CADENCE_DAYS.to_vec(),
        email_subjects: vec![
            format!("How {audience} cut costs by 20%"),
            "Quick case study: pipeline lift in 90 days".to_string(),
        ],
        steps: CAMPAIGN_STEPS.iter().map(ToString::to_string).collect(),
    }
}

pub fn campaign_outline(leads: &[Lead], goal: Option<&str>) -> CampaignOutline {
    CampaignOutline {
        leads_count: leads.len(),
        campaign: generate_campaign(leads, goal),
    }
}

pub fn analyze_market(industry: Option<&str>, competitors: Option<&[Value]>) -> MarketSummary {
    let industry = industry
        .map(str::trim)
        .filter(|industry| !industry.is_empty())
        .unwrap_or(DEFAULT_INDUSTRY);
    let competitors = competitors.map(<[Value]>::to_vec).unwrap_or_default();

    MarketSummary {
        industry: industry.to_string(),
        summary: format!(
            "Market summary for {industry}: {} competitors identified.",
            competitors.len()
        ),
        top_trends: MARKET_TRENDS.iter().map(ToString::to_string).collect(),
        competitors,
    }
}

/// Counts high-value leads and attaches market notes when a non-empty market context is given.
pub fn business_insights(leads: &[Lead], market: Option<&MarketContext>) -> BusinessInsight {
    let market_notes = market
        .filter(|market| !market.is_empty())
        .and_then(|market| market.summary.clone());

    BusinessInsight {
        total_leads: leads.len(),
        high_value_leads: leads.iter().filter(|lead| lead.is_high_value()).count(),
        recommendation: BUSINESS_RECOMMENDATION.to_string(),
        market_notes,
    }
}

/// Combined per-lead view: revenue band, positioning line, tactics, and an opener.
pub fn lead_insights(leads: &[Lead]) -> Vec<LeadInsight> {
    leads
        .iter()
        .map(|lead| {
            let focus = lead.company().or_else(|| lead.name()).unwrap_or("this account");
            let greeting = lead.name().unwrap_or("there");
            let peer = lead.company().unwrap_or("yours");

            LeadInsight {
                lead: lead.clone(),
                score: ScoreLabel::from_revenue(lead.annual_revenue),
                pitch: format!(
                    "For {focus}, emphasize ROI and cost savings over 12 months."
                ),
                tactics: OUTREACH_TACTICS.iter().map(ToString::to_string).collect(),
                message: format!(
                    "Hi {greeting}, we helped companies like {peer} reduce costs by 20% while increasing pipeline. Can we share a 10-minute case study?"
                ),
            }
        })
        .collect()
}
