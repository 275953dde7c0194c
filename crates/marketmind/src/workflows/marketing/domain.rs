use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Revenue above which a lead is treated as a high-value account.
pub const HIGH_VALUE_REVENUE: f64 = 1_000_000.0;
/// Revenue above which a lead is treated as a mid-market account.
pub const MID_MARKET_REVENUE: f64 = 100_000.0;

/// Prospective customer record as submitted by callers.
///
/// Every attribute is optional; attributes this service does not model are kept in
/// `extra` so they are echoed back untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_revenue",
        serialize_with = "serialize_revenue"
    )]
    pub annual_revenue: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Lead {
    pub fn name(&self) -> Option<&str> {
        present(&self.name)
    }

    pub fn company(&self) -> Option<&str> {
        present(&self.company)
    }

    /// Name used to address the lead: name, then company, then a generic salutation.
    pub fn addressee(&self) -> &str {
        self.name().or_else(|| self.company()).unwrap_or("Customer")
    }

    pub fn is_high_value(&self) -> bool {
        self.annual_revenue > HIGH_VALUE_REVENUE
    }

    /// True when the title names a C-level, founder, or VP role.
    pub fn has_executive_title(&self) -> bool {
        const KEYWORDS: [&str; 4] = ["ceo", "cmo", "founder", "vp"];
        let title = self.title.as_deref().unwrap_or_default().to_lowercase();
        KEYWORDS.iter().any(|keyword| title.contains(keyword))
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn deserialize_revenue<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let revenue = match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| D::Error::custom("annual_revenue is out of range"))?,
        Some(Value::String(raw)) if raw.trim().is_empty() => 0.0,
        Some(Value::String(raw)) => raw.trim().parse::<f64>().map_err(|_| {
            D::Error::custom(format!("annual_revenue '{raw}' is not a number"))
        })?,
        Some(other) => {
            return Err(D::Error::custom(format!(
                "annual_revenue must be a number, got {other}"
            )))
        }
    };

    if !revenue.is_finite() || revenue < 0.0 {
        return Err(D::Error::custom(
            "annual_revenue must be a non-negative number",
        ));
    }
    Ok(revenue)
}

// Whole amounts go back out as integers so callers see the value they sent.
fn serialize_revenue<S>(revenue: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;
    if revenue.fract() == 0.0 && revenue.abs() < EXACT_INTEGER_LIMIT {
        serializer.serialize_i64(*revenue as i64)
    } else {
        serializer.serialize_f64(*revenue)
    }
}

/// Coarse priority bucket derived from annual revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreLabel {
    Low,
    Medium,
    High,
}

impl ScoreLabel {
    pub fn from_revenue(revenue: f64) -> Self {
        if revenue > HIGH_VALUE_REVENUE {
            Self::High
        } else if revenue > MID_MARKET_REVENUE {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Base numeric score before any title bonus.
    pub fn base_value(self) -> u32 {
        match self {
            Self::High => 9,
            Self::Medium => 6,
            Self::Low => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLead {
    pub lead: Lead,
    pub score: ScoreLabel,
    pub score_value: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pitch {
    pub lead: Lead,
    pub pitch: String,
    pub variations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignPlan {
    pub goal: String,
    pub channels: Vec<String>,
    pub cadence_days: Vec<u32>,
    pub email_subjects: Vec<String>,
    pub steps: Vec<String>,
}

/// Campaign plan together with the number of leads it was built for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignOutline {
    pub leads_count: usize,
    pub campaign: CampaignPlan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub industry: String,
    pub summary: String,
    pub top_trends: Vec<String>,
    pub competitors: Vec<Value>,
}

/// Optional market context supplied with business-insight requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MarketContext {
    pub fn is_empty(&self) -> bool {
        self.summary.is_none() && self.extra.is_empty()
    }
}

impl From<&MarketSummary> for MarketContext {
    fn from(summary: &MarketSummary) -> Self {
        let mut extra = Map::new();
        extra.insert("industry".to_string(), Value::from(summary.industry.clone()));
        extra.insert("top_trends".to_string(), Value::from(summary.top_trends.clone()));
        extra.insert(
            "competitors".to_string(),
            Value::Array(summary.competitors.clone()),
        );
        Self {
            summary: Some(summary.summary.clone()),
            extra,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessInsight {
    pub total_leads: usize,
    pub high_value_leads: usize,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_notes: Option<String>,
}

/// Per-lead entry of the combined insights task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadInsight {
    pub lead: Lead,
    pub score: ScoreLabel,
    pub pitch: String,
    pub tactics: Vec<String>,
    pub message: String,
}
