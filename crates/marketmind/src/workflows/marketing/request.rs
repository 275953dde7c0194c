use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::dispatch::{Task, TaskParams, TaskResult};
use super::domain::Lead;

/// Normalised body of an analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub leads: Vec<Lead>,
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<TaskParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeResponse {
    pub insights: TaskResult,
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("request body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("request body must be a JSON object")]
    NotAnObject,
    #[error("`leads` must be a list or an object with a `leads` list")]
    InvalidLeads,
    #[error("lead #{index}: {message}")]
    InvalidLead { index: usize, message: String },
    #[error("`{field}` is invalid: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
}

impl AnalyzeRequest {
    pub fn new(leads: Vec<Lead>, task: Task) -> Self {
        Self {
            leads,
            task: task.as_str().to_string(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: TaskParams) -> Self {
        self.params = Some(params);
        self
    }

    pub fn from_slice(body: &[u8]) -> Result<Self, RequestError> {
        let value: Value = serde_json::from_slice(body)?;
        Self::from_value(value)
    }

    /// Accepts `leads` either as a list or wrapped as `{"leads": [...]}`; a missing
    /// task means the combined insights task.
    pub fn from_value(value: Value) -> Result<Self, RequestError> {
        let Value::Object(mut body) = value else {
            return Err(RequestError::NotAnObject);
        };

        let leads = normalize_leads(body.remove("leads"))?;
        let task = match body.remove("task") {
            None | Some(Value::Null) => Task::DEFAULT.to_string(),
            Some(Value::String(task)) => task,
            Some(_) => {
                return Err(RequestError::InvalidField {
                    field: "task",
                    message: "expected a string".to_string(),
                })
            }
        };
        let params = match body.remove("params") {
            None | Some(Value::Null) => None,
            Some(params) => Some(serde_json::from_value::<TaskParams>(params).map_err(
                |err| RequestError::InvalidField {
                    field: "params",
                    message: err.to_string(),
                },
            )?),
        };

        Ok(Self {
            leads,
            task,
            params,
        })
    }
}

fn normalize_leads(value: Option<Value>) -> Result<Vec<Lead>, RequestError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => parse_leads(items),
        Some(Value::Object(mut wrapper)) => match wrapper.remove("leads") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => parse_leads(items),
            Some(_) => Err(RequestError::InvalidLeads),
        },
        Some(_) => Err(RequestError::InvalidLeads),
    }
}

fn parse_leads(items: Vec<Value>) -> Result<Vec<Lead>, RequestError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => parse_lead(index, fields),
            _ => Err(RequestError::InvalidLead {
                index,
                message: "expected an object".to_string(),
            }),
        })
        .collect()
}

fn parse_lead(index: usize, fields: Map<String, Value>) -> Result<Lead, RequestError> {
    serde_json::from_value(Value::Object(fields)).map_err(|err| RequestError::InvalidLead {
        index,
        message: err.to_string(),
    })
}
