//! Marketing assistant backend: lead scoring, pitch drafting, campaign planning,
//! and market summaries with an optional LLM-backed path.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
