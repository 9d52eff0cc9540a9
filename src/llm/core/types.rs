//! Core types for the LLM abstraction layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one successful generation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Assistant text, trimmed and never empty
    pub text: String,
    /// Provider metering data, passed through as-is when present
    pub usage: Option<Value>,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>, usage: Option<Value>) -> Self {
        Self {
            text: text.into(),
            usage,
        }
    }
}

/// Published by a provider after every successful call
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageEvent {
    /// Model that actually served the request (primary or fallback)
    pub model: String,
    pub usage: Option<Value>,
    pub recorded_at: DateTime<Utc>,
}

impl UsageEvent {
    pub fn new(model: impl Into<String>, usage: Option<Value>) -> Self {
        Self {
            model: model.into(),
            usage,
            recorded_at: Utc::now(),
        }
    }
}
