// Data structures for requests, replies and conversation turns

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::UsageEvent;

// Chat role as the composer sees it
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

// One prior turn supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }
}

/// Read the optional `history` array of a chat request body
///
/// Entries look like `{role: "user"|"model", parts: [{text}]}`. Anything other
/// than `"user"` is an assistant turn, and a missing text becomes an empty
/// line. A missing or non-array `history` yields no turns.
pub fn history_from_body(body: &Value) -> Vec<ChatTurn> {
    let Some(entries) = body.get("history").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| {
            let text = entry
                .pointer("/parts/0/text")
                .and_then(Value::as_str)
                .unwrap_or_default();
            match entry.get("role").and_then(Value::as_str) {
                Some("user") => ChatTurn::user(text),
                _ => ChatTurn::assistant(text),
            }
        })
        .collect()
}

// Successful chat reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Value>,
}

// Every non-200 body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// GET /api/dev/usage
#[derive(Debug, Clone, Serialize)]
pub struct UsageReport {
    pub last: Option<Value>,
    pub recent: Vec<UsageEvent>,
}

// GET /api/dev/model
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModelCheck {
    pub configured: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_models: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_configured: Option<bool>,
}
