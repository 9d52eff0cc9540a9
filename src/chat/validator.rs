//! Inbound message validation

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Longest accepted message, in characters, after trimming
pub const MAX_MESSAGE_CHARS: usize = 300;

/// Tokens used to try to override the persona prompt
static INJECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?system>|SYSTEM_PROMPT|--system|#system")
        .expect("injection pattern is a valid regex")
});

/// Why a message was rejected; the `Display` text is sent to the caller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid request")]
    InvalidRequest,
    #[error("Message must be a string")]
    NotAString,
    #[error("Message cannot be empty")]
    Empty,
    #[error("Message too long (max 300 characters)")]
    TooLong,
    #[error("Invalid content in message")]
    InvalidContent,
}

/// Check a decoded request body and return the trimmed message
///
/// Rules run in order and the first failure wins.
pub fn validate_message(body: &Value) -> Result<String, ValidationError> {
    let Value::Object(fields) = body else {
        return Err(ValidationError::InvalidRequest);
    };

    let Some(Value::String(message)) = fields.get("message") else {
        return Err(ValidationError::NotAString);
    };

    let trimmed = message.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ValidationError::TooLong);
    }
    if INJECTION_PATTERN.is_match(trimmed) {
        return Err(ValidationError::InvalidContent);
    }

    Ok(trimmed.to_string())
}
