//! Request-level error taxonomy and its HTTP mapping

use thiserror::Error;
use warp::http::StatusCode;

use crate::chat::validator::ValidationError;
use crate::llm::LlmError;

pub const RATE_LIMITED_MESSAGE: &str = "Rate limit exceeded";
pub const MISCONFIGURED_MESSAGE: &str =
    "Server misconfigured. Please set GOOGLE_API_KEY in environment variables.";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to generate response";

/// Everything that can end a chat request early
#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("rate limit exceeded for {client}")]
    RateLimited { client: String },

    /// Operator error; never the caller's fault
    #[error("configuration error: {0}")]
    Configuration(LlmError),

    /// Provider failed after any fallback, or returned nothing usable
    #[error("upstream error: {0}")]
    Upstream(LlmError),
}

impl From<LlmError> for ChatError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => ChatError::Configuration(err),
            other => ChatError::Upstream(other),
        }
    }
}

impl ChatError {
    pub fn status(&self) -> StatusCode {
        match self {
            ChatError::Validation(_) => StatusCode::BAD_REQUEST,
            ChatError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ChatError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ChatError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Text safe to show the caller; provider detail stays server-side
    pub fn public_message(&self) -> String {
        match self {
            ChatError::Validation(reason) => reason.to_string(),
            ChatError::RateLimited { .. } => RATE_LIMITED_MESSAGE.to_string(),
            ChatError::Configuration(_) => MISCONFIGURED_MESSAGE.to_string(),
            ChatError::Upstream(_) => UPSTREAM_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Only provider and configuration failures are worth logging
    pub fn is_server_fault(&self) -> bool {
        matches!(self, ChatError::Configuration(_) | ChatError::Upstream(_))
    }
}
