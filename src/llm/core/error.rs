//! Error types for the LLM layer

use thiserror::Error;

/// Errors that can occur when calling a text-generation provider
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API credential is configured
    #[error("Missing GOOGLE_API_KEY")]
    MissingCredential,

    /// Non-success HTTP status from the provider (after any fallback)
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// The request never produced an HTTP status (connect, DNS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// The provider answered but no usable text could be extracted
    #[error("Provider returned an empty response")]
    EmptyResponse,
}

impl LlmError {
    /// HTTP status carried by the error, if the provider produced one
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => LlmError::HttpError {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None => LlmError::Transport(err.to_string()),
        }
    }
}
