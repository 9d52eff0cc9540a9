//! Provider trait for text-generation backends

use async_trait::async_trait;

use super::{error::LlmError, types::GenerationResult};

/// Main interface that all text-generation providers must satisfy
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply for a fully composed prompt
    ///
    /// This is a single request/response round trip; implementations may try
    /// one fallback model but never retry beyond that.
    ///
    /// # Errors
    /// Returns `LlmError::MissingCredential` when no API key is configured,
    /// `LlmError::EmptyResponse` when the provider produced no usable text, and
    /// other variants for transport or HTTP failures.
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, LlmError>;

    /// List the model names the provider currently offers
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;

    /// Primary model identifier this provider is configured with
    fn model(&self) -> &str;
}
