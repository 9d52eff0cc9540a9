//! Gemini client implementation

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::llm::core::{
    config::GenerationConfig,
    error::LlmError,
    provider::TextGenerator,
    types::{GenerationResult, UsageEvent},
};

use super::mapper::{from_gemini_response, to_gemini_request};
use super::types::{GenerateContentRequest, ListModelsResponse, ResponseShape};

/// Public Generative Language API, models collection
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1/models";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Result of calling a single model once
#[derive(Debug)]
enum ModelAttempt {
    Success(ResponseShape),
    /// Non-success HTTP status; eligible for the fallback model
    Failed { status: u16, body: String },
}

impl ModelAttempt {
    fn failed_status(&self) -> Option<u16> {
        match self {
            ModelAttempt::Failed { status, .. } => Some(*status),
            ModelAttempt::Success(_) => None,
        }
    }
}

/// Client for the Gemini `generateContent` REST endpoint
pub struct GeminiClient {
    /// HTTP client for making requests
    http_client: Client,
    /// API key; checked per call so a missing key degrades requests, not startup
    api_key: Option<SecretString>,
    /// Models collection URL, without trailing slash
    base_url: String,
    /// Primary model
    model: String,
    /// Tried once when the primary model answers with a non-success status
    fallback_model: Option<String>,
    config: GenerationConfig,
    usage_events: Option<broadcast::Sender<UsageEvent>>,
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: Option<SecretString>, model: impl Into<String>) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .map_err(|e| LlmError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        let model: String = model.into();

        Ok(Self {
            http_client,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: normalize_model(&model),
            fallback_model: None,
            config: GenerationConfig::default(),
            usage_events: None,
        })
    }

    /// Set the fallback model
    pub fn with_fallback(mut self, fallback_model: Option<String>) -> Self {
        self.fallback_model = fallback_model
            .map(|m| normalize_model(&m))
            .filter(|m| !m.is_empty());
        self
    }

    /// Point the client at a different models collection (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.config = config;
        self
    }

    /// Publish a `UsageEvent` on this channel after every successful call
    pub fn with_usage_events(mut self, sender: broadcast::Sender<UsageEvent>) -> Self {
        self.usage_events = Some(sender);
        self
    }

    /// Fallback model, unless it is unset or the same as the primary
    pub fn fallback_model(&self) -> Option<&str> {
        self.fallback_model
            .as_deref()
            .filter(|fallback| *fallback != self.model)
    }

    /// Build the endpoint URL for a model
    fn build_endpoint_url(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, model)
    }

    fn api_key(&self) -> Result<&SecretString, LlmError> {
        self.api_key.as_ref().ok_or(LlmError::MissingCredential)
    }

    /// Call one model once
    async fn call_model(
        &self,
        api_key: &SecretString,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<ModelAttempt, LlmError> {
        let url = self.build_endpoint_url(model);
        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, api_key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            return Ok(ModelAttempt::Failed {
                status: status.as_u16(),
                body: raw,
            });
        }

        let shape: ResponseShape = serde_json::from_str(&raw).map_err(|e| {
            LlmError::SerializationError(format!("Failed to parse Gemini response JSON: {}", e))
        })?;
        Ok(ModelAttempt::Success(shape))
    }

    fn publish_usage(&self, model: &str, result: &GenerationResult) {
        if let Some(sender) = &self.usage_events {
            if sender.send(UsageEvent::new(model, result.usage.clone())).is_err() {
                debug!("no usage subscribers");
            }
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, LlmError> {
        let api_key = self.api_key()?;
        let request = to_gemini_request(prompt, &self.config);

        let mut served_by = self.model.as_str();
        let mut attempt = self.call_model(api_key, served_by, &request).await?;

        if let Some(status) = attempt.failed_status() {
            warn!(model = %self.model, status, "Gemini model failed");
            if let Some(fallback) = self.fallback_model() {
                warn!(fallback, "Retrying with fallback model");
                served_by = fallback;
                attempt = self.call_model(api_key, fallback, &request).await?;
            }
        }

        let shape = match attempt {
            ModelAttempt::Success(shape) => shape,
            ModelAttempt::Failed { status, body } => {
                return Err(LlmError::HttpError { status, body });
            }
        };

        let result = from_gemini_response(shape)?;
        debug!(model = served_by, chars = result.text.len(), "Gemini reply extracted");
        self.publish_usage(served_by, &result);
        Ok(result)
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let api_key = self.api_key()?;
        let response = self
            .http_client
            .get(&self.base_url)
            .header(API_KEY_HEADER, api_key.expose_secret())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        let list: ListModelsResponse = response.json().await?;
        Ok(list.models.into_iter().map(|m| m.name).collect())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Accept both `gemini-2.0-flash` and `models/gemini-2.0-flash`
fn normalize_model(model: &str) -> String {
    model.trim().trim_start_matches("models/").to_string()
}
