//! Chat request orchestration
//!
//! One inbound request runs: rate limit, validate, compose, generate, then
//! package the reply. Nothing here is retained between requests except the
//! rate limiter's windows.

pub mod persona;
pub mod prompt;
pub mod rate_limit;
pub mod reply;
pub mod validator;

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::error::ChatError;
use crate::llm::TextGenerator;
use crate::models::{history_from_body, ChatReply};

pub use persona::Persona;
pub use prompt::compose_prompt;
pub use rate_limit::{client_key, RateDecision, RateLimiter};
pub use reply::ReplyPolicy;
pub use validator::{validate_message, ValidationError};

/// Runs the chat pipeline against a text-generation provider
pub struct ChatService {
    generator: Arc<dyn TextGenerator>,
    limiter: Arc<RateLimiter>,
    persona: Persona,
    reply_policy: ReplyPolicy,
    /// Production hides usage metadata from replies
    production: bool,
}

impl ChatService {
    pub fn new(generator: Arc<dyn TextGenerator>, limiter: Arc<RateLimiter>) -> Self {
        Self {
            generator,
            limiter,
            persona: Persona::default(),
            reply_policy: ReplyPolicy::default(),
            production: false,
        }
    }

    pub fn with_persona(mut self, persona: Persona) -> Self {
        self.persona = persona;
        self
    }

    pub fn with_reply_policy(mut self, reply_policy: ReplyPolicy) -> Self {
        self.reply_policy = reply_policy;
        self
    }

    pub fn with_production(mut self, production: bool) -> Self {
        self.production = production;
        self
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    /// Handle one chat request from `client` with the raw request body
    ///
    /// # Errors
    /// See `ChatError` for the outcome taxonomy. Rate limiting and validation
    /// happen before any provider call.
    pub async fn handle(&self, client: &str, body: &[u8]) -> Result<ChatReply, ChatError> {
        self.admit(client)?;
        self.respond(client, body).await
    }

    /// Count one request from `client` against its rate-limit window
    ///
    /// # Errors
    /// `ChatError::RateLimited` once the window's budget is spent.
    pub fn admit(&self, client: &str) -> Result<(), ChatError> {
        if self.limiter.check(client) == RateDecision::Deny {
            debug!(client, "rate limited");
            return Err(ChatError::RateLimited {
                client: client.to_string(),
            });
        }
        Ok(())
    }

    /// Validate, compose and generate for a request that was already admitted
    pub async fn respond(&self, client: &str, body: &[u8]) -> Result<ChatReply, ChatError> {
        // Undecodable bodies fail validation as "Invalid request"
        let body: Value = serde_json::from_slice(body).unwrap_or(Value::Null);
        let message = validate_message(&body).inspect_err(|reason| {
            debug!(client, %reason, "rejected message");
        })?;

        let history = history_from_body(&body);
        let prompt = compose_prompt(&self.persona, &history, &message);

        let result = self.generator.generate(&prompt).await?;
        let reply = self.reply_policy.apply(&result.text);
        let usage = (!self.production).then(|| result.usage.unwrap_or(Value::Null));

        Ok(ChatReply { reply, usage })
    }
}
