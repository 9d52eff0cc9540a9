//! Shared application state handed to every handler

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use crate::chat::{ChatService, RateLimiter};
use crate::config::AppConfig;
use crate::diagnostics::UsageLog;
use crate::llm::{GeminiClient, LlmError};

const USAGE_CHANNEL_CAPACITY: usize = 64;

pub struct AppState {
    pub chat: ChatService,
    pub usage_log: Arc<UsageLog>,
    pub production: bool,
}

impl AppState {
    pub fn new(chat: ChatService, usage_log: Arc<UsageLog>, production: bool) -> Self {
        Self {
            chat,
            usage_log,
            production,
        }
    }

    /// Wire the Gemini client, rate limiter and usage log from configuration
    ///
    /// Spawns the rate-limit sweeper and the usage subscriber, so it must run
    /// inside a tokio runtime.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn build(config: AppConfig) -> Result<Arc<Self>, LlmError> {
        if config.api_key.is_none() {
            warn!("GOOGLE_API_KEY is not set; chat requests will fail until it is");
        }

        let (usage_sender, usage_receiver) = broadcast::channel(USAGE_CHANNEL_CAPACITY);
        let usage_log = Arc::new(UsageLog::default());
        usage_log.clone().subscribe(usage_receiver);

        let generator = GeminiClient::new(config.api_key, config.model)?
            .with_fallback(config.fallback_model)
            .with_base_url(config.api_base_url)
            .with_usage_events(usage_sender);

        let limiter = Arc::new(RateLimiter::with_window(
            config.rate_limit_per_minute,
            crate::chat::rate_limit::WINDOW,
            config.rate_limit_max_clients,
        ));
        limiter.clone().spawn_sweeper();

        let chat = ChatService::new(Arc::new(generator), limiter)
            .with_reply_policy(config.reply_policy)
            .with_production(config.production);

        Ok(Arc::new(Self::new(chat, usage_log, config.production)))
    }
}
