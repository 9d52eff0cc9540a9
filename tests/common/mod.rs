use async_trait::async_trait;
use persona_chat::chat::{ChatService, RateLimiter};
use persona_chat::diagnostics::UsageLog;
use persona_chat::llm::{GenerationResult, LlmError, TextGenerator};
use persona_chat::state::AppState;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What the fake provider does on every call
#[derive(Clone, Copy)]
pub enum FakeOutcome {
    Reply,
    MissingCredential,
    HttpFailure,
    Empty,
}

/// In-process stand-in for a hosted model
pub struct FakeGenerator {
    outcome: FakeOutcome,
    calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn new(outcome: FakeOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _prompt: &str) -> Result<GenerationResult, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            FakeOutcome::Reply => Ok(GenerationResult::new(
                "I'm Prem Shankar Choudhary from Vapi, Gujarat.",
                Some(json!({"promptTokenCount": 300, "totalTokenCount": 340})),
            )),
            FakeOutcome::MissingCredential => Err(LlmError::MissingCredential),
            FakeOutcome::HttpFailure => Err(LlmError::HttpError {
                status: 503,
                body: "secret upstream detail".to_string(),
            }),
            FakeOutcome::Empty => Err(LlmError::EmptyResponse),
        }
    }

    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        match self.outcome {
            FakeOutcome::MissingCredential => Err(LlmError::MissingCredential),
            _ => Ok(vec!["models/fake-model".to_string()]),
        }
    }

    fn model(&self) -> &str {
        "fake-model"
    }
}

/// App state around a fake provider
pub fn test_state(generator: Arc<FakeGenerator>, limit: u32, production: bool) -> Arc<AppState> {
    let chat = ChatService::new(generator, Arc::new(RateLimiter::new(limit)))
        .with_production(production);
    Arc::new(AppState::new(chat, Arc::new(UsageLog::default()), production))
}
