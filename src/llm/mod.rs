//! LLM Abstraction Layer
//!
//! A small request/response interface over hosted text-generation models,
//! with a Gemini implementation.

pub mod core;
pub mod gemini;

// Re-export commonly used types
pub use core::{
    config::GenerationConfig,
    error::LlmError,
    provider::TextGenerator,
    types::{GenerationResult, UsageEvent},
};

pub use gemini::GeminiClient;
