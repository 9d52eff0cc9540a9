// HTTP Server modules
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

// Chat pipeline: rate limit, validate, compose, generate
pub mod chat;
pub mod config;
pub mod diagnostics;
pub mod error;

// LLM abstraction layer
pub mod llm;
