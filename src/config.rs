//! Environment-based configuration

use std::collections::HashMap;
use std::net::SocketAddr;

use secrecy::SecretString;
use tracing::warn;

use crate::chat::rate_limit::{DEFAULT_LIMIT, DEFAULT_MAX_CLIENTS};
use crate::chat::ReplyPolicy;
use crate::llm::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug)]
pub struct AppConfig {
    /// Missing key is not fatal; each chat request answers 500 instead
    pub api_key: Option<SecretString>,
    pub model: String,
    pub fallback_model: Option<String>,
    pub api_base_url: String,
    pub rate_limit_per_minute: u32,
    pub rate_limit_max_clients: usize,
    /// Hides usage metadata and closes the dev endpoints
    pub production: bool,
    pub reply_policy: ReplyPolicy,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars().collect())
    }

    /// Build from an explicit variable map; unset or blank values use defaults
    pub fn from_vars(vars: HashMap<String, String>) -> Self {
        let get = |name: &str| {
            vars.get(name)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let rate_limit_per_minute = match get("RATE_LIMIT_PER_MINUTE") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    warn!(value = %raw, default = DEFAULT_LIMIT, "invalid RATE_LIMIT_PER_MINUTE");
                    DEFAULT_LIMIT
                }
            },
            None => DEFAULT_LIMIT,
        };

        let rate_limit_max_clients = match get("RATE_LIMIT_MAX_CLIENTS") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(max) if max > 0 => max,
                _ => {
                    warn!(value = %raw, default = DEFAULT_MAX_CLIENTS, "invalid RATE_LIMIT_MAX_CLIENTS");
                    DEFAULT_MAX_CLIENTS
                }
            },
            None => DEFAULT_MAX_CLIENTS,
        };

        let production = get("APP_ENV")
            .or_else(|| get("NODE_ENV"))
            .is_some_and(|env| env.eq_ignore_ascii_case("production"));

        let max_sentences = get("REPLY_MAX_SENTENCES").and_then(|raw| match raw.parse::<usize>() {
            Ok(max) => Some(max),
            Err(e) => {
                warn!(value = %raw, error = %e, "invalid REPLY_MAX_SENTENCES, replying in full");
                None
            }
        });

        let bind_addr = get("BIND_ADDR")
            .and_then(|raw| match raw.parse::<SocketAddr>() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    warn!(value = %raw, error = %e, "invalid BIND_ADDR");
                    None
                }
            })
            .unwrap_or_else(default_bind_addr);

        Self {
            api_key: get("GOOGLE_API_KEY").map(SecretString::from),
            model: get("GOOGLE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            fallback_model: get("GOOGLE_MODEL_FALLBACK").or_else(|| get("FALLBACK_MODEL")),
            api_base_url: get("GOOGLE_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            rate_limit_per_minute,
            rate_limit_max_clients,
            production,
            reply_policy: ReplyPolicy::from_max_sentences(max_sentences),
            bind_addr,
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 3030))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_vars(HashMap::new())
    }
}
