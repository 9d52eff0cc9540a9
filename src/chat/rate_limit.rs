//! Per-client fixed-window rate limiting

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;

/// Length of one counting window
pub const WINDOW: Duration = Duration::from_millis(60_000);

/// Requests allowed per client per window unless configured otherwise
pub const DEFAULT_LIMIT: u32 = 30;

/// Upper bound on distinct client keys tracked at once
pub const DEFAULT_MAX_CLIENTS: usize = 10_000;

/// Bucket shared by every client that sent no forwarding headers
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allow,
    Deny,
}

/// Window state for one client key
#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    window_start: Instant,
    request_count: u32,
}

/// Process-wide fixed-window counter keyed by client identifier
///
/// The increment-and-compare runs under the map's shard write lock, so two
/// concurrent requests from one client can never both pass on a stale count.
#[derive(Debug)]
pub struct RateLimiter {
    clients: DashMap<String, ClientWindow>,
    limit: u32,
    window: Duration,
    max_clients: usize,
}

impl RateLimiter {
    pub fn new(limit: u32) -> Self {
        Self::with_window(limit, WINDOW, DEFAULT_MAX_CLIENTS)
    }

    pub fn with_window(limit: u32, window: Duration, max_clients: usize) -> Self {
        Self {
            clients: DashMap::new(),
            limit,
            window,
            max_clients: max_clients.max(1),
        }
    }

    /// Number of client keys currently tracked
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }

    pub fn check(&self, client_key: &str) -> RateDecision {
        self.check_at(client_key, Instant::now())
    }

    /// Count one request from `client_key` arriving at `now`
    ///
    /// A denied request still increments the counter.
    pub fn check_at(&self, client_key: &str, now: Instant) -> RateDecision {
        if !self.clients.contains_key(client_key) && self.clients.len() >= self.max_clients {
            self.make_room(now);
        }

        let mut entry = self
            .clients
            .entry(client_key.to_string())
            .or_insert(ClientWindow {
                window_start: now,
                request_count: 0,
            });

        let elapsed = now.saturating_duration_since(entry.window_start);
        if entry.request_count == 0 || elapsed > self.window {
            *entry = ClientWindow {
                window_start: now,
                request_count: 1,
            };
            return RateDecision::Allow;
        }

        entry.request_count = entry.request_count.saturating_add(1);
        if entry.request_count > self.limit {
            RateDecision::Deny
        } else {
            RateDecision::Allow
        }
    }

    /// Drop windows that ended more than one window length ago
    ///
    /// Returns how many client keys were removed.
    pub fn sweep(&self, now: Instant) -> usize {
        let before = self.clients.len();
        let horizon = self.window * 2;
        self.clients
            .retain(|_, state| now.saturating_duration_since(state.window_start) < horizon);
        before.saturating_sub(self.clients.len())
    }

    /// Free a slot for a new client key: sweep first, then evict the oldest window
    fn make_room(&self, now: Instant) {
        let swept = self.sweep(now);
        if swept > 0 {
            debug!(swept, "evicted stale rate-limit windows");
        }
        if self.clients.len() < self.max_clients {
            return;
        }

        let oldest = self
            .clients
            .iter()
            .min_by_key(|entry| entry.value().window_start)
            .map(|entry| entry.key().clone());
        if let Some(key) = oldest {
            self.clients.remove(&key);
            debug!(client = %key, "evicted oldest rate-limit window at capacity");
        }
    }

    /// Run `sweep` once per window for the life of the process
    pub fn spawn_sweeper(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.window);
            loop {
                ticker.tick().await;
                let removed = self.sweep(Instant::now());
                if removed > 0 {
                    debug!(removed, remaining = self.tracked_clients(), "rate-limit sweep");
                }
            }
        })
    }
}

/// Derive the rate-limit key from proxy headers
///
/// First entry of `X-Forwarded-For`, else `X-Real-IP`, else the shared
/// `unknown` bucket.
pub fn client_key(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    if let Some(forwarded) = forwarded_for.filter(|value| !value.is_empty()) {
        return forwarded.split(',').next().unwrap_or_default().trim().to_string();
    }
    if let Some(real) = real_ip.filter(|value| !value.is_empty()) {
        return real.to_string();
    }
    UNKNOWN_CLIENT.to_string()
}
