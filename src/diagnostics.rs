//! Recent provider usage, kept for the dev-only inspector
//!
//! The provider publishes `UsageEvent`s on a broadcast channel; `UsageLog`
//! subscribes and keeps a small ring buffer instead of a single global slot.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::llm::UsageEvent;
use crate::models::UsageReport;

pub const DEFAULT_USAGE_CAPACITY: usize = 16;

#[derive(Debug)]
pub struct UsageLog {
    events: Mutex<VecDeque<UsageEvent>>,
    capacity: usize,
}

impl UsageLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn record(&self, event: UsageEvent) {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub fn latest(&self) -> Option<UsageEvent> {
        let events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.back().cloned()
    }

    /// Snapshot for `GET /api/dev/usage`, newest last
    pub fn report(&self) -> UsageReport {
        let events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        UsageReport {
            last: events.back().and_then(|event| event.usage.clone()),
            recent: events.iter().cloned().collect(),
        }
    }

    /// Feed this log from a provider's usage channel until the sender is dropped
    pub fn subscribe(self: Arc<Self>, mut receiver: broadcast::Receiver<UsageEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => self.record(event),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "usage log fell behind");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}

impl Default for UsageLog {
    fn default() -> Self {
        Self::new(DEFAULT_USAGE_CAPACITY)
    }
}
