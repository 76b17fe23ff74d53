use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::application::ports::{RateLimitError, RateLimitStore, WindowCount};

struct Window {
    started_at: Instant,
    hits: u32,
}

/// Fixed-window counters kept in process memory. Counts are lost on restart and
/// are not shared between replicas.
#[derive(Default)]
pub struct InMemoryRateLimitStore {
    windows: DashMap<String, Window>,
}

impl InMemoryRateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowCount, RateLimitError> {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            hits: 0,
        });

        if now.duration_since(entry.started_at) >= window {
            entry.started_at = now;
            entry.hits = 0;
        }
        entry.hits = entry.hits.saturating_add(1);

        let elapsed = now.duration_since(entry.started_at);
        Ok(WindowCount {
            count: entry.hits,
            resets_in: window.saturating_sub(elapsed),
        })
    }
}
