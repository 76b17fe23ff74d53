use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Records one hit for `key` in its current fixed window and returns the
    /// hit count so far together with the time left in that window.
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowCount, RateLimitError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowCount {
    pub count: u32,
    pub resets_in: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limit store unavailable: {0}")]
    StoreUnavailable(String),
}
