use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::RateLimitStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            max_requests: 30,
            window: Duration::from_secs(3600),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Fixed-window limiter over an injectable counter store.
pub struct RateLimiter {
    store: Arc<dyn RateLimitStore>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn RateLimitStore>, policy: RateLimitPolicy) -> Self {
        Self { store, policy }
    }

    /// Counts one request for `identifier`. A store outage lets the request
    /// through; limits here are best effort.
    pub async fn check(&self, identifier: &str) -> RateLimitDecision {
        match self.store.hit(identifier, self.policy.window).await {
            Ok(window) if window.count > self.policy.max_requests => {
                tracing::warn!(
                    identifier = %identifier,
                    count = window.count,
                    limit = self.policy.max_requests,
                    "Rate limit exceeded"
                );
                RateLimitDecision::Limited {
                    retry_after: window.resets_in,
                }
            }
            Ok(window) => RateLimitDecision::Allowed {
                remaining: self.policy.max_requests - window.count,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Rate limit store unavailable, allowing request");
                RateLimitDecision::Allowed {
                    remaining: self.policy.max_requests,
                }
            }
        }
    }
}
