use std::sync::Arc;
use std::time::Duration;

use voxmail::application::ports::{RateLimitError, RateLimitStore, WindowCount};
use voxmail::application::services::{RateLimitDecision, RateLimitPolicy, RateLimiter};
use voxmail::infrastructure::rate_limit::InMemoryRateLimitStore;

struct UnavailableStore;

#[async_trait::async_trait]
impl RateLimitStore for UnavailableStore {
    async fn hit(&self, _key: &str, _window: Duration) -> Result<WindowCount, RateLimitError> {
        Err(RateLimitError::StoreUnavailable("connection refused".to_string()))
    }
}

fn limiter(store: impl RateLimitStore + 'static, max_requests: u32) -> RateLimiter {
    RateLimiter::new(
        Arc::new(store),
        RateLimitPolicy {
            max_requests,
            window: Duration::from_secs(60),
        },
    )
}

#[tokio::test]
async fn given_requests_within_limit_when_checking_then_allowed_with_remaining_count() {
    let limiter = limiter(InMemoryRateLimitStore::new(), 3);

    assert_eq!(limiter.check("api:a").await, RateLimitDecision::Allowed { remaining: 2 });
    assert_eq!(limiter.check("api:a").await, RateLimitDecision::Allowed { remaining: 1 });
    assert_eq!(limiter.check("api:a").await, RateLimitDecision::Allowed { remaining: 0 });
}

#[tokio::test(start_paused = true)]
async fn given_limit_exhausted_when_checking_then_limited_until_window_resets() {
    let limiter = limiter(InMemoryRateLimitStore::new(), 2);
    limiter.check("api:a").await;
    limiter.check("api:a").await;

    tokio::time::advance(Duration::from_secs(20)).await;
    let decision = limiter.check("api:a").await;
    assert_eq!(
        decision,
        RateLimitDecision::Limited {
            retry_after: Duration::from_secs(40)
        }
    );

    tokio::time::advance(Duration::from_secs(40)).await;
    assert!(matches!(
        limiter.check("api:a").await,
        RateLimitDecision::Allowed { .. }
    ));
}

#[tokio::test]
async fn given_different_identifiers_when_checking_then_counted_separately() {
    let limiter = limiter(InMemoryRateLimitStore::new(), 1);

    assert!(matches!(limiter.check("api:a").await, RateLimitDecision::Allowed { .. }));
    assert!(matches!(limiter.check("api:b").await, RateLimitDecision::Allowed { .. }));
    assert!(matches!(limiter.check("api:a").await, RateLimitDecision::Limited { .. }));
}

#[tokio::test]
async fn given_store_unavailable_when_checking_then_request_is_allowed() {
    let limiter = limiter(UnavailableStore, 1);

    assert!(matches!(limiter.check("api:a").await, RateLimitDecision::Allowed { .. }));
}

#[test]
fn given_default_policy_when_created_then_thirty_per_hour() {
    let policy = RateLimitPolicy::default();
    assert_eq!(policy.max_requests, 30);
    assert_eq!(policy.window, Duration::from_secs(3600));
}
