use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{RateLimitError, RateLimitStore, WindowCount};

/// Fixed-window counters in the `rate_limit_counters` table, shared by every
/// replica pointing at the same database.
pub struct PgRateLimitStore {
    pool: PgPool,
}

impl PgRateLimitStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateLimitStore for PgRateLimitStore {
    #[instrument(skip(self), fields(window_secs = window.as_secs()))]
    async fn hit(&self, key: &str, window: Duration) -> Result<WindowCount, RateLimitError> {
        let row = sqlx::query(
            r#"
            INSERT INTO rate_limit_counters AS c (key, window_start, hits)
            VALUES ($1, now(), 1)
            ON CONFLICT (key) DO UPDATE SET
                window_start = CASE
                    WHEN c.window_start + make_interval(secs => $2) <= now() THEN now()
                    ELSE c.window_start
                END,
                hits = CASE
                    WHEN c.window_start + make_interval(secs => $2) <= now() THEN 1
                    ELSE c.hits + 1
                END
            RETURNING
                hits,
                GREATEST(
                    EXTRACT(EPOCH FROM (window_start + make_interval(secs => $2) - now())),
                    0
                )::DOUBLE PRECISION AS resets_in_secs
            "#,
        )
        .bind(key)
        .bind(window.as_secs_f64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RateLimitError::StoreUnavailable(e.to_string()))?;

        let hits: i32 = row
            .try_get("hits")
            .map_err(|e| RateLimitError::StoreUnavailable(e.to_string()))?;
        let resets_in_secs: f64 = row
            .try_get("resets_in_secs")
            .map_err(|e| RateLimitError::StoreUnavailable(e.to_string()))?;

        Ok(WindowCount {
            count: u32::try_from(hits).unwrap_or_default(),
            resets_in: Duration::from_secs_f64(resets_in_secs.max(0.0)),
        })
    }
}
