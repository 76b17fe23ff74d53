use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, instrument, warn};

use crate::application::ports::RepositoryError;

const CONNECT_ATTEMPTS: u32 = 5;
const FIRST_RETRY_DELAY: Duration = Duration::from_millis(500);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connects with doubling back-off so the service can start alongside its
/// database.
#[instrument(skip(url))]
pub async fn create_pool(url: &str, max_connections: u32) -> Result<PgPool, RepositoryError> {
    let options = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT);

    let mut attempt = 1;
    let mut delay = FIRST_RETRY_DELAY;
    loop {
        match options.clone().connect(url).await {
            Ok(pool) => {
                info!(attempt, max_connections, "Database pool ready");
                return Ok(pool);
            }
            Err(e) if attempt >= CONNECT_ATTEMPTS => {
                return Err(RepositoryError::Unavailable(format!(
                    "gave up after {} attempts: {}",
                    attempt, e
                )));
            }
            Err(e) => {
                warn!(error = %e, attempt, retry_in_ms = delay.as_millis() as u64, "Database not reachable yet");
                tokio::time::sleep(delay).await;
                delay *= 2;
                attempt += 1;
            }
        }
    }
}

/// Applies the embedded `users`, `processing_events` and
/// `rate_limit_counters` migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
    sqlx::migrate!()
        .run(pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(format!("migrations: {}", e)))?;
    info!("Schema is up to date");
    Ok(())
}
