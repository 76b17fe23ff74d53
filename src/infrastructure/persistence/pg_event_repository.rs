use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{EventRepository, RepositoryError};
use crate::domain::{
    EnhancementKinds, EventId, EventStatus, ProcessingEvent, ProcessingKind, UserId,
};

pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::QueryFailed(e.to_string())
}

fn event_from_row(row: &PgRow) -> Result<ProcessingEvent, RepositoryError> {
    let status: String = row.try_get("status").map_err(query_failed)?;
    let kind: String = row.try_get("processing_kind").map_err(query_failed)?;
    let kinds: String = row.try_get("enhancement_kinds").map_err(query_failed)?;
    let duration_seconds: i32 = row.try_get("duration_seconds").map_err(query_failed)?;
    let size_bytes: i64 = row.try_get("size_bytes").map_err(query_failed)?;

    Ok(ProcessingEvent {
        id: EventId::from_uuid(row.try_get("id").map_err(query_failed)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(query_failed)?),
        received_at: row.try_get("received_at").map_err(query_failed)?,
        duration_seconds: u32::try_from(duration_seconds).unwrap_or_default(),
        size_bytes: u64::try_from(size_bytes).unwrap_or_default(),
        status: status
            .parse::<EventStatus>()
            .map_err(RepositoryError::CorruptRow)?,
        kind: kind
            .parse::<ProcessingKind>()
            .map_err(RepositoryError::CorruptRow)?,
        enhancement_kinds: EnhancementKinds::parse(&kinds).map_err(RepositoryError::CorruptRow)?,
        completed_at: row.try_get("completed_at").map_err(query_failed)?,
        error_message: row.try_get("error_message").map_err(query_failed)?,
    })
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[instrument(skip(self, event), fields(event_id = %event.id.as_uuid()))]
    async fn create(&self, event: &ProcessingEvent) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO processing_events
                (id, user_id, received_at, duration_seconds, size_bytes, status,
                 processing_kind, enhancement_kinds, completed_at, error_message)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(event.id.as_uuid())
        .bind(event.user_id.as_uuid())
        .bind(event.received_at)
        .bind(i32::try_from(event.duration_seconds).unwrap_or(i32::MAX))
        .bind(i64::try_from(event.size_bytes).unwrap_or(i64::MAX))
        .bind(event.status.as_str())
        .bind(event.kind.as_str())
        .bind(event.enhancement_kinds.serialize())
        .bind(event.completed_at)
        .bind(event.error_message.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepositoryError::ConstraintViolation(db.to_string())
            }
            other => query_failed(other),
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(event_id = %id.as_uuid()))]
    async fn get_by_id(&self, id: EventId) -> Result<Option<ProcessingEvent>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, received_at, duration_seconds, size_bytes, status,
                   processing_kind, enhancement_kinds, completed_at, error_message
            FROM processing_events
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_failed)?;

        row.as_ref().map(event_from_row).transpose()
    }

    #[instrument(skip(self, error_message), fields(event_id = %id.as_uuid(), status = %status))]
    async fn finalize(
        &self,
        id: EventId,
        status: EventStatus,
        error_message: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE processing_events
            SET status = $1, error_message = $2, completed_at = $3
            WHERE id = $4 AND status = 'processing'
            "#,
        )
        .bind(status.as_str())
        .bind(error_message)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(query_failed)?;

        if result.rows_affected() == 1 {
            return Ok(true);
        }

        match self.get_by_id(id).await? {
            Some(_) => Ok(false),
            None => Err(RepositoryError::NotFound(id.as_uuid().to_string())),
        }
    }
}
