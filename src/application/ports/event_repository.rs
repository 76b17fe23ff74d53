use async_trait::async_trait;

use crate::domain::{EventId, EventStatus, ProcessingEvent};

use super::RepositoryError;

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &ProcessingEvent) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: EventId) -> Result<Option<ProcessingEvent>, RepositoryError>;

    /// Moves a `processing` event to a terminal status. Returns `false` when the
    /// event was already terminal; terminal rows are never rewritten.
    async fn finalize(
        &self,
        id: EventId,
        status: EventStatus,
        error_message: Option<&str>,
    ) -> Result<bool, RepositoryError>;
}
