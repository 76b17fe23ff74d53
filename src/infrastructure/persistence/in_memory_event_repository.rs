use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::application::ports::{EventRepository, RepositoryError};
use crate::domain::{EventId, EventStatus, ProcessingEvent};

/// Process-local event store. Finalization follows the same single-transition
/// rule as the Postgres adapter.
#[derive(Default)]
pub struct InMemoryEventRepository {
    events: DashMap<Uuid, ProcessingEvent>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn snapshot(&self) -> Vec<ProcessingEvent> {
        let mut events: Vec<ProcessingEvent> =
            self.events.iter().map(|entry| entry.value().clone()).collect();
        events.sort_by_key(|e| e.received_at);
        events
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, event: &ProcessingEvent) -> Result<(), RepositoryError> {
        let id = event.id.as_uuid();
        if self.events.contains_key(&id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "event {} already exists",
                id
            )));
        }
        self.events.insert(id, event.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: EventId) -> Result<Option<ProcessingEvent>, RepositoryError> {
        Ok(self.events.get(&id.as_uuid()).map(|e| e.value().clone()))
    }

    async fn finalize(
        &self,
        id: EventId,
        status: EventStatus,
        error_message: Option<&str>,
    ) -> Result<bool, RepositoryError> {
        let mut entry = self
            .events
            .get_mut(&id.as_uuid())
            .ok_or_else(|| RepositoryError::NotFound(id.as_uuid().to_string()))?;

        if entry.status.is_terminal() {
            return Ok(false);
        }

        entry.status = status;
        entry.error_message = error_message.map(str::to_string);
        entry.completed_at = Some(Utc::now());
        Ok(true)
    }
}
