use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{EnhancementKinds, EventStatus, ProcessingKind, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// Persisted record of one voice note submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingEvent {
    pub id: EventId,
    pub user_id: UserId,
    pub received_at: DateTime<Utc>,
    pub duration_seconds: u32,
    pub size_bytes: u64,
    pub status: EventStatus,
    pub kind: ProcessingKind,
    pub enhancement_kinds: EnhancementKinds,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl ProcessingEvent {
    /// A successfully transcribed note. Stays `processing` while enhancements
    /// are pending, otherwise it is terminal right away.
    pub fn transcribed(
        user_id: UserId,
        kind: ProcessingKind,
        size_bytes: u64,
        duration_seconds: u32,
        enhancement_kinds: EnhancementKinds,
        received_at: DateTime<Utc>,
    ) -> Self {
        let pending = !enhancement_kinds.is_empty();
        Self {
            id: EventId::new(),
            user_id,
            received_at,
            duration_seconds,
            size_bytes,
            status: if pending {
                EventStatus::Processing
            } else {
                EventStatus::Completed
            },
            kind,
            enhancement_kinds,
            completed_at: if pending { None } else { Some(Utc::now()) },
            error_message: None,
        }
    }

    pub fn failed(
        user_id: UserId,
        kind: ProcessingKind,
        size_bytes: u64,
        error_message: String,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EventId::new(),
            user_id,
            received_at,
            duration_seconds: 0,
            size_bytes,
            status: EventStatus::Failed,
            kind,
            enhancement_kinds: EnhancementKinds::new(),
            completed_at: Some(Utc::now()),
            error_message: Some(error_message),
        }
    }
}
