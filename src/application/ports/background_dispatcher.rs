use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::EnhancementKinds;

/// Everything the background invocation needs; the transcript travels with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementRequest {
    pub event_id: Uuid,
    pub enhancement_types: EnhancementKinds,
    pub filename: String,
    pub transcript: String,
    pub user_email: String,
}

#[async_trait]
pub trait BackgroundDispatcher: Send + Sync {
    /// Schedules the work and returns once scheduling is confirmed.
    async fn schedule(&self, request: EnhancementRequest) -> Result<(), DispatchError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("background queue unavailable")]
    QueueClosed,
    #[error("background queue full")]
    QueueFull,
    #[error("self call failed: {0}")]
    RequestFailed(String),
}
