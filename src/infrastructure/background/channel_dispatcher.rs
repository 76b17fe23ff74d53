use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::application::ports::{BackgroundDispatcher, DispatchError, EnhancementRequest};

/// Hands background work to an in-process `EnhancementWorker` mailbox.
pub struct ChannelDispatcher {
    sender: mpsc::Sender<EnhancementRequest>,
}

impl ChannelDispatcher {
    pub fn new(sender: mpsc::Sender<EnhancementRequest>) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl BackgroundDispatcher for ChannelDispatcher {
    async fn schedule(&self, request: EnhancementRequest) -> Result<(), DispatchError> {
        let event_id = request.event_id;
        self.sender.try_send(request).map_err(|e| match e {
            TrySendError::Full(_) => DispatchError::QueueFull,
            TrySendError::Closed(_) => DispatchError::QueueClosed,
        })?;
        tracing::info!(event_id = %event_id, "Background enhancement queued");
        Ok(())
    }
}
