use tokio::sync::mpsc;

use crate::application::ports::EnhancementRequest;

use super::EnhancementDispatcher;

/// In-process mailbox for background enhancement. Each request runs as its
/// own task so one slow transcript never holds up the next.
pub struct EnhancementWorker {
    receiver: mpsc::Receiver<EnhancementRequest>,
    dispatcher: EnhancementDispatcher,
}

impl EnhancementWorker {
    pub fn new(
        receiver: mpsc::Receiver<EnhancementRequest>,
        dispatcher: EnhancementDispatcher,
    ) -> Self {
        Self {
            receiver,
            dispatcher,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Enhancement worker started");
        while let Some(request) = self.receiver.recv().await {
            let dispatcher = self.dispatcher.clone();
            tokio::spawn(async move {
                let event_id = request.event_id;
                match dispatcher.run(request).await {
                    Ok(summary) => tracing::info!(
                        event_id = %event_id,
                        succeeded = summary.succeeded(),
                        failed = summary.failed(),
                        "Background enhancement finished"
                    ),
                    Err(e) => tracing::error!(
                        event_id = %event_id,
                        error = %e,
                        "Background enhancement failed"
                    ),
                }
            });
        }
        tracing::info!("Enhancement worker stopped: channel closed");
    }
}
