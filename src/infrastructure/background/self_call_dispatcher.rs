use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::Instrument;

use crate::application::ports::{
    BackgroundDispatcher, DispatchError, EnhancementRequest, EventRepository,
};
use crate::domain::{EventId, EventStatus};
use crate::infrastructure::security::background_token;

pub const BACKGROUND_ENHANCE_PATH: &str = "/api/v1/background/enhance";

/// Schedules background work as a second, authenticated HTTP invocation of
/// this service. The call is detached; its lifetime is bounded by the
/// background deadline, never by the caller's. A call that is refused or
/// never reaches the service finalizes the event as `failed` itself.
pub struct SelfCallDispatcher {
    client: reqwest::Client,
    endpoint: String,
    bearer_token: String,
    deadline: Duration,
    event_repository: Arc<dyn EventRepository>,
}

impl SelfCallDispatcher {
    pub fn new(
        public_base_url: &str,
        shared_secret: &str,
        deadline: Duration,
        event_repository: Arc<dyn EventRepository>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}{}",
                public_base_url.trim_end_matches('/'),
                BACKGROUND_ENHANCE_PATH
            ),
            bearer_token: background_token(shared_secret),
            deadline,
            event_repository,
        }
    }
}

/// Outcome of the detached call, reduced to what decides finalization.
enum SelfCallOutcome {
    Accepted,
    /// The handler ran and has already written a terminal status.
    HandledWithError(u16),
    Rejected(String),
    /// Timed out after delivery; the handler enforces the same deadline.
    Abandoned,
}

async fn execute_self_call(client: reqwest::Client, request: reqwest::Request) -> SelfCallOutcome {
    match client.execute(request).await {
        Ok(response) if response.status().is_success() => SelfCallOutcome::Accepted,
        Ok(response) => {
            let status = response.status();
            if status.is_server_error() || status == reqwest::StatusCode::BAD_REQUEST {
                SelfCallOutcome::HandledWithError(status.as_u16())
            } else {
                SelfCallOutcome::Rejected(format!("background invocation rejected with {}", status))
            }
        }
        Err(e) if e.is_timeout() => SelfCallOutcome::Abandoned,
        Err(e) => SelfCallOutcome::Rejected(format!("background invocation failed: {}", e)),
    }
}

#[async_trait]
impl BackgroundDispatcher for SelfCallDispatcher {
    async fn schedule(&self, request: EnhancementRequest) -> Result<(), DispatchError> {
        let event_id = EventId::from_uuid(request.event_id);
        let pending = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.bearer_token)
            .timeout(self.deadline)
            .json(&request)
            .build()
            .map_err(|e| DispatchError::RequestFailed(e.to_string()))?;

        let client = self.client.clone();
        let event_repository = Arc::clone(&self.event_repository);
        tokio::spawn(
            async move {
                match execute_self_call(client, pending).await {
                    SelfCallOutcome::Accepted => {
                        tracing::debug!("Background invocation acknowledged");
                    }
                    SelfCallOutcome::HandledWithError(status) => {
                        tracing::warn!(status, "Background invocation finished with an error");
                    }
                    SelfCallOutcome::Abandoned => {
                        tracing::warn!("Background invocation outlived its deadline");
                    }
                    SelfCallOutcome::Rejected(reason) => {
                        tracing::error!(error = %reason, "Background invocation did not run");
                        if let Err(e) = event_repository
                            .finalize(event_id, EventStatus::Failed, Some(&reason))
                            .await
                        {
                            tracing::error!(error = %e, "Failed to finalize unscheduled processing event");
                        }
                    }
                }
            }
            .instrument(tracing::info_span!("background_self_call", event_id = %request.event_id)),
        );

        tracing::info!(event_id = %request.event_id, "Background enhancement scheduled");
        Ok(())
    }
}
