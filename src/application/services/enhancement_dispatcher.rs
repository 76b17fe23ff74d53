use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::application::ports::{EnhancementRequest, EventRepository, LlmClient};
use crate::domain::{EnhancementKind, EventId, EventStatus};

use super::{EnhancementProfile, Notifier};

pub const DEFAULT_BACKGROUND_DEADLINE: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementJobResult {
    pub kind: EnhancementKind,
    pub outcome: Result<String, String>,
}

impl EnhancementJobResult {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn error(&self) -> Option<&str> {
        self.outcome.as_ref().err().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementSummary {
    pub event_id: EventId,
    pub status: EventStatus,
    pub error_message: Option<String>,
    pub results: Vec<EnhancementJobResult>,
}

impl EnhancementSummary {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

/// Folds per-kind results into the event's terminal status. One success is
/// enough for `completed`; failing kinds are still named.
pub fn aggregate(results: &[EnhancementJobResult]) -> (EventStatus, Option<String>) {
    let failures: Vec<String> = results
        .iter()
        .filter_map(|r| r.error().map(|e| format!("{}: {}", r.kind, e)))
        .collect();

    if failures.is_empty() {
        (EventStatus::Completed, None)
    } else if failures.len() < results.len() {
        (
            EventStatus::Completed,
            Some(format!("Some enhancements failed: {}", failures.join("; "))),
        )
    } else {
        (EventStatus::Failed, Some(failures.join("; ")))
    }
}

/// Runs the requested enhancements for one transcript under its own deadline.
#[derive(Clone)]
pub struct EnhancementDispatcher {
    llm_client: Arc<dyn LlmClient>,
    notifier: Arc<Notifier>,
    event_repository: Arc<dyn EventRepository>,
    deadline: Duration,
}

impl EnhancementDispatcher {
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        notifier: Arc<Notifier>,
        event_repository: Arc<dyn EventRepository>,
        deadline: Duration,
    ) -> Self {
        Self {
            llm_client,
            notifier,
            event_repository,
            deadline,
        }
    }

    /// Always leaves the event terminal. `Err` means the dispatcher itself
    /// failed, not that individual enhancements did.
    pub async fn run(
        &self,
        request: EnhancementRequest,
    ) -> Result<EnhancementSummary, DispatcherError> {
        let event_id = EventId::from_uuid(request.event_id);
        let span = tracing::info_span!(
            "enhancement_run",
            event_id = %request.event_id,
            filename = %request.filename,
            kinds = %request.enhancement_types.serialize(),
        );

        async move {
            if request.transcript.trim().is_empty() {
                let error = DispatcherError::EmptyTranscript;
                self.finalize(event_id, EventStatus::Failed, Some(&error.to_string()))
                    .await;
                return Err(error);
            }

            let worker = self.clone();
            let deadline_at = tokio::time::Instant::now() + self.deadline;
            let handle = tokio::spawn(
                async move { worker.run_jobs(&request, deadline_at).await }.in_current_span(),
            );

            let results = match handle.await {
                Ok(results) => results,
                Err(join_error) => {
                    let error = DispatcherError::Crashed(join_error.to_string());
                    tracing::error!(error = %error, "Enhancement dispatcher crashed");
                    self.finalize(event_id, EventStatus::Failed, Some(&error.to_string()))
                        .await;
                    return Err(error);
                }
            };

            let (status, error_message) = aggregate(&results);
            self.finalize(event_id, status, error_message.as_deref())
                .await;

            Ok(EnhancementSummary {
                event_id,
                status,
                error_message,
                results,
            })
        }
        .instrument(span)
        .await
    }

    /// Jobs are independent and run concurrently; the join is the barrier
    /// before anything is aggregated. Each job owns the shared deadline, so a
    /// hung kind never discards the others.
    async fn run_jobs(
        &self,
        request: &EnhancementRequest,
        deadline_at: tokio::time::Instant,
    ) -> Vec<EnhancementJobResult> {
        let jobs = request
            .enhancement_types
            .iter()
            .map(|kind| self.run_bounded_job(kind, request, deadline_at));
        futures::future::join_all(jobs).await
    }

    async fn run_bounded_job(
        &self,
        kind: EnhancementKind,
        request: &EnhancementRequest,
        deadline_at: tokio::time::Instant,
    ) -> EnhancementJobResult {
        match tokio::time::timeout_at(deadline_at, self.run_job(kind, request)).await {
            Ok(result) => result,
            Err(_) => {
                let error = format!("deadline of {}s exceeded", self.deadline.as_secs());
                tracing::error!(kind = %kind, error = %error, "Enhancement deadline exceeded");
                self.notifier
                    .notify_enhancement_failure(&request.user_email, kind, &request.filename)
                    .await;
                EnhancementJobResult {
                    kind,
                    outcome: Err(error),
                }
            }
        }
    }

    async fn run_job(&self, kind: EnhancementKind, request: &EnhancementRequest) -> EnhancementJobResult {
        let profile = EnhancementProfile::for_kind(kind);

        let generated = match self
            .llm_client
            .complete(&profile.request(&request.transcript))
            .await
        {
            Ok(raw) => {
                let content = profile.post_process(&raw);
                if content.is_empty() {
                    Err("model returned an empty response".to_string())
                } else {
                    Ok(content)
                }
            }
            Err(e) => Err(e.to_string()),
        };

        let outcome = match generated {
            Ok(content) => {
                let delivered = self
                    .notifier
                    .notify_enhancement(
                        &request.user_email,
                        kind,
                        &request.filename,
                        &content,
                        &request.transcript,
                    )
                    .await;
                if delivered {
                    Ok(content)
                } else {
                    Err("email delivery failed".to_string())
                }
            }
            Err(error) => {
                tracing::warn!(kind = %kind, error = %error, "Enhancement generation failed");
                self.notifier
                    .notify_enhancement_failure(&request.user_email, kind, &request.filename)
                    .await;
                Err(error)
            }
        };

        tracing::debug!(kind = %kind, success = outcome.is_ok(), "Enhancement job settled");
        EnhancementJobResult { kind, outcome }
    }

    async fn finalize(&self, event_id: EventId, status: EventStatus, error_message: Option<&str>) {
        match self
            .event_repository
            .finalize(event_id, status, error_message)
            .await
        {
            Ok(true) => tracing::info!(status = %status, "Processing event finalized"),
            Ok(false) => tracing::warn!(
                status = %status,
                "Processing event already terminal, status left unchanged"
            ),
            Err(e) => tracing::error!(error = %e, "Failed to finalize processing event"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatcherError {
    #[error("transcript is empty")]
    EmptyTranscript,
    #[error("enhancement dispatcher crashed: {0}")]
    Crashed(String),
}
