use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{BackgroundDispatcher, EnhancementRequest, EventRepository};
use crate::domain::{
    AudioReference, ErrorKind, EventId, EventStatus, ProcessingEvent, ProcessingKind,
};

use super::{
    AudioDownloader, AudioValidator, Notifier, PhaseMetrics, PhaseTracker, PipelineError,
    ProcessingContext, Transcriber, Transcript,
};

pub const DEFAULT_OUTER_DEADLINE: Duration = Duration::from_secs(60);
pub const DEFAULT_SLA_WARNING: Duration = Duration::from_secs(50);

/// What the user received when the run succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub event_id: EventId,
    pub transcript: String,
    pub event_persisted: bool,
    pub notified: bool,
    pub enhancements_scheduled: bool,
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub metrics: PhaseMetrics,
    pub result: Result<Delivery, PipelineError>,
}

/// validate → download → transcribe → persist → notify, once, under one
/// outer deadline. Exactly one outcome email is attempted per run.
pub struct PrimaryPipeline {
    validator: AudioValidator,
    downloader: AudioDownloader,
    transcriber: Transcriber,
    event_repository: Arc<dyn EventRepository>,
    notifier: Arc<Notifier>,
    background: Arc<dyn BackgroundDispatcher>,
    sla_warning: Duration,
}

impl PrimaryPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        validator: AudioValidator,
        downloader: AudioDownloader,
        transcriber: Transcriber,
        event_repository: Arc<dyn EventRepository>,
        notifier: Arc<Notifier>,
        background: Arc<dyn BackgroundDispatcher>,
        sla_warning: Duration,
    ) -> Self {
        Self {
            validator,
            downloader,
            transcriber,
            event_repository,
            notifier,
            background,
            sla_warning,
        }
    }

    #[tracing::instrument(
        skip_all,
        fields(user_id = %ctx.user.id.as_uuid(), filename = %audio.filename, size_bytes = audio.size_bytes)
    )]
    pub async fn run(&self, ctx: &ProcessingContext, audio: &AudioReference) -> PipelineOutcome {
        let mut tracker = PhaseTracker::start();

        let result = match self.produce_transcript(ctx, audio, &mut tracker).await {
            Ok((transcript, byte_count)) => {
                Ok(self.deliver(ctx, audio, transcript, byte_count, &mut tracker).await)
            }
            Err(error) => {
                self.report_failure(ctx, audio, &error, &mut tracker).await;
                Err(error)
            }
        };

        let metrics = tracker.finish(
            audio.size_bytes,
            result.as_ref().err().map(PipelineError::kind),
        );
        metrics.log(self.sla_warning);

        PipelineOutcome { metrics, result }
    }

    async fn produce_transcript(
        &self,
        ctx: &ProcessingContext,
        audio: &AudioReference,
        tracker: &mut PhaseTracker,
    ) -> Result<(Transcript, u64), PipelineError> {
        tracker.begin("validate");
        self.validator.validate(audio).into_result()?;

        tracker.begin("download");
        let bytes = self
            .downloader
            .download(&audio.location, &ctx.deadline)
            .await?;

        tracker.begin("transcribe");
        let transcript = self
            .transcriber
            .transcribe(&bytes, &audio.filename, &ctx.deadline)
            .await?;

        if transcript.text.is_empty() {
            return Err(PipelineError::new(
                ErrorKind::GeneralError,
                "Transcription came back empty",
            ));
        }

        Ok((transcript, bytes.len() as u64))
    }

    async fn deliver(
        &self,
        ctx: &ProcessingContext,
        audio: &AudioReference,
        transcript: Transcript,
        byte_count: u64,
        tracker: &mut PhaseTracker,
    ) -> Delivery {
        tracker.begin("persist");
        let event = ProcessingEvent::transcribed(
            ctx.user.id,
            ProcessingKind::Webhook,
            byte_count,
            transcript.estimated_duration_seconds,
            ctx.user.enhancement_kinds.clone(),
            ctx.received_at,
        );
        let event_id = event.id;
        let event_persisted = match self.event_repository.create(&event).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, event_id = %event_id.as_uuid(), "Failed to persist processing event");
                false
            }
        };

        tracker.begin("notify");
        let notified = self
            .notifier
            .notify_success(&ctx.user.email, &audio.filename, &transcript.text)
            .await;

        let enhancements_scheduled = if ctx.user.enhancement_kinds.is_empty() {
            false
        } else {
            tracker.begin("dispatch");
            let request = EnhancementRequest {
                event_id: event_id.as_uuid(),
                enhancement_types: ctx.user.enhancement_kinds.clone(),
                filename: audio.filename.clone(),
                transcript: transcript.text.clone(),
                user_email: ctx.user.email.clone(),
            };
            match self.background.schedule(request).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!(error = %e, event_id = %event_id.as_uuid(), "Failed to schedule background enhancement");
                    if event_persisted {
                        self.abandon_enhancements(event_id, &e.to_string()).await;
                    }
                    false
                }
            }
        };

        Delivery {
            event_id,
            transcript: transcript.text,
            event_persisted,
            notified,
            enhancements_scheduled,
        }
    }

    /// Nothing will pick the event up, so it must not stay `processing`.
    async fn abandon_enhancements(&self, event_id: EventId, reason: &str) {
        let message = format!("Enhancements could not be scheduled: {}", reason);
        match self
            .event_repository
            .finalize(event_id, EventStatus::Failed, Some(&message))
            .await
        {
            Ok(_) => tracing::info!(event_id = %event_id.as_uuid(), "Processing event finalized after scheduling failure"),
            Err(e) => tracing::error!(error = %e, "Failed to finalize unscheduled processing event"),
        }
    }

    async fn report_failure(
        &self,
        ctx: &ProcessingContext,
        audio: &AudioReference,
        error: &PipelineError,
        tracker: &mut PhaseTracker,
    ) {
        tracing::warn!(kind = %error.kind(), error = %error, "Pipeline failed");

        tracker.begin("error_notify");
        self.notifier
            .notify_error(&ctx.user.email, error.kind(), Some(&audio.filename))
            .await;

        let event = ProcessingEvent::failed(
            ctx.user.id,
            ProcessingKind::Webhook,
            audio.size_bytes,
            format!("{}: {}", error.kind(), error.message()),
            ctx.received_at,
        );
        if let Err(e) = self.event_repository.create(&event).await {
            tracing::error!(error = %e, "Failed to persist failed processing event");
        }
    }
}
