use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::application::ports::EventRepository;
use crate::domain::{
    AudioReference, EnhancementKinds, ErrorKind, ProcessingEvent, ProcessingKind, User,
};

use super::{
    AudioValidator, Deadline, PipelineError, RateLimitDecision, RateLimiter, Transcriber,
};

/// Synchronous transcription for API-key callers: no email side effects.
pub struct ApiTranscriptionService {
    validator: AudioValidator,
    transcriber: Transcriber,
    event_repository: Arc<dyn EventRepository>,
    rate_limiter: Arc<RateLimiter>,
    outer_deadline: Duration,
}

impl ApiTranscriptionService {
    pub fn new(
        validator: AudioValidator,
        transcriber: Transcriber,
        event_repository: Arc<dyn EventRepository>,
        rate_limiter: Arc<RateLimiter>,
        outer_deadline: Duration,
    ) -> Self {
        Self {
            validator,
            transcriber,
            event_repository,
            rate_limiter,
            outer_deadline,
        }
    }

    #[tracing::instrument(skip(self, user, data), fields(user_id = %user.id.as_uuid(), bytes = data.len()))]
    pub async fn transcribe(
        &self,
        user: &User,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<String, ApiTranscriptionError> {
        let rate_key = format!("api:{}", user.id.as_uuid());
        if let RateLimitDecision::Limited { retry_after } = self.rate_limiter.check(&rate_key).await
        {
            return Err(ApiTranscriptionError::RateLimited { retry_after });
        }

        let received_at = Utc::now();
        let size_bytes = data.len() as u64;
        let audio = AudioReference::new(filename, size_bytes, content_type, "upload");
        let deadline = Deadline::after(self.outer_deadline);

        let result = self.run(&audio, data, &deadline).await;
        deadline.cancel();

        let event = match &result {
            Ok((_, duration_seconds)) => ProcessingEvent::transcribed(
                user.id,
                ProcessingKind::Api,
                size_bytes,
                *duration_seconds,
                EnhancementKinds::new(),
                received_at,
            ),
            Err(error) => ProcessingEvent::failed(
                user.id,
                ProcessingKind::Api,
                size_bytes,
                format!("{}: {}", error.kind(), error.message()),
                received_at,
            ),
        };
        if let Err(e) = self.event_repository.create(&event).await {
            tracing::error!(error = %e, "Failed to persist processing event");
        }

        result
            .map(|(text, _)| text)
            .map_err(ApiTranscriptionError::Pipeline)
    }

    async fn run(
        &self,
        audio: &AudioReference,
        data: &[u8],
        deadline: &Deadline,
    ) -> Result<(String, u32), PipelineError> {
        self.validator.validate(audio).into_result()?;

        let transcript = self
            .transcriber
            .transcribe(data, &audio.filename, deadline)
            .await?;

        if transcript.text.is_empty() {
            return Err(PipelineError::new(
                ErrorKind::GeneralError,
                "Transcription came back empty",
            ));
        }

        Ok((transcript.text, transcript.estimated_duration_seconds))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiTranscriptionError {
    #[error("rate limit exceeded, retry in {}s", .retry_after.as_secs())]
    RateLimited { retry_after: Duration },
    #[error(transparent)]
    Pipeline(PipelineError),
}
