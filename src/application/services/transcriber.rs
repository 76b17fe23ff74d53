use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;

use crate::application::ports::TranscriptionEngine;
use crate::domain::ErrorKind;

use super::error_classifier::contains_any;
use super::{Deadline, PipelineError, StageOutcome};

pub const DEFAULT_TRANSCRIPTION_TIMEOUT: Duration = Duration::from_secs(40);

/// Bitrate assumed when estimating duration from byte size. An estimate for
/// analytics only; no audio is decoded.
pub const ASSUMED_BITRATE_BPS: u64 = 128_000;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static MISSING_SENTENCE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.!?])(\p{Ll})").expect("valid sentence pattern"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    pub estimated_duration_seconds: u32,
}

pub struct Transcriber {
    engine: Arc<dyn TranscriptionEngine>,
    timeout: Duration,
}

impl Transcriber {
    pub fn new(engine: Arc<dyn TranscriptionEngine>, timeout: Duration) -> Self {
        Self { engine, timeout }
    }

    /// Transcribes and normalizes. An empty normalized text is returned as-is;
    /// rejecting it is the caller's decision.
    #[tracing::instrument(skip(self, audio_data, deadline), fields(bytes = audio_data.len()))]
    pub async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
        deadline: &Deadline,
    ) -> Result<Transcript, PipelineError> {
        let outcome = deadline
            .run_stage(self.timeout, self.engine.transcribe(audio_data, filename))
            .await;

        match outcome {
            StageOutcome::Completed(Ok(raw)) => {
                let text = clean_transcription(&raw);
                tracing::info!(chars = text.len(), "Transcription completed");
                Ok(Transcript {
                    text,
                    estimated_duration_seconds: estimate_duration_seconds(audio_data.len() as u64),
                })
            }
            StageOutcome::Completed(Err(e)) => {
                let message = e.to_string();
                let kind = categorize_transcription_error(&message);
                tracing::warn!(error = %message, kind = %kind, "Transcription engine failed");
                Err(PipelineError::new(kind, format!("Transcription failed: {}", message)))
            }
            StageOutcome::StageTimedOut => Err(PipelineError::new(
                ErrorKind::WhisperTimeout,
                format!("Transcription did not finish within {}s", self.timeout.as_secs()),
            )),
            StageOutcome::DeadlineExceeded => Err(PipelineError::new(
                ErrorKind::ProcessingTimeout,
                "Processing deadline reached while transcribing",
            )),
        }
    }
}

/// trim → collapse whitespace → space after sentence punctuation → capitalize.
pub fn clean_transcription(raw: &str) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(raw.trim(), " ");
    let spaced = MISSING_SENTENCE_SPACE.replace_all(&collapsed, "$1 $2");
    capitalize_first(&spaced)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn estimate_duration_seconds(size_bytes: u64) -> u32 {
    if size_bytes == 0 {
        return 0;
    }
    let bytes_per_second = ASSUMED_BITRATE_BPS / 8;
    let seconds = size_bytes.div_ceil(bytes_per_second);
    u32::try_from(seconds).unwrap_or(u32::MAX)
}

pub fn categorize_transcription_error(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();

    if contains_any(&lower, &["timeout", "timed out", "abort"]) {
        ErrorKind::WhisperTimeout
    } else if contains_any(&lower, &["rate_limit", "rate limit", "quota"]) {
        ErrorKind::ProcessingTimeout
    } else if contains_any(&lower, &["format", "unsupported"]) {
        ErrorKind::InvalidFormat
    } else if contains_any(&lower, &["too large", "size"]) {
        ErrorKind::FileTooLarge
    } else {
        ErrorKind::GeneralError
    }
}
