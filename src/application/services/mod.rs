mod api_transcription;
mod audio_download;
mod deadline;
mod email_templates;
mod enhancement_dispatcher;
mod enhancement_profile;
mod enhancement_worker;
mod error_classifier;
mod notifier;
mod phase_tracker;
mod primary_pipeline;
mod processing_context;
mod rate_limiter;
mod transcriber;
mod validator;

pub use api_transcription::{ApiTranscriptionError, ApiTranscriptionService};
pub use audio_download::{AudioDownloader, DEFAULT_DOWNLOAD_TIMEOUT};
pub use deadline::{Deadline, StageOutcome};
pub use email_templates::{
    EmailTemplate, enhancement_failure_template, enhancement_template, error_template,
    success_template,
};
pub use enhancement_dispatcher::{
    DEFAULT_BACKGROUND_DEADLINE, DispatcherError, EnhancementDispatcher, EnhancementJobResult,
    EnhancementSummary, aggregate,
};
pub use enhancement_profile::{
    EnhancementProfile, SUMMARY_WORD_BUDGET, enforce_word_budget, truncate_words,
};
pub use enhancement_worker::EnhancementWorker;
pub use error_classifier::{PipelineError, classify, classify_message};
pub use notifier::{DEFAULT_SEND_TIMEOUT, Notifier};
pub use phase_tracker::{PhaseMetrics, PhaseTracker};
pub use primary_pipeline::{
    DEFAULT_OUTER_DEADLINE, DEFAULT_SLA_WARNING, Delivery, PipelineOutcome, PrimaryPipeline,
};
pub use processing_context::ProcessingContext;
pub use rate_limiter::{RateLimitDecision, RateLimitPolicy, RateLimiter};
pub use transcriber::{
    ASSUMED_BITRATE_BPS, DEFAULT_TRANSCRIPTION_TIMEOUT, Transcriber, Transcript,
    categorize_transcription_error, clean_transcription, estimate_duration_seconds,
};
pub use validator::{
    AudioValidator, DEFAULT_MAX_FILE_SIZE_BYTES, ValidationOutcome, is_supported_format,
};
