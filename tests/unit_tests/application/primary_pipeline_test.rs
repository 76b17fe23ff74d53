use std::sync::Arc;
use std::time::Duration;

use voxmail::application::ports::{EventRepository, TranscriptionEngine};
use voxmail::application::services::{
    AudioDownloader, AudioValidator, Notifier, PrimaryPipeline, ProcessingContext, Transcriber,
};
use voxmail::domain::{AudioReference, EnhancementKind, ErrorKind, EventStatus, User};
use voxmail::infrastructure::persistence::InMemoryEventRepository;

use crate::mocks::{RecordingDispatcher, RecordingMailer, StubEngine, StubFetcher, test_user};

struct Harness {
    pipeline: PrimaryPipeline,
    events: Arc<InMemoryEventRepository>,
    mailer: Arc<RecordingMailer>,
    background: Arc<RecordingDispatcher>,
}

fn harness(engine: impl TranscriptionEngine + 'static, fetcher: StubFetcher) -> Harness {
    harness_with_background(engine, fetcher, RecordingDispatcher::default())
}

fn harness_with_background(
    engine: impl TranscriptionEngine + 'static,
    fetcher: StubFetcher,
    background: RecordingDispatcher,
) -> Harness {
    let events = Arc::new(InMemoryEventRepository::new());
    let mailer = Arc::new(RecordingMailer::default());
    let background = Arc::new(background);

    let pipeline = PrimaryPipeline::new(
        AudioValidator::default(),
        AudioDownloader::new(Arc::new(fetcher), Duration::from_secs(15), u64::MAX),
        Transcriber::new(Arc::new(engine), Duration::from_secs(40)),
        events.clone(),
        Arc::new(Notifier::new(mailer.clone(), Duration::from_secs(10))),
        background.clone(),
        Duration::from_secs(50),
    );

    Harness {
        pipeline,
        events,
        mailer,
        background,
    }
}

fn voice_note() -> AudioReference {
    AudioReference::new("memo.m4a", 32_000, "audio/mp4", "https://files.example.com/memo")
}

fn context(user: User) -> ProcessingContext {
    ProcessingContext::new(user, Duration::from_secs(60))
}

#[tokio::test]
async fn given_user_with_enhancements_when_pipeline_succeeds_then_delivers_and_schedules() {
    let h = harness(
        StubEngine::returning("call the bank.then the dentist"),
        StubFetcher::returning(&[0u8; 32_000]),
    );
    let ctx = context(test_user(&[EnhancementKind::Summary]));

    let outcome = h.pipeline.run(&ctx, &voice_note()).await;

    let delivery = outcome.result.unwrap();
    assert_eq!(delivery.transcript, "Call the bank. then the dentist");
    assert!(delivery.event_persisted);
    assert!(delivery.notified);
    assert!(delivery.enhancements_scheduled);
    assert_eq!(h.mailer.templates(), vec!["transcription_success"]);

    let scheduled = h.background.scheduled.lock().unwrap().clone();
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].event_id, delivery.event_id.as_uuid());
    assert_eq!(scheduled[0].transcript, delivery.transcript);

    let event = h.events.get_by_id(delivery.event_id).await.unwrap().unwrap();
    assert_eq!(event.status, EventStatus::Processing);
    assert_eq!(event.duration_seconds, 2);
}

#[tokio::test]
async fn given_user_without_enhancements_when_pipeline_succeeds_then_nothing_is_scheduled() {
    let h = harness(
        StubEngine::returning("short note"),
        StubFetcher::returning(&[0u8; 1_000]),
    );
    let ctx = context(test_user(&[]));

    let outcome = h.pipeline.run(&ctx, &voice_note()).await;

    let delivery = outcome.result.unwrap();
    assert!(!delivery.enhancements_scheduled);
    assert!(h.background.scheduled.lock().unwrap().is_empty());

    let event = h.events.get_by_id(delivery.event_id).await.unwrap().unwrap();
    assert_eq!(event.status, EventStatus::Completed);
}

#[tokio::test]
async fn given_blank_transcription_when_pipeline_runs_then_general_error_and_single_error_email() {
    let h = harness(StubEngine::returning("   "), StubFetcher::returning(b"audio"));
    let ctx = context(test_user(&[EnhancementKind::Cleanup]));

    let outcome = h.pipeline.run(&ctx, &voice_note()).await;

    let error = outcome.result.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::GeneralError);
    assert_eq!(h.mailer.templates(), vec!["error_general"]);
    assert!(h.background.scheduled.lock().unwrap().is_empty());
    assert!(!outcome.metrics.success);
    assert_eq!(outcome.metrics.error_kind, Some(ErrorKind::GeneralError));

    let events = h.events.snapshot();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, EventStatus::Failed);
}

#[tokio::test]
async fn given_non_audio_attachment_when_pipeline_runs_then_invalid_format_before_download() {
    let h = harness(StubEngine::returning("unused"), StubFetcher::returning(b"pdf"));
    let ctx = context(test_user(&[]));
    let attachment =
        AudioReference::new("slides.pdf", 1_000, "application/pdf", "https://files/slides");

    let outcome = h.pipeline.run(&ctx, &attachment).await;

    assert_eq!(outcome.result.unwrap_err().kind(), ErrorKind::InvalidFormat);
    assert_eq!(h.mailer.templates(), vec!["error_invalid_format"]);
    assert!(outcome.metrics.phase_ms("download").is_none());
}

#[tokio::test]
async fn given_successful_run_when_reading_metrics_then_every_phase_is_recorded() {
    let h = harness(
        StubEngine::returning("hello"),
        StubFetcher::returning(&[0u8; 100]),
    );
    let ctx = context(test_user(&[]));

    let outcome = h.pipeline.run(&ctx, &voice_note()).await;

    assert!(outcome.metrics.success);
    for phase in ["validate", "download", "transcribe", "persist", "notify"] {
        assert!(outcome.metrics.phase_ms(phase).is_some(), "missing phase {}", phase);
    }
    assert!(outcome.metrics.phase_ms("dispatch").is_none());
}

#[tokio::test(start_paused = true)]
async fn given_slow_download_when_pipeline_runs_then_reports_download_timeout_not_whisper() {
    let h = harness(
        StubEngine::returning("unused"),
        StubFetcher::slow(Duration::from_secs(30)),
    );
    let ctx = context(test_user(&[]));

    let outcome = h.pipeline.run(&ctx, &voice_note()).await;

    assert_eq!(outcome.result.unwrap_err().kind(), ErrorKind::DownloadTimeout);
    assert_eq!(h.mailer.templates(), vec!["error_download_timeout"]);
}

#[tokio::test(start_paused = true)]
async fn given_slow_transcription_when_pipeline_runs_then_reports_whisper_timeout() {
    let h = harness(
        StubEngine::slow(Duration::from_secs(45)),
        StubFetcher::returning(&[0u8; 100]),
    );
    let ctx = context(test_user(&[]));

    let outcome = h.pipeline.run(&ctx, &voice_note()).await;

    assert_eq!(outcome.result.unwrap_err().kind(), ErrorKind::WhisperTimeout);
    assert_eq!(h.mailer.templates(), vec!["error_whisper_timeout"]);
}

#[tokio::test]
async fn given_background_refuses_work_when_pipeline_succeeds_then_event_is_finalized_failed() {
    let h = harness_with_background(
        StubEngine::returning("call the bank"),
        StubFetcher::returning(&[0u8; 32_000]),
        RecordingDispatcher::refusing(),
    );
    let ctx = context(test_user(&[EnhancementKind::Summary]));

    let outcome = h.pipeline.run(&ctx, &voice_note()).await;

    let delivery = outcome.result.unwrap();
    assert!(!delivery.enhancements_scheduled);
    assert!(delivery.notified);
    assert_eq!(h.mailer.templates(), vec!["transcription_success"]);

    let event = h.events.get_by_id(delivery.event_id).await.unwrap().unwrap();
    assert_eq!(event.status, EventStatus::Failed);
    assert!(event.completed_at.is_some());
    assert!(
        event
            .error_message
            .as_deref()
            .is_some_and(|m| m.contains("could not be scheduled"))
    );
}
