use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use voxmail::application::ports::{EnhancementRequest, EventRepository, LlmClient};
use voxmail::application::services::{
    DispatcherError, EnhancementDispatcher, EnhancementJobResult, Notifier, aggregate,
};
use voxmail::domain::{
    EnhancementKind, EnhancementKinds, EventStatus, ProcessingEvent, ProcessingKind, UserId,
};
use voxmail::infrastructure::persistence::InMemoryEventRepository;

use crate::mocks::{RecordingMailer, ScriptedLlm};

async fn pending_event(events: &InMemoryEventRepository, kinds: &EnhancementKinds) -> ProcessingEvent {
    let event = ProcessingEvent::transcribed(
        UserId::new(),
        ProcessingKind::Webhook,
        32_000,
        2,
        kinds.clone(),
        Utc::now(),
    );
    events.create(&event).await.unwrap();
    event
}

fn request(event: &ProcessingEvent, transcript: &str) -> EnhancementRequest {
    EnhancementRequest {
        event_id: event.id.as_uuid(),
        enhancement_types: event.enhancement_kinds.clone(),
        filename: "memo.m4a".to_string(),
        transcript: transcript.to_string(),
        user_email: "listener@example.com".to_string(),
    }
}

fn dispatcher(
    llm: impl LlmClient + 'static,
    mailer: Arc<RecordingMailer>,
    events: Arc<InMemoryEventRepository>,
    deadline: Duration,
) -> EnhancementDispatcher {
    EnhancementDispatcher::new(
        Arc::new(llm),
        Arc::new(Notifier::new(mailer, Duration::from_secs(10))),
        events,
        deadline,
    )
}

fn both_kinds() -> EnhancementKinds {
    vec![EnhancementKind::Cleanup, EnhancementKind::Summary].into()
}

#[tokio::test]
async fn given_all_generations_succeed_when_dispatching_then_event_completed_and_emails_sent() {
    let events = Arc::new(InMemoryEventRepository::new());
    let mailer = Arc::new(RecordingMailer::default());
    let event = pending_event(&events, &both_kinds()).await;
    let llm = ScriptedLlm::default()
        .with(EnhancementKind::Cleanup, Ok("Call the bank."))
        .with(EnhancementKind::Summary, Ok("## Main Topic\nBanking."));

    let summary = dispatcher(llm, mailer.clone(), events.clone(), Duration::from_secs(300))
        .run(request(&event, "call the bank"))
        .await
        .unwrap();

    assert_eq!(summary.status, EventStatus::Completed);
    assert_eq!(summary.succeeded(), 2);
    assert!(summary.error_message.is_none());

    let mut templates = mailer.templates();
    templates.sort();
    assert_eq!(templates, vec!["enhancement_cleanup", "enhancement_summary"]);

    let stored = events.get_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Completed);
    assert!(stored.completed_at.is_some());
}

#[tokio::test]
async fn given_one_of_two_kinds_fails_when_dispatching_then_completed_with_failing_kind_named() {
    let events = Arc::new(InMemoryEventRepository::new());
    let mailer = Arc::new(RecordingMailer::default());
    let event = pending_event(&events, &both_kinds()).await;
    let llm = ScriptedLlm::default()
        .with(EnhancementKind::Cleanup, Ok("Call the bank."))
        .with(EnhancementKind::Summary, Err("model overloaded"));

    let summary = dispatcher(llm, mailer.clone(), events.clone(), Duration::from_secs(300))
        .run(request(&event, "call the bank"))
        .await
        .unwrap();

    assert_eq!(summary.status, EventStatus::Completed);
    let message = summary.error_message.unwrap();
    assert!(message.contains("summary"), "{}", message);
    assert!(!message.contains("cleanup"), "{}", message);

    let mut templates = mailer.templates();
    templates.sort();
    assert_eq!(templates, vec!["enhancement_cleanup", "enhancement_failed"]);
}

#[tokio::test]
async fn given_all_kinds_fail_when_dispatching_then_event_failed() {
    let events = Arc::new(InMemoryEventRepository::new());
    let mailer = Arc::new(RecordingMailer::default());
    let event = pending_event(&events, &both_kinds()).await;
    let llm = ScriptedLlm::default()
        .with(EnhancementKind::Cleanup, Err("boom"))
        .with(EnhancementKind::Summary, Err("boom"));

    let summary = dispatcher(llm, mailer, events.clone(), Duration::from_secs(300))
        .run(request(&event, "call the bank"))
        .await
        .unwrap();

    assert_eq!(summary.status, EventStatus::Failed);
    assert_eq!(summary.failed(), 2);
    let stored = events.get_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Failed);
}

#[tokio::test]
async fn given_enhancement_email_rejected_when_dispatching_then_kind_counts_as_failed() {
    let events = Arc::new(InMemoryEventRepository::new());
    let mailer = Arc::new(RecordingMailer::failing_on(&["enhancement_summary"]));
    let kinds: EnhancementKinds = vec![EnhancementKind::Summary].into();
    let event = pending_event(&events, &kinds).await;
    let llm = ScriptedLlm::default().with(EnhancementKind::Summary, Ok("## Main Topic\nBank."));

    let summary = dispatcher(llm, mailer, events, Duration::from_secs(300))
        .run(request(&event, "call the bank"))
        .await
        .unwrap();

    assert_eq!(summary.status, EventStatus::Failed);
}

#[tokio::test]
async fn given_empty_transcript_when_dispatching_then_rejected_and_event_failed() {
    let events = Arc::new(InMemoryEventRepository::new());
    let mailer = Arc::new(RecordingMailer::default());
    let event = pending_event(&events, &both_kinds()).await;

    let result = dispatcher(ScriptedLlm::default(), mailer.clone(), events.clone(), Duration::from_secs(300))
        .run(request(&event, "   "))
        .await;

    assert!(matches!(result, Err(DispatcherError::EmptyTranscript)));
    assert!(mailer.templates().is_empty());
    let stored = events.get_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn given_every_generation_outlasting_background_deadline_when_dispatching_then_event_failed() {
    let events = Arc::new(InMemoryEventRepository::new());
    let mailer = Arc::new(RecordingMailer::default());
    let event = pending_event(&events, &both_kinds()).await;
    let llm = ScriptedLlm {
        delay: Duration::from_secs(600),
        ..ScriptedLlm::default()
    };

    let summary = dispatcher(llm, mailer.clone(), events.clone(), Duration::from_secs(300))
        .run(request(&event, "call the bank"))
        .await
        .unwrap();

    assert_eq!(summary.status, EventStatus::Failed);
    assert_eq!(summary.failed(), 2);
    assert!(summary.error_message.unwrap().contains("deadline of 300s exceeded"));
    assert_eq!(mailer.templates(), vec!["enhancement_failed", "enhancement_failed"]);
    let stored = events.get_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Failed);
}

#[tokio::test(start_paused = true)]
async fn given_one_kind_hangs_past_background_deadline_when_dispatching_then_finished_kind_is_kept() {
    let events = Arc::new(InMemoryEventRepository::new());
    let mailer = Arc::new(RecordingMailer::default());
    let event = pending_event(&events, &both_kinds()).await;
    let llm = ScriptedLlm::default()
        .with(EnhancementKind::Cleanup, Ok("Call the bank."))
        .with(EnhancementKind::Summary, Ok("## Main Topic\nBanking."))
        .stalling(EnhancementKind::Summary, Duration::from_secs(3600));

    let summary = dispatcher(llm, mailer.clone(), events.clone(), Duration::from_secs(300))
        .run(request(&event, "call the bank"))
        .await
        .unwrap();

    assert_eq!(summary.status, EventStatus::Completed);
    assert_eq!(summary.succeeded(), 1);
    let message = summary.error_message.unwrap();
    assert!(message.contains("summary: deadline of 300s exceeded"), "{}", message);
    assert!(!message.contains("cleanup"), "{}", message);

    let mut templates = mailer.templates();
    templates.sort();
    assert_eq!(templates, vec!["enhancement_cleanup", "enhancement_failed"]);

    let stored = events.get_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Completed);
}

#[tokio::test]
async fn given_already_terminal_event_when_dispatching_again_then_status_is_not_rewritten() {
    let events = Arc::new(InMemoryEventRepository::new());
    let kinds: EnhancementKinds = vec![EnhancementKind::Summary].into();
    let event = pending_event(&events, &kinds).await;
    events
        .finalize(event.id, EventStatus::Failed, Some("first run"))
        .await
        .unwrap();
    let llm = ScriptedLlm::default().with(EnhancementKind::Summary, Ok("fine"));

    dispatcher(llm, Arc::new(RecordingMailer::default()), events.clone(), Duration::from_secs(300))
        .run(request(&event, "call the bank"))
        .await
        .unwrap();

    let stored = events.get_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.status, EventStatus::Failed);
    assert_eq!(stored.error_message.as_deref(), Some("first run"));
}

#[test]
fn given_no_results_when_aggregating_then_completed_without_message() {
    assert_eq!(aggregate(&[]), (EventStatus::Completed, None));
}

#[test]
fn given_mixed_results_when_aggregating_then_message_lists_failures() {
    let results = vec![
        EnhancementJobResult {
            kind: EnhancementKind::Cleanup,
            outcome: Err("timeout".to_string()),
        },
        EnhancementJobResult {
            kind: EnhancementKind::Summary,
            outcome: Ok("done".to_string()),
        },
    ];

    let (status, message) = aggregate(&results);

    assert_eq!(status, EventStatus::Completed);
    assert_eq!(message.as_deref(), Some("Some enhancements failed: cleanup: timeout"));
}
