use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::post;
use chrono::Utc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use voxmail::application::ports::{BackgroundDispatcher, EnhancementRequest, EventRepository};
use voxmail::domain::{
    EnhancementKind, EnhancementKinds, EventId, EventStatus, ProcessingEvent, ProcessingKind,
    UserId,
};
use voxmail::infrastructure::background::{BACKGROUND_ENHANCE_PATH, SelfCallDispatcher};
use voxmail::infrastructure::persistence::InMemoryEventRepository;

async fn start_background_endpoint(status: StatusCode) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(BACKGROUND_ENHANCE_PATH, post(move || async move { status }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

async fn pending_event(events: &InMemoryEventRepository) -> EnhancementRequest {
    let kinds: EnhancementKinds = vec![EnhancementKind::Summary].into();
    let event = ProcessingEvent::transcribed(
        UserId::new(),
        ProcessingKind::Webhook,
        32_000,
        2,
        kinds.clone(),
        Utc::now(),
    );
    events.create(&event).await.unwrap();

    EnhancementRequest {
        event_id: event.id.as_uuid(),
        enhancement_types: kinds,
        filename: "memo.m4a".to_string(),
        transcript: "Call the bank.".to_string(),
        user_email: "listener@example.com".to_string(),
    }
}

async fn status_after_settling(
    events: &InMemoryEventRepository,
    request: &EnhancementRequest,
    wanted: EventStatus,
) -> EventStatus {
    let id = EventId::from_uuid(request.event_id);
    for _ in 0..100 {
        let status = events.get_by_id(id).await.unwrap().unwrap().status;
        if status == wanted {
            return status;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    events.get_by_id(id).await.unwrap().unwrap().status
}

#[tokio::test]
async fn given_background_endpoint_rejects_call_when_scheduling_then_event_is_finalized_failed() {
    let (base_url, _shutdown) = start_background_endpoint(StatusCode::UNAUTHORIZED).await;
    let events = Arc::new(InMemoryEventRepository::new());
    let request = pending_event(&events).await;
    let dispatcher =
        SelfCallDispatcher::new(&base_url, "secret", Duration::from_secs(5), events.clone());

    dispatcher.schedule(request.clone()).await.unwrap();

    let status = status_after_settling(&events, &request, EventStatus::Failed).await;
    assert_eq!(status, EventStatus::Failed);
    let stored = events.snapshot().remove(0);
    assert!(stored.error_message.unwrap().contains("401"));
}

#[tokio::test]
async fn given_unreachable_background_endpoint_when_scheduling_then_event_is_finalized_failed() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    let events = Arc::new(InMemoryEventRepository::new());
    let request = pending_event(&events).await;
    let dispatcher =
        SelfCallDispatcher::new(&base_url, "secret", Duration::from_secs(5), events.clone());

    dispatcher.schedule(request.clone()).await.unwrap();

    let status = status_after_settling(&events, &request, EventStatus::Failed).await;
    assert_eq!(status, EventStatus::Failed);
}

#[tokio::test]
async fn given_background_endpoint_accepts_call_when_scheduling_then_event_is_left_to_the_handler() {
    let (base_url, _shutdown) = start_background_endpoint(StatusCode::OK).await;
    let events = Arc::new(InMemoryEventRepository::new());
    let request = pending_event(&events).await;
    let dispatcher =
        SelfCallDispatcher::new(&base_url, "secret", Duration::from_secs(5), events.clone());

    dispatcher.schedule(request.clone()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let stored = events.snapshot().remove(0);
    assert_eq!(stored.status, EventStatus::Processing);
}
