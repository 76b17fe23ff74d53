use axum::Router;
use axum::response::IntoResponse;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use voxmail::application::ports::{TranscriptionEngine, TranscriptionError};
use voxmail::infrastructure::audio::AzureWhisperEngine;

async fn start_mock_azure_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/openai/deployments/my-deployment/audio/transcriptions",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

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

#[tokio::test]
async fn given_valid_audio_when_azure_transcribes_then_returns_text() {
    let (base_url, shutdown_tx) =
        start_mock_azure_server(200, r#"{"text": "Hello from Azure Whisper"}"#).await;
    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01");

    let result = engine.transcribe(b"fake audio bytes", "memo.m4a").await;

    assert_eq!(result.unwrap(), "Hello from Azure Whisper");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_rejects_request_when_transcribing_then_api_error() {
    let (base_url, shutdown_tx) =
        start_mock_azure_server(400, r#"{"error": {"message": "bad audio"}}"#).await;
    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01");

    let result = engine.transcribe(b"bad audio", "memo.m4a").await;

    assert!(matches!(result, Err(TranscriptionError::ApiRequestFailed(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_throttles_when_transcribing_then_rate_limited() {
    let (base_url, shutdown_tx) = start_mock_azure_server(429, "slow down").await;
    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01");

    let result = engine.transcribe(b"audio", "memo.m4a").await;

    assert!(matches!(result, Err(TranscriptionError::RateLimited(_))));
    shutdown_tx.send(()).ok();
}
