use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde::Serialize;

use crate::application::ports::EnhancementRequest;
use crate::application::services::DispatcherError;
use crate::infrastructure::security::verify_background_token;
use crate::presentation::auth::bearer_token;
use crate::presentation::state::AppState;

use super::error_response;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhanceResponse {
    pub event_id: String,
    pub status: String,
    pub succeeded: usize,
    pub failed: usize,
    pub error_message: Option<String>,
}

/// Runs the enhancement fan-out to completion before answering, under the
/// dispatcher's own deadline.
#[tracing::instrument(skip_all)]
pub async fn enhance_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let presented = bearer_token(&headers).unwrap_or_default();

    if state.background_secret.is_empty()
        || !verify_background_token(&state.background_secret, presented)
    {
        tracing::warn!("Background invocation with invalid token");
        return error_response(StatusCode::UNAUTHORIZED, "unauthorized", "Invalid background token");
    }

    let request: EnhancementRequest = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                format!("Invalid enhancement request: {}", e),
            );
        }
    };
    tracing::info!(event_id = %request.event_id, kinds = request.enhancement_types.len(), "Background enhancement received");

    match state.dispatcher.run(request).await {
        Ok(summary) => (
            StatusCode::OK,
            Json(EnhanceResponse {
                event_id: summary.event_id.as_uuid().to_string(),
                status: summary.status.as_str().to_string(),
                succeeded: summary.succeeded(),
                failed: summary.failed(),
                error_message: summary.error_message,
            }),
        )
            .into_response(),
        Err(DispatcherError::EmptyTranscript) => error_response(
            StatusCode::BAD_REQUEST,
            "empty_transcript",
            DispatcherError::EmptyTranscript.to_string(),
        ),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, "general_error", e.to_string()),
    }
}
