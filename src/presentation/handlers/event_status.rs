use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{Caller, EnhancementKind, EventId};
use crate::presentation::state::AppState;

use super::error_response;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventStatusResponse {
    pub id: String,
    pub status: String,
    pub processing_kind: String,
    pub enhancement_types: Vec<EnhancementKind>,
    pub duration_seconds: u32,
    pub size_bytes: u64,
    pub error_message: Option<String>,
    pub received_at: String,
    pub completed_at: Option<String>,
}

#[tracing::instrument(skip(state, caller))]
pub async fn event_status_handler(
    State(state): State<AppState>,
    caller: Caller,
    Path(event_id): Path<String>,
) -> Response {
    let Some(user) = caller.user() else {
        return error_response(StatusCode::UNAUTHORIZED, "unauthorized", "Missing or invalid API key");
    };

    let Ok(uuid) = Uuid::parse_str(&event_id) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_event_id",
            format!("Invalid event ID: {}", event_id),
        );
    };

    match state.event_repository.get_by_id(EventId::from_uuid(uuid)).await {
        Ok(Some(event)) if event.user_id == user.id => {
            let response = EventStatusResponse {
                id: event.id.as_uuid().to_string(),
                status: event.status.as_str().to_string(),
                processing_kind: event.kind.as_str().to_string(),
                enhancement_types: event.enhancement_kinds.iter().collect(),
                duration_seconds: event.duration_seconds,
                size_bytes: event.size_bytes,
                error_message: event.error_message,
                received_at: event.received_at.to_rfc3339(),
                completed_at: event.completed_at.map(|t| t.to_rfc3339()),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(_) => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("Event not found: {}", event_id),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch processing event");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "general_error",
                "Failed to fetch event",
            )
        }
    }
}
