use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::header::RETRY_AFTER;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::ApiTranscriptionError;
use crate::domain::{Caller, ErrorKind};
use crate::presentation::state::AppState;

use super::{error_response, pipeline_error_response};

#[derive(Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

#[tracing::instrument(skip_all)]
pub async fn transcribe_handler(
    State(state): State<AppState>,
    caller: Caller,
    mut multipart: Multipart,
) -> Response {
    let user = match caller {
        Caller::Authenticated(user) => user,
        Caller::Anonymous => {
            return error_response(
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Missing or invalid API key",
            );
        }
    };

    if !user.approved {
        return error_response(
            StatusCode::FORBIDDEN,
            ErrorKind::UserNotApproved.as_str(),
            "Account is not approved",
        );
    }

    let field = loop {
        match multipart.next_field().await {
            Ok(Some(f)) if f.name() == Some("file") => break f,
            Ok(Some(_)) => continue,
            Ok(None) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorKind::InvalidFormat.as_str(),
                    "No file uploaded",
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    ErrorKind::InvalidFormat.as_str(),
                    format!("Failed to read multipart: {}", e),
                );
            }
        }
    };

    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let data = match field.bytes().await {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read file bytes");
            return error_response(
                StatusCode::BAD_REQUEST,
                ErrorKind::InvalidFormat.as_str(),
                format!("Failed to read file: {}", e),
            );
        }
    };

    tracing::debug!(filename = %filename, content_type = %content_type, bytes = data.len(), "File received");

    match state
        .api_transcription
        .transcribe(&user, &filename, &content_type, &data)
        .await
    {
        Ok(text) => (StatusCode::OK, Json(TranscribeResponse { text })).into_response(),
        Err(ApiTranscriptionError::RateLimited { retry_after }) => {
            let mut response = error_response(
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                format!("Rate limit exceeded, retry in {}s", retry_after.as_secs()),
            );
            if let Ok(value) = HeaderValue::from_str(&retry_after.as_secs().to_string()) {
                response.headers_mut().insert(RETRY_AFTER, value);
            }
            response
        }
        Err(ApiTranscriptionError::Pipeline(error)) => pipeline_error_response(&error),
    }
}
