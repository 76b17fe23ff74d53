use std::collections::HashMap;

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::application::services::{PhaseMetrics, ProcessingContext, is_supported_format};
use crate::domain::{AudioReference, ErrorKind, UserSlug};
use crate::infrastructure::security::verify_webhook_signature;
use crate::presentation::state::AppState;

use super::error_response;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundEmailResponse {
    pub status: &'static str,
    pub event_id: Option<String>,
    pub enhancements_scheduled: bool,
    pub metrics: PhaseMetrics,
}

#[derive(Serialize)]
pub struct InboundEmailErrorResponse {
    pub error: String,
    pub message: String,
    pub metrics: PhaseMetrics,
}

#[derive(Debug, Deserialize)]
struct AttachmentEntry {
    #[serde(alias = "filename")]
    name: String,
    #[serde(rename = "content-type", alias = "contentType", default)]
    content_type: String,
    #[serde(default)]
    size: u64,
    url: String,
}

/// Collects the text fields of the provider's multipart form. File parts are
/// skipped; attachments are referenced by URL.
async fn read_form(multipart: &mut Multipart) -> Result<HashMap<String, String>, String> {
    let mut fields = HashMap::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field.text().await.map_err(|e| e.to_string())?;
        fields.insert(name, value);
    }
    Ok(fields)
}

/// Attachments arrive either as one `attachments` JSON array or as
/// `attachment-N-{name,content-type,size,url}` fields numbered from 1.
pub fn parse_attachments(fields: &HashMap<String, String>) -> Vec<AudioReference> {
    if let Some(raw) = fields.get("attachments") {
        match serde_json::from_str::<Vec<AttachmentEntry>>(raw) {
            Ok(entries) => {
                return entries
                    .into_iter()
                    .map(|a| AudioReference::new(a.name, a.size, a.content_type, a.url))
                    .collect();
            }
            Err(e) => tracing::warn!(error = %e, "Unreadable attachments field"),
        }
    }

    let declared = fields
        .get("attachment-count")
        .and_then(|c| c.trim().parse::<usize>().ok());

    let mut attachments = Vec::new();
    let mut index = 1;
    loop {
        if declared.is_some_and(|count| index > count) {
            break;
        }
        let get = move |suffix: &str| fields.get(&format!("attachment-{}-{}", index, suffix));
        let (Some(name), Some(url)) = (get("name"), get("url")) else {
            if declared.is_none() {
                break;
            }
            index += 1;
            continue;
        };
        let size = get("size")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or_default();
        let content_type = get("content-type").cloned().unwrap_or_default();
        attachments.push(AudioReference::new(name.clone(), size, content_type, url.clone()));
        index += 1;
    }
    attachments
}

#[tracing::instrument(skip_all)]
pub async fn inbound_email_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let fields = match read_form(&mut multipart).await {
        Ok(f) => f,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read inbound email form");
            return error_response(StatusCode::BAD_REQUEST, "invalid_request", e);
        }
    };
    let field = |name: &str| fields.get(name).map(String::as_str).unwrap_or_default();

    if state.webhook_signing_key.is_empty()
        || !verify_webhook_signature(
            &state.webhook_signing_key,
            field("timestamp"),
            field("token"),
            field("signature"),
        )
    {
        tracing::warn!("Inbound email with invalid signature");
        return error_response(StatusCode::UNAUTHORIZED, "unauthorized", "Invalid signature");
    }

    let Some(slug) = UserSlug::from_recipient(field("recipient")) else {
        tracing::warn!(recipient = %field("recipient"), "Recipient is not a user address");
        return error_response(StatusCode::BAD_REQUEST, "invalid_recipient", "Unrecognized recipient");
    };

    let user = match state.user_repository.find_by_slug(&slug).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!(slug = %slug, "No user for recipient");
            return error_response(
                StatusCode::NOT_FOUND,
                ErrorKind::UserNotFound.as_str(),
                "User not found",
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up user");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::GeneralError.as_str(),
                "Failed to look up user",
            );
        }
    };

    if !user.approved {
        tracing::info!(user_id = %user.id.as_uuid(), "Unapproved user sent a voice note");
        state
            .notifier
            .notify_error(&user.email, ErrorKind::UserNotApproved, None)
            .await;
        return error_response(
            StatusCode::FORBIDDEN,
            ErrorKind::UserNotApproved.as_str(),
            "Account is not approved",
        );
    }

    let attachments = parse_attachments(&fields);
    let Some(audio) = attachments.into_iter().find(is_supported_format) else {
        tracing::info!(user_id = %user.id.as_uuid(), "No audio attachment found");
        state
            .notifier
            .notify_error(&user.email, ErrorKind::InvalidFormat, None)
            .await;
        return error_response(
            StatusCode::BAD_REQUEST,
            ErrorKind::InvalidFormat.as_str(),
            "No audio attachment found",
        );
    };

    let pipeline = state.pipeline.clone();
    let ctx = ProcessingContext::new(user, state.outer_deadline);
    let run = tokio::spawn(async move { pipeline.run(&ctx, &audio).await });

    let outcome = match run.await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!(error = %e, "Pipeline task crashed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::GeneralError.as_str(),
                "Unexpected error",
            );
        }
    };

    match outcome.result {
        Ok(delivery) => (
            StatusCode::OK,
            Json(InboundEmailResponse {
                status: "ok",
                event_id: delivery
                    .event_persisted
                    .then(|| delivery.event_id.as_uuid().to_string()),
                enhancements_scheduled: delivery.enhancements_scheduled,
                metrics: outcome.metrics,
            }),
        )
            .into_response(),
        Err(error) => {
            let status = StatusCode::from_u16(error.kind().http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(InboundEmailErrorResponse {
                    error: error.kind().as_str().to_string(),
                    message: error.message().to_string(),
                    metrics: outcome.metrics,
                }),
            )
                .into_response()
        }
    }
}
