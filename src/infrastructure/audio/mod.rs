mod azure_whisper_engine;
mod openai_whisper_engine;
mod transcription_engine_factory;

use reqwest::{RequestBuilder, StatusCode, multipart};

use crate::application::ports::TranscriptionError;

pub use azure_whisper_engine::AzureWhisperEngine;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use transcription_engine_factory::TranscriptionEngineFactory;

/// MIME type sent to the engine, derived from the attachment's extension.
pub fn mime_for_filename(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "m4a" => "audio/mp4",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

/// The `file` part every Whisper-compatible endpoint expects.
fn voice_note_part(audio: &[u8], filename: &str) -> Result<multipart::Part, TranscriptionError> {
    multipart::Part::bytes(audio.to_vec())
        .file_name(filename.to_string())
        .mime_str(mime_for_filename(filename))
        .map_err(|e| TranscriptionError::ApiRequestFailed(format!("mime: {}", e)))
}

/// Sends the upload and returns the raw body of a successful response.
async fn send_upload(request: RequestBuilder) -> Result<String, TranscriptionError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            TranscriptionError::Timeout
        } else {
            TranscriptionError::ApiRequestFailed(format!("request: {}", e))
        }
    })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TranscriptionError::ApiRequestFailed(format!("body: {}", e)));

    if status.is_success() {
        body
    } else {
        Err(status_error(
            status,
            body.unwrap_or_else(|_| "unknown error".to_string()),
        ))
    }
}

fn status_error(status: StatusCode, body: String) -> TranscriptionError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => TranscriptionError::RateLimited(body),
        StatusCode::PAYLOAD_TOO_LARGE => {
            TranscriptionError::ApiRequestFailed(format!("file too large: {}", body))
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => TranscriptionError::Timeout,
        _ => TranscriptionError::ApiRequestFailed(format!("status {}: {}", status, body)),
    }
}
