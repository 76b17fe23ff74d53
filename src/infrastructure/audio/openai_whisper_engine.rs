use async_trait::async_trait;
use reqwest::multipart::Form;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::{send_upload, voice_note_part};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "whisper-1";

/// Whisper behind the OpenAI-compatible `/audio/transcriptions` route. Asks
/// for `response_format=text` so the body is the transcript itself.
pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiWhisperEngine {
    pub fn new(api_key: String, base_url: Option<String>, model: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/audio/transcriptions", base_url.trim_end_matches('/')),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
    ) -> Result<String, TranscriptionError> {
        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "text")
            .part("file", voice_note_part(audio_data, filename)?);

        tracing::debug!(model = %self.model, bytes = audio_data.len(), "Uploading voice note to Whisper");

        let transcript = send_upload(
            self.client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .multipart(form),
        )
        .await?;

        tracing::info!(chars = transcript.len(), "Whisper transcription received");
        Ok(transcript)
    }
}
