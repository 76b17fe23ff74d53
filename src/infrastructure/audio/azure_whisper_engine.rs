use async_trait::async_trait;
use reqwest::multipart::Form;
use serde::Deserialize;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};

use super::{send_upload, voice_note_part};

/// A Whisper deployment on Azure OpenAI. The deployment name stands in for
/// the model and authentication uses the `api-key` header.
pub struct AzureWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Deserialize)]
struct AzureTranscription {
    text: String,
}

impl AzureWhisperEngine {
    pub fn new(base_url: &str, deployment: &str, api_key: &str, api_version: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/openai/deployments/{}/audio/transcriptions?api-version={}",
                base_url.trim_end_matches('/'),
                deployment,
                api_version,
            ),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl TranscriptionEngine for AzureWhisperEngine {
    async fn transcribe(
        &self,
        audio_data: &[u8],
        filename: &str,
    ) -> Result<String, TranscriptionError> {
        let form = Form::new().part("file", voice_note_part(audio_data, filename)?);

        tracing::debug!(endpoint = %self.endpoint, bytes = audio_data.len(), "Uploading voice note to Azure Whisper");

        let body = send_upload(
            self.client
                .post(&self.endpoint)
                .header("api-key", &self.api_key)
                .multipart(form),
        )
        .await?;

        let parsed: AzureTranscription = serde_json::from_str(&body)
            .map_err(|e| TranscriptionError::ApiRequestFailed(format!("parse response: {}", e)))?;

        tracing::info!(chars = parsed.text.len(), "Azure Whisper transcription received");
        Ok(parsed.text)
    }
}
