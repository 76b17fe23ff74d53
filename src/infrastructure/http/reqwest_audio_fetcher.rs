use async_trait::async_trait;
use futures::StreamExt;

use crate::application::ports::{AudioFetcher, DownloadError};

/// Downloads stored attachments, optionally with the mail provider's
/// basic-auth credentials.
pub struct ReqwestAudioFetcher {
    client: reqwest::Client,
    credentials: Option<(String, String)>,
}

impl ReqwestAudioFetcher {
    pub fn new(credentials: Option<(String, String)>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
        }
    }
}

#[async_trait]
impl AudioFetcher for ReqwestAudioFetcher {
    async fn fetch(&self, location: &str, max_bytes: u64) -> Result<Vec<u8>, DownloadError> {
        let mut request = self.client.get(location);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(map_request_error)?;

        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status().as_u16()));
        }

        if let Some(declared) = response.content_length() {
            if declared > max_bytes {
                return Err(DownloadError::TooLarge {
                    size: declared,
                    limit: max_bytes,
                });
            }
        }

        let capacity = response.content_length().unwrap_or(0).min(max_bytes) as usize;
        let mut body = Vec::with_capacity(capacity);
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_request_error)?;
            body.extend_from_slice(&chunk);
            // Content-Length can be missing or wrong; the received size is what counts.
            if body.len() as u64 > max_bytes {
                return Err(DownloadError::TooLarge {
                    size: body.len() as u64,
                    limit: max_bytes,
                });
            }
        }

        tracing::debug!(bytes = body.len(), "Attachment body received");
        Ok(body)
    }
}

fn map_request_error(e: reqwest::Error) -> DownloadError {
    if e.is_timeout() {
        DownloadError::Timeout
    } else {
        DownloadError::RequestFailed(e.to_string())
    }
}
