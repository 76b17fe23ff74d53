use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{AudioFetcher, DownloadError};
use crate::domain::ErrorKind;

use super::{Deadline, PipelineError, StageOutcome};

pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches attachment bytes under its own budget, bounded by the outer deadline.
pub struct AudioDownloader {
    fetcher: Arc<dyn AudioFetcher>,
    timeout: Duration,
    max_bytes: u64,
}

impl AudioDownloader {
    pub fn new(fetcher: Arc<dyn AudioFetcher>, timeout: Duration, max_bytes: u64) -> Self {
        Self {
            fetcher,
            timeout,
            max_bytes,
        }
    }

    #[tracing::instrument(skip_all)]
    pub async fn download(
        &self,
        location: &str,
        deadline: &Deadline,
    ) -> Result<Vec<u8>, PipelineError> {
        let outcome = deadline
            .run_stage(self.timeout, self.fetcher.fetch(location, self.max_bytes))
            .await;

        match outcome {
            StageOutcome::Completed(Ok(bytes)) => {
                tracing::debug!(bytes = bytes.len(), "Attachment downloaded");
                Ok(bytes)
            }
            StageOutcome::Completed(Err(DownloadError::Timeout)) | StageOutcome::StageTimedOut => {
                Err(PipelineError::new(
                    ErrorKind::DownloadTimeout,
                    format!(
                        "Attachment download did not finish within {}s",
                        self.timeout.as_secs()
                    ),
                ))
            }
            StageOutcome::Completed(Err(e @ DownloadError::TooLarge { .. })) => {
                Err(PipelineError::new(ErrorKind::FileTooLarge, e.to_string()))
            }
            StageOutcome::Completed(Err(e)) => Err(PipelineError::new(
                ErrorKind::GeneralError,
                format!("Attachment download failed: {}", e),
            )),
            StageOutcome::DeadlineExceeded => Err(PipelineError::new(
                ErrorKind::ProcessingTimeout,
                "Processing deadline reached while downloading the attachment",
            )),
        }
    }
}
