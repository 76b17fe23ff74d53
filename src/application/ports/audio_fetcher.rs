use async_trait::async_trait;

#[async_trait]
pub trait AudioFetcher: Send + Sync {
    /// Downloads `location`, refusing bodies larger than `max_bytes`.
    async fn fetch(&self, location: &str, max_bytes: u64) -> Result<Vec<u8>, DownloadError>;
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("attachment too large: {size} bytes exceeds limit of {limit} bytes")]
    TooLarge { size: u64, limit: u64 },
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("download timeout")]
    Timeout,
}
