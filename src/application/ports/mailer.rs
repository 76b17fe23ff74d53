use async_trait::async_trait;

/// A rendered message for a named template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub template: &'static str,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rejected by provider: {0}")]
    Rejected(String),
}
