use crate::application::ports::{Mailer, MailerError, OutboundEmail};
use crate::infrastructure::observability::sanitize_transcript;

/// Writes outgoing mail to the log instead of sending it.
pub struct LogMailer;

#[async_trait::async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        tracing::info!(
            to = %email.to,
            template = email.template,
            subject = %email.subject,
            body = %sanitize_transcript(&email.body),
            "Email (log only)"
        );
        Ok(())
    }
}
