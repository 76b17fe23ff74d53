use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{Mailer, OutboundEmail};
use crate::domain::{EnhancementKind, ErrorKind};

use super::email_templates::{
    EmailTemplate, enhancement_failure_template, enhancement_template, error_template,
    success_template,
};

pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Renders templates and hands them to the mailer. Every method makes exactly
/// one attempt and reports delivery as a bool; send failures end here.
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    send_timeout: Duration,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, send_timeout: Duration) -> Self {
        Self {
            mailer,
            send_timeout,
        }
    }

    pub async fn notify_success(&self, to: &str, filename: &str, transcript: &str) -> bool {
        self.deliver(to, success_template(filename, transcript)).await
    }

    pub async fn notify_error(&self, to: &str, kind: ErrorKind, filename: Option<&str>) -> bool {
        self.deliver(to, error_template(kind, filename)).await
    }

    pub async fn notify_enhancement(
        &self,
        to: &str,
        kind: EnhancementKind,
        filename: &str,
        content: &str,
        original: &str,
    ) -> bool {
        self.deliver(to, enhancement_template(kind, filename, content, original))
            .await
    }

    pub async fn notify_enhancement_failure(
        &self,
        to: &str,
        kind: EnhancementKind,
        filename: &str,
    ) -> bool {
        self.deliver(to, enhancement_failure_template(kind, filename))
            .await
    }

    async fn deliver(&self, to: &str, template: EmailTemplate) -> bool {
        let email = OutboundEmail {
            to: to.to_string(),
            template: template.name,
            subject: template.subject,
            body: template.body,
        };

        match tokio::time::timeout(self.send_timeout, self.mailer.send(&email)).await {
            Ok(Ok(())) => {
                tracing::info!(template = email.template, "Email delivered");
                true
            }
            Ok(Err(e)) => {
                tracing::error!(error = %e, template = email.template, "Email delivery failed");
                false
            }
            Err(_) => {
                tracing::error!(
                    template = email.template,
                    timeout_ms = self.send_timeout.as_millis() as u64,
                    "Email delivery timed out"
                );
                false
            }
        }
    }
}
