use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::{Mailer, MailerError, OutboundEmail};

/// Sends through a transactional email HTTP API (`POST {base_url}/emails`).
pub struct HttpMailer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    from_address: String,
}

impl HttpMailer {
    pub fn new(api_key: String, base_url: String, from_address: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url,
            from_address,
        }
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    tags: [EmailTag<'a>; 1],
}

#[derive(Serialize)]
struct EmailTag<'a> {
    name: &'static str,
    value: &'a str,
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        let url = format!("{}/emails", self.base_url.trim_end_matches('/'));
        let body = SendEmailRequest {
            from: &self.from_address,
            to: [&email.to],
            subject: &email.subject,
            text: &email.body,
            tags: [EmailTag {
                name: "template",
                value: email.template,
            }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError::ApiRequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(MailerError::Rejected(format!("status {}: {}", status, body)));
        }

        Ok(())
    }
}
