use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use voxmail::application::ports::{
    AudioFetcher, BackgroundDispatcher, CompletionRequest, DispatchError, DownloadError,
    EnhancementRequest, LlmClient, LlmClientError, Mailer, MailerError, OutboundEmail,
    TranscriptionEngine, TranscriptionError,
};
use voxmail::domain::{EnhancementKind, EnhancementKinds, User, UserId, UserSlug};

pub fn test_user(kinds: &[EnhancementKind]) -> User {
    User {
        id: UserId::new(),
        email: "listener@example.com".to_string(),
        slug: UserSlug::parse("ab12cd").unwrap(),
        approved: true,
        enhancement_kinds: kinds.iter().copied().collect::<EnhancementKinds>(),
        api_key: Some("0123456789abcdef0123456789abcdef".to_string()),
    }
}

#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutboundEmail>>,
    pub failing_templates: Vec<&'static str>,
}

impl RecordingMailer {
    pub fn failing_on(templates: &[&'static str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_templates: templates.to_vec(),
        }
    }

    pub fn templates(&self) -> Vec<&'static str> {
        self.sent.lock().unwrap().iter().map(|e| e.template).collect()
    }
}

#[async_trait::async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailerError> {
        if self.failing_templates.contains(&email.template) {
            return Err(MailerError::Rejected("mailbox unavailable".to_string()));
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

pub struct StubFetcher {
    pub bytes: Vec<u8>,
    pub delay: Duration,
}

impl StubFetcher {
    pub fn returning(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            delay: Duration::ZERO,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            bytes: vec![0u8; 32_000],
            delay,
        }
    }
}

#[async_trait::async_trait]
impl AudioFetcher for StubFetcher {
    async fn fetch(&self, _location: &str, max_bytes: u64) -> Result<Vec<u8>, DownloadError> {
        tokio::time::sleep(self.delay).await;
        if self.bytes.len() as u64 > max_bytes {
            return Err(DownloadError::TooLarge {
                size: self.bytes.len() as u64,
                limit: max_bytes,
            });
        }
        Ok(self.bytes.clone())
    }
}

pub struct StubEngine {
    pub text: String,
    pub delay: Duration,
}

impl StubEngine {
    pub fn returning(text: &str) -> Self {
        Self {
            text: text.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            text: "too late".to_string(),
            delay,
        }
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for StubEngine {
    async fn transcribe(&self, _audio: &[u8], _filename: &str) -> Result<String, TranscriptionError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.text.clone())
    }
}

pub struct FailingEngine(pub fn() -> TranscriptionError);

#[async_trait::async_trait]
impl TranscriptionEngine for FailingEngine {
    async fn transcribe(&self, _audio: &[u8], _filename: &str) -> Result<String, TranscriptionError> {
        Err((self.0)())
    }
}

/// Answers by matching the system prompt to an enhancement kind.
#[derive(Default)]
pub struct ScriptedLlm {
    pub replies: HashMap<EnhancementKind, Result<String, String>>,
    pub delay: Duration,
    pub delays: HashMap<EnhancementKind, Duration>,
}

impl ScriptedLlm {
    pub fn with(mut self, kind: EnhancementKind, reply: Result<&str, &str>) -> Self {
        self.replies
            .insert(kind, reply.map(str::to_string).map_err(str::to_string));
        self
    }

    pub fn stalling(mut self, kind: EnhancementKind, delay: Duration) -> Self {
        self.delays.insert(kind, delay);
        self
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmClientError> {
        let kind = if request.system_prompt.starts_with("You summarize") {
            EnhancementKind::Summary
        } else {
            EnhancementKind::Cleanup
        };
        let delay = self.delays.get(&kind).copied().unwrap_or(self.delay);
        tokio::time::sleep(delay).await;
        match self.replies.get(&kind) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(e)) => Err(LlmClientError::ApiRequestFailed(e.clone())),
            None => Err(LlmClientError::InvalidResponse("no scripted reply".to_string())),
        }
    }
}

#[derive(Default)]
pub struct RecordingDispatcher {
    pub scheduled: Mutex<Vec<EnhancementRequest>>,
    refuse: bool,
}

impl RecordingDispatcher {
    /// Every `schedule` call fails as if the queue were full.
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl BackgroundDispatcher for RecordingDispatcher {
    async fn schedule(&self, request: EnhancementRequest) -> Result<(), DispatchError> {
        if self.refuse {
            return Err(DispatchError::QueueFull);
        }
        self.scheduled.lock().unwrap().push(request);
        Ok(())
    }
}
