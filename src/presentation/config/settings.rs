use std::time::Duration;

use config::{Config, File};
use serde::Deserialize;

use crate::application::services::{
    DEFAULT_BACKGROUND_DEADLINE, DEFAULT_DOWNLOAD_TIMEOUT, DEFAULT_MAX_FILE_SIZE_BYTES,
    DEFAULT_OUTER_DEADLINE, DEFAULT_SLA_WARNING, DEFAULT_TRANSCRIPTION_TIMEOUT,
};

use super::Environment;

/// Immutable application settings, loaded once at start-up.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub pipeline: PipelineSettings,
    pub background: BackgroundSettings,
    pub webhook: WebhookSettings,
    pub transcription: TranscriptionSettings,
    pub llm: LlmSettings,
    pub mail: MailSettings,
    pub rate_limit: RateLimitSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub public_base_url: String,
}

/// Without a `url` the service runs on in-memory repositories.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: u32,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub outer_deadline_secs: u64,
    pub download_timeout_secs: u64,
    pub transcription_timeout_secs: u64,
    pub max_file_size_bytes: u64,
    pub sla_warning_ms: u64,
}

impl PipelineSettings {
    pub fn outer_deadline(&self) -> Duration {
        Duration::from_secs(self.outer_deadline_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn transcription_timeout(&self) -> Duration {
        Duration::from_secs(self.transcription_timeout_secs)
    }

    pub fn sla_warning(&self) -> Duration {
        Duration::from_millis(self.sla_warning_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackgroundSettings {
    pub transport: BackgroundTransport,
    pub deadline_secs: u64,
    pub shared_secret: String,
    pub queue_capacity: usize,
}

impl BackgroundSettings {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundTransport {
    /// Authenticated HTTP call back into this service.
    Http,
    /// Worker task fed through a bounded channel.
    Channel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookSettings {
    pub signing_key: String,
    pub fetch_username: Option<String>,
    pub fetch_password: Option<String>,
}

impl WebhookSettings {
    pub fn fetch_credentials(&self) -> Option<(String, String)> {
        match (&self.fetch_username, &self.fetch_password) {
            (Some(user), Some(password)) => Some((user.clone(), password.clone())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProviderSetting,
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub azure_api_version: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProviderSetting {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MailSettings {
    pub provider: MailProvider,
    pub api_key: String,
    pub base_url: String,
    pub from_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    Http,
    Log,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitSettings {
    pub store: RateLimitStoreSetting,
    pub max_requests: u32,
    pub window_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateLimitStoreSetting {
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Settings {
    /// Layers `appsettings.{environment}` (optional) under `APP_`-prefixed
    /// environment variables, e.g. `APP_PIPELINE__OUTER_DEADLINE_SECS=60`.
    pub fn load(environment: Environment) -> Result<Self, config::ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.public_base_url", "http://localhost:3000")?
            .set_default("database.max_connections", 10)?
            .set_default("database.run_migrations", true)?
            .set_default("pipeline.outer_deadline_secs", DEFAULT_OUTER_DEADLINE.as_secs())?
            .set_default("pipeline.download_timeout_secs", DEFAULT_DOWNLOAD_TIMEOUT.as_secs())?
            .set_default(
                "pipeline.transcription_timeout_secs",
                DEFAULT_TRANSCRIPTION_TIMEOUT.as_secs(),
            )?
            .set_default("pipeline.max_file_size_bytes", DEFAULT_MAX_FILE_SIZE_BYTES)?
            .set_default("pipeline.sla_warning_ms", DEFAULT_SLA_WARNING.as_millis() as u64)?
            .set_default("background.transport", "channel")?
            .set_default("background.deadline_secs", DEFAULT_BACKGROUND_DEADLINE.as_secs())?
            .set_default("background.shared_secret", "")?
            .set_default("background.queue_capacity", 64)?
            .set_default("webhook.signing_key", "")?
            .set_default("transcription.provider", "openai")?
            .set_default("transcription.api_key", "")?
            .set_default("transcription.model", "whisper-1")?
            .set_default("llm.api_key", "")?
            .set_default("llm.model", "gpt-4o-mini")?
            .set_default("mail.provider", "log")?
            .set_default("mail.api_key", "")?
            .set_default("mail.base_url", "https://api.resend.com")?
            .set_default("mail.from_address", "transcripts@localhost")?
            .set_default("rate_limit.store", "memory")?
            .set_default("rate_limit.max_requests", 30)?
            .set_default("rate_limit.window_secs", 3600)?
            .set_default("logging.level", "info,voxmail=debug,tower_http=debug")?
            .set_default("logging.enable_json", environment.is_production())?
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
