mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    BackgroundSettings, BackgroundTransport, DatabaseSettings, LlmSettings, LoggingSettings,
    MailProvider, MailSettings, PipelineSettings, RateLimitSettings, RateLimitStoreSetting,
    ServerSettings, Settings, TranscriptionProviderSetting, TranscriptionSettings,
    WebhookSettings,
};
