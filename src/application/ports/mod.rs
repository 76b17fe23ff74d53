mod audio_fetcher;
mod background_dispatcher;
mod event_repository;
mod llm_client;
mod mailer;
mod rate_limit_store;
mod repository_error;
mod transcription_engine;
mod user_repository;

pub use audio_fetcher::{AudioFetcher, DownloadError};
pub use background_dispatcher::{BackgroundDispatcher, DispatchError, EnhancementRequest};
pub use event_repository::EventRepository;
pub use llm_client::{CompletionRequest, LlmClient, LlmClientError};
pub use mailer::{Mailer, MailerError, OutboundEmail};
pub use rate_limit_store::{RateLimitError, RateLimitStore, WindowCount};
pub use repository_error::RepositoryError;
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
pub use user_repository::UserRepository;
