use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{EventRepository, UserRepository};
use crate::application::services::{
    ApiTranscriptionService, EnhancementDispatcher, Notifier, PrimaryPipeline,
};

/// Everything a handler needs, assembled once from `Settings` at start-up.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PrimaryPipeline>,
    pub api_transcription: Arc<ApiTranscriptionService>,
    pub dispatcher: EnhancementDispatcher,
    pub user_repository: Arc<dyn UserRepository>,
    pub event_repository: Arc<dyn EventRepository>,
    pub notifier: Arc<Notifier>,
    pub webhook_signing_key: Arc<str>,
    pub background_secret: Arc<str>,
    pub outer_deadline: Duration,
}
