use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use voxmail::application::ports::{
    BackgroundDispatcher, EventRepository, LlmClient, Mailer, RateLimitStore, UserRepository,
};
use voxmail::application::services::{
    ApiTranscriptionService, AudioDownloader, AudioValidator, DEFAULT_SEND_TIMEOUT,
    EnhancementDispatcher, EnhancementWorker, Notifier, PrimaryPipeline, RateLimitPolicy,
    RateLimiter, Transcriber,
};
use voxmail::infrastructure::audio::TranscriptionEngineFactory;
use voxmail::infrastructure::background::{ChannelDispatcher, SelfCallDispatcher};
use voxmail::infrastructure::http::ReqwestAudioFetcher;
use voxmail::infrastructure::llm::{MockLlmClient, OpenAiClient};
use voxmail::infrastructure::mail::{HttpMailer, LogMailer};
use voxmail::infrastructure::observability::{TracingConfig, init_tracing};
use voxmail::infrastructure::persistence::{
    InMemoryEventRepository, InMemoryUserRepository, PgEventRepository, PgUserRepository,
    create_pool, run_migrations,
};
use voxmail::infrastructure::rate_limit::{InMemoryRateLimitStore, PgRateLimitStore};
use voxmail::presentation::config::{
    BackgroundTransport, MailProvider, RateLimitStoreSetting,
};
use voxmail::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = match env::var("APP_ENVIRONMENT") {
        Ok(raw) => raw.parse::<Environment>().map_err(anyhow::Error::msg)?,
        Err(_) => Environment::default(),
    };

    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(environment, &settings.logging));

    let pool = match &settings.database.url {
        Some(url) => {
            let pool = create_pool(url, settings.database.max_connections).await?;
            if settings.database.run_migrations {
                run_migrations(&pool).await?;
            }
            Some(pool)
        }
        None => {
            tracing::warn!("No database configured, using in-memory repositories");
            None
        }
    };

    let (event_repository, user_repository): (Arc<dyn EventRepository>, Arc<dyn UserRepository>) =
        match &pool {
            Some(pool) => (
                Arc::new(PgEventRepository::new(pool.clone())),
                Arc::new(PgUserRepository::new(pool.clone())),
            ),
            None => (
                Arc::new(InMemoryEventRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
            ),
        };

    let rate_limit_store: Arc<dyn RateLimitStore> = match (settings.rate_limit.store, &pool) {
        (RateLimitStoreSetting::Postgres, Some(pool)) => {
            Arc::new(PgRateLimitStore::new(pool.clone()))
        }
        (RateLimitStoreSetting::Postgres, None) => {
            tracing::warn!("Postgres rate limit store requested without a database, using memory");
            Arc::new(InMemoryRateLimitStore::new())
        }
        (RateLimitStoreSetting::Memory, _) => Arc::new(InMemoryRateLimitStore::new()),
    };

    let mailer: Arc<dyn Mailer> = match settings.mail.provider {
        MailProvider::Http => Arc::new(HttpMailer::new(
            settings.mail.api_key.clone(),
            settings.mail.base_url.clone(),
            settings.mail.from_address.clone(),
        )),
        MailProvider::Log => Arc::new(LogMailer),
    };
    let notifier = Arc::new(Notifier::new(mailer, DEFAULT_SEND_TIMEOUT));

    let llm_client: Arc<dyn LlmClient> = if settings.llm.api_key.is_empty() {
        tracing::warn!("No LLM API key configured, enhancements use the mock client");
        Arc::new(MockLlmClient)
    } else {
        Arc::new(OpenAiClient::new(
            settings.llm.api_key.clone(),
            settings.llm.base_url.clone(),
            settings.llm.model.clone(),
        ))
    };

    let engine = TranscriptionEngineFactory::create(&settings.transcription)
        .context("Failed to create transcription engine")?;

    let dispatcher = EnhancementDispatcher::new(
        llm_client,
        Arc::clone(&notifier),
        Arc::clone(&event_repository),
        settings.background.deadline(),
    );

    let background: Arc<dyn BackgroundDispatcher> = match settings.background.transport {
        BackgroundTransport::Http => Arc::new(SelfCallDispatcher::new(
            &settings.server.public_base_url,
            &settings.background.shared_secret,
            settings.background.deadline(),
            Arc::clone(&event_repository),
        )),
        BackgroundTransport::Channel => {
            let (sender, receiver) = mpsc::channel(settings.background.queue_capacity);
            let worker = EnhancementWorker::new(receiver, dispatcher.clone());
            tokio::spawn(worker.run());
            tracing::info!("Background enhancement worker started");
            Arc::new(ChannelDispatcher::new(sender))
        }
    };

    let validator = AudioValidator::new(settings.pipeline.max_file_size_bytes);
    let fetcher = Arc::new(ReqwestAudioFetcher::new(settings.webhook.fetch_credentials()));

    let pipeline = Arc::new(PrimaryPipeline::new(
        validator.clone(),
        AudioDownloader::new(
            fetcher,
            settings.pipeline.download_timeout(),
            settings.pipeline.max_file_size_bytes,
        ),
        Transcriber::new(Arc::clone(&engine), settings.pipeline.transcription_timeout()),
        Arc::clone(&event_repository),
        Arc::clone(&notifier),
        background,
        settings.pipeline.sla_warning(),
    ));

    let rate_limiter = Arc::new(RateLimiter::new(
        rate_limit_store,
        RateLimitPolicy {
            max_requests: settings.rate_limit.max_requests,
            window: std::time::Duration::from_secs(settings.rate_limit.window_secs),
        },
    ));

    let api_transcription = Arc::new(ApiTranscriptionService::new(
        validator,
        Transcriber::new(engine, settings.pipeline.transcription_timeout()),
        Arc::clone(&event_repository),
        rate_limiter,
        settings.pipeline.outer_deadline(),
    ));

    let state = AppState {
        pipeline,
        api_transcription,
        dispatcher,
        user_repository,
        event_repository,
        notifier,
        webhook_signing_key: settings.webhook.signing_key.as_str().into(),
        background_secret: settings.background.shared_secret.as_str().into(),
        outer_deadline: settings.pipeline.outer_deadline(),
    };

    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(environment = %environment, "Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
