use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::background::BACKGROUND_ENHANCE_PATH;
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    enhance_handler, event_status_handler, health_handler, inbound_email_handler,
    transcribe_handler,
};
use crate::presentation::state::AppState;

/// Above the validator's limit so oversize uploads still get `file_too_large`.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/webhooks/inbound-email", post(inbound_email_handler))
        .route(BACKGROUND_ENHANCE_PATH, post(enhance_handler))
        .route("/api/v1/transcribe", post(transcribe_handler))
        .route("/api/v1/events/{id}", get(event_status_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(middleware::from_fn(request_id_middleware)),
        )
        .layer(cors)
        .with_state(state)
}
