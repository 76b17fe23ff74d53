use std::sync::LazyLock;

use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, StatusCode};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use regex::Regex;

use crate::domain::Caller;
use crate::presentation::handlers::ErrorResponse;
use crate::presentation::state::AppState;

static API_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{32}$").expect("valid api key pattern"));

/// Pulls the bearer token out of an `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Resolves the caller from a 32-hex API key. Malformed or unknown keys
/// resolve to `Anonymous`; only a repository failure rejects the request.
impl FromRequestParts<AppState> for Caller {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(key) = bearer_token(&parts.headers).filter(|k| API_KEY_PATTERN.is_match(k)) else {
            return Ok(Caller::Anonymous);
        };

        match state.user_repository.find_by_api_key(key).await {
            Ok(Some(user)) => Ok(Caller::Authenticated(user)),
            Ok(None) => Ok(Caller::Anonymous),
            Err(e) => {
                tracing::error!(error = %e, "Failed to resolve API key");
                Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new("general_error", "Failed to resolve caller")),
                )
                    .into_response())
            }
        }
    }
}
