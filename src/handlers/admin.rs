use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, Result},
    extract::AppJson,
    state::AppState,
    validation::chirp::filter_chirp,
};

/// The request payload for validating a chirp without posting it.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidateChirpRequest {
    pub body: String,
}

/// The response payload for chirp validation.
#[derive(Serialize)]
pub struct ValidateChirpResponse {
    pub cleaned_body: String,
}

/// Readiness check.
pub async fn healthz() -> &'static str {
    "OK"
}

/// Reports how many requests the file server has handled.
#[axum::debug_handler]
pub async fn metrics(State(state): State<AppState>) -> String {
    format!("Hits: {}", state.hits.get())
}

/// Resets the hit counter and, on the dev platform, deletes all users.
#[axum::debug_handler]
pub async fn reset(State(state): State<AppState>) -> Result<Response> {
    state.hits.reset();

    if !state.config.is_dev() {
        tracing::warn!("❌ Reset refused on platform {}", state.config.platform);
        return Err(AppError::Forbidden);
    }

    let deleted = state.store.delete_all_users().await?;
    tracing::info!("🧹 Reset: hit counter cleared, {} users deleted", deleted);

    Ok((StatusCode::OK, "Hits reset to 0 and all users deleted").into_response())
}

/// Runs the content filter on a body and returns the cleaned text.
pub async fn validate_chirp(AppJson(req): AppJson<ValidateChirpRequest>) -> Result<Response> {
    let cleaned_body = filter_chirp(&req.body)?;
    Ok((StatusCode::OK, Json(ValidateChirpResponse { cleaned_body })).into_response())
}
