use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{AppError, Result, ValidationError},
    extract::AppJson,
    middleware_layer::auth::extract_bearer,
    models::user::User,
    services::auth as auth_service,
    state::AppState,
};

/// The request payload for user registration.
#[derive(Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[garde(email)]
    pub email: String,
    #[garde(length(min = 1, max = 128))]
    pub password: String,
}

/// The request payload for user login.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// A user as shown to clients. No password hash.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
        }
    }
}

/// The response payload for a successful login.
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

/// The response payload for a token refresh.
#[derive(Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<Response> {
    payload
        .validate()
        .map_err(|report| AppError::Validation(ValidationError::Malformed(report.to_string())))?;

    let user = auth_service::register(&state, &payload.email, &payload.password).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))).into_response())
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Response> {
    let outcome = auth_service::login(
        &state,
        &payload.email,
        &payload.password,
        payload.expires_in_seconds,
    )
    .await?;

    let response = LoginResponse {
        user: UserResponse::from(outcome.user),
        token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    };

    Ok((StatusCode::OK, Json(response)).into_response())
}

/// Exchanges the bearer refresh token for a new access token.
#[axum::debug_handler]
pub async fn refresh(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let refresh_token = extract_bearer(&headers)?;
    let token = auth_service::refresh_access_token(&state, refresh_token).await?;

    Ok((StatusCode::OK, Json(TokenResponse { token })).into_response())
}

/// Revokes the bearer refresh token.
#[axum::debug_handler]
pub async fn revoke(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let refresh_token = extract_bearer(&headers)?;
    auth_service::revoke_refresh_token(&state, refresh_token).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
