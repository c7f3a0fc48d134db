use uuid::Uuid;

use crate::crypto::{jwt, password, refresh_token};
use crate::error::{AppError, AuthError, Result, StorageError};
use crate::models::{refresh_token::RefreshToken, user::User};
use crate::state::AppState;

/// What a successful login hands back to the client.
pub struct LoginOutcome {
    /// The authenticated user.
    pub user: User,
    /// A short-lived access token.
    pub access_token: String,
    /// A long-lived refresh token. Only its digest is stored.
    pub refresh_token: String,
}

/// Creates a new user.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `email` - The user's email address.
/// * `password` - The user's plaintext password.
///
/// # Returns
///
/// A `Result` containing the created `User`.
pub async fn register(state: &AppState, email: &str, password: &str) -> Result<User> {
    tracing::debug!("🔐 Creating user");
    let hashed_password = password::hash_password(password)?;
    let user = state.store.create_user(email, &hashed_password).await?;

    tracing::info!("✅ User created with ID: {}", user.id);
    Ok(user)
}

/// Authenticates a user and issues an access/refresh token pair.
///
/// Unknown email and wrong password produce the same error.
pub async fn login(
    state: &AppState,
    email: &str,
    password: &str,
    requested_ttl_secs: Option<i64>,
) -> Result<LoginOutcome> {
    let user = match state.store.get_user_by_email(email).await {
        Ok(user) => user,
        Err(StorageError::NotFound) => return Err(AuthError::InvalidCredentials.into()),
        Err(e) => return Err(e.into()),
    };

    if !password::verify_password(&user.hashed_password, password) {
        return Err(AuthError::InvalidCredentials.into());
    }

    let access_token = jwt::issue_access_token(user.id, &state.config.jwt_secret, requested_ttl_secs)?;

    let refresh_token = refresh_token::generate_refresh_token()?;
    let record = RefreshToken::issue(user.id, state.config.refresh_token_days).ok_or_else(|| {
        AppError::Internal("Refresh token expiry out of range".to_string())
    })?;
    state
        .store
        .save_refresh_token(&refresh_token::hash_refresh_token(&refresh_token), &record)
        .await?;

    tracing::info!("✅ User authenticated: {}", user.id);

    Ok(LoginOutcome {
        user,
        access_token,
        refresh_token,
    })
}

/// Resolves a refresh token to its owner.
///
/// Missing, expired and revoked tokens all become `AuthError::Invalid`.
pub async fn resolve_refresh_token(state: &AppState, token: &str) -> Result<Uuid> {
    match state
        .store
        .resolve_user_by_refresh_token(&refresh_token::hash_refresh_token(token))
        .await
    {
        Ok(user_id) => Ok(user_id),
        Err(StorageError::NotFound) => Err(AuthError::Invalid.into()),
        Err(e) => Err(e.into()),
    }
}

/// Exchanges a refresh token for a new access token with the default lifetime.
pub async fn refresh_access_token(state: &AppState, token: &str) -> Result<String> {
    let user_id = resolve_refresh_token(state, token).await?;
    let access_token = jwt::issue_access_token(user_id, &state.config.jwt_secret, None)?;

    tracing::info!("🔄 Access token refreshed for user: {}", user_id);
    Ok(access_token)
}

/// Revokes a refresh token.
pub async fn revoke_refresh_token(state: &AppState, token: &str) -> Result<()> {
    match state
        .store
        .revoke_refresh_token(&refresh_token::hash_refresh_token(token))
        .await
    {
        Ok(()) => {
            tracing::info!("✅ Refresh token revoked");
            Ok(())
        }
        Err(StorageError::NotFound) => Err(AuthError::Invalid.into()),
        Err(e) => Err(e.into()),
    }
}
