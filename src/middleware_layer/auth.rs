use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    crypto::jwt,
    error::{AppError, AuthError},
    state::AppState,
};

/// The identity proven by a verified access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// The token's subject.
    pub user_id: Uuid,
}

/// Extracts the raw token from an `Authorization: Bearer <token>` header.
///
/// # Arguments
///
/// * `headers` - The request headers.
///
/// # Returns
///
/// The token, or `AuthError::Missing` when the header is absent, not
/// valid UTF-8, uses another scheme, or has no token segment.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Missing)?
        .to_str()
        .map_err(|_| AuthError::Missing)?;

    let mut segments = value.split_whitespace();
    match (segments.next(), segments.next(), segments.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("Bearer") => Ok(token),
        _ => Err(AuthError::Missing),
    }
}

/// Extracts and verifies the access token on a request.
pub fn authenticate(headers: &HeaderMap, secret: &[u8]) -> Result<AuthenticatedUser, AuthError> {
    let token = extract_bearer(headers)?;
    let user_id = jwt::validate_access_token(token, secret)?;
    Ok(AuthenticatedUser { user_id })
}

/// A middleware that requires a valid access token.
///
/// On success the [`AuthenticatedUser`] is stored in the request extensions
/// for the handler. On failure the request stops here with a 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let user = authenticate(request.headers(), &state.config.jwt_secret).map_err(|e| {
        tracing::debug!("❌ Rejected access token: {}", e);
        e
    })?;

    tracing::debug!("✅ User authenticated: {}", user.user_id);

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_token() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(extract_bearer(&headers("bearer  tok ")), Ok("tok"));
    }

    #[test]
    fn missing_header_is_an_error() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Err(AuthError::Missing));
    }

    #[test]
    fn header_without_token_is_an_error() {
        assert_eq!(extract_bearer(&headers("Bearer")), Err(AuthError::Missing));
        assert_eq!(extract_bearer(&headers("Bearer ")), Err(AuthError::Missing));
        assert_eq!(extract_bearer(&headers("")), Err(AuthError::Missing));
    }

    #[test]
    fn other_schemes_and_extra_segments_are_rejected() {
        assert_eq!(extract_bearer(&headers("Basic dXNlcjpwdw==")), Err(AuthError::Missing));
        assert_eq!(extract_bearer(&headers("Bearer a b")), Err(AuthError::Missing));
        assert_eq!(extract_bearer(&headers("abc")), Err(AuthError::Missing));
    }

    #[test]
    fn authenticate_checks_signature() {
        let user_id = Uuid::new_v4();
        let token = jwt::issue_access_token(user_id, b"secret", None).unwrap();
        let h = headers(&format!("Bearer {}", token));

        assert_eq!(authenticate(&h, b"secret"), Ok(AuthenticatedUser { user_id }));
        assert_eq!(authenticate(&h, b"other"), Err(AuthError::InvalidSignature));
    }
}
