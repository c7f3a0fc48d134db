use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AuthError, Result};

/// Upper bound for an access token's lifetime, in seconds.
pub const ACCESS_TOKEN_MAX_TTL_SECS: i64 = 3600;
/// The `iss` claim on every token we issue.
const ISSUER: &str = "chirpy";

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Issuer.
    pub iss: String,
    /// Subject: the user's id.
    pub sub: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// Maps a client-requested lifetime onto the lifetime actually granted.
///
/// Missing or non-positive requests get the ceiling; anything else is
/// clamped to it.
pub fn resolve_ttl(requested_secs: Option<i64>) -> Duration {
    match requested_secs {
        Some(secs) if secs > 0 => Duration::seconds(secs.min(ACCESS_TOKEN_MAX_TTL_SECS)),
        _ => Duration::seconds(ACCESS_TOKEN_MAX_TTL_SECS),
    }
}

/// Issues a signed access token for `user_id`.
///
/// # Arguments
///
/// * `user_id` - The subject of the token.
/// * `secret` - The HMAC signing secret.
/// * `requested_ttl_secs` - The lifetime the client asked for, if any.
///
/// # Returns
///
/// A `Result` containing the encoded JWT.
pub fn issue_access_token(
    user_id: Uuid,
    secret: &[u8],
    requested_ttl_secs: Option<i64>,
) -> Result<String> {
    issue_access_token_at(user_id, secret, requested_ttl_secs, Utc::now())
}

/// Issues an access token as if the current time were `now`.
pub fn issue_access_token_at(
    user_id: Uuid,
    secret: &[u8],
    requested_ttl_secs: Option<i64>,
    now: DateTime<Utc>,
) -> Result<String> {
    let expires_at = now + resolve_ttl(requested_ttl_secs);
    let claims = AccessClaims {
        iss: ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Verifies an access token and returns its subject.
///
/// The subject is only read after the signature and expiry have been
/// checked.
pub fn validate_access_token(token: &str, secret: &[u8]) -> std::result::Result<Uuid, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iat", "iss", "sub"]);

    let data = decode::<AccessClaims>(token, &DecodingKey::from_secret(secret), &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::InvalidSignature,
        })?;

    Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-signing-secret";

    #[test]
    fn ttl_defaults_to_ceiling() {
        assert_eq!(resolve_ttl(None), Duration::seconds(ACCESS_TOKEN_MAX_TTL_SECS));
        assert_eq!(resolve_ttl(Some(0)), Duration::seconds(ACCESS_TOKEN_MAX_TTL_SECS));
        assert_eq!(resolve_ttl(Some(-5)), Duration::seconds(ACCESS_TOKEN_MAX_TTL_SECS));
    }

    #[test]
    fn ttl_is_clamped_not_discarded() {
        assert_eq!(resolve_ttl(Some(60)), Duration::seconds(60));
        assert_eq!(resolve_ttl(Some(3600)), Duration::seconds(3600));
        assert_eq!(resolve_ttl(Some(86_400)), Duration::seconds(3600));
    }

    #[test]
    fn round_trips_subject() {
        let user_id = Uuid::new_v4();
        for ttl in [Some(1), Some(60), Some(ACCESS_TOKEN_MAX_TTL_SECS), None] {
            let token = issue_access_token(user_id, SECRET, ttl).unwrap();
            assert_eq!(validate_access_token(&token, SECRET), Ok(user_id));
        }
    }

    #[test]
    fn expiry_is_issued_at_plus_ttl() {
        let now = Utc::now();
        let token = issue_access_token_at(Uuid::new_v4(), SECRET, Some(120), now).unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        let claims = decode::<AccessClaims>(&token, &DecodingKey::from_secret(SECRET), &validation)
            .unwrap()
            .claims;
        assert_eq!(claims.exp - claims.iat, 120);
        assert_eq!(claims.iat, now.timestamp());
    }

    #[test]
    fn rejects_other_secret() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, None).unwrap();
        assert_eq!(
            validate_access_token(&token, b"another-secret"),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn rejects_expired_token() {
        let two_hours_ago = Utc::now() - Duration::hours(2);
        let token = issue_access_token_at(Uuid::new_v4(), SECRET, None, two_hours_ago).unwrap();
        assert_eq!(validate_access_token(&token, SECRET), Err(AuthError::Expired));
    }

    #[test]
    fn rejects_tampered_payload() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, None).unwrap();
        let other = issue_access_token(Uuid::new_v4(), SECRET, None).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let forged = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);
        assert_eq!(validate_access_token(&forged, SECRET), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(validate_access_token("", SECRET), Err(AuthError::InvalidSignature));
        assert_eq!(
            validate_access_token("not.a.jwt", SECRET),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn rejects_non_uuid_subject() {
        let now = Utc::now();
        let claims = AccessClaims {
            iss: ISSUER.to_string(),
            sub: "alice".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(5)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        assert_eq!(validate_access_token(&token, SECRET), Err(AuthError::Malformed));
    }
}
