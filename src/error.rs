use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Authentication and authorization failures. All of them map to 401.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No usable bearer token in the `Authorization` header.
    #[error("Missing or malformed bearer token")]
    Missing,

    /// The token could not be verified with the signing secret.
    #[error("Invalid token signature")]
    InvalidSignature,

    /// The token verified but its expiry is in the past.
    #[error("Token has expired")]
    Expired,

    /// A verified token carries claims we cannot use.
    #[error("Malformed token claims")]
    Malformed,

    /// The authenticated user is not the author named in the request.
    #[error("Authenticated user does not match requested author")]
    Mismatch,

    /// A refresh token that is unknown, expired or revoked.
    #[error("Invalid refresh token")]
    Invalid,

    /// Wrong email or wrong password. Deliberately indistinguishable.
    #[error("Incorrect email or password")]
    InvalidCredentials,
}

/// Bad client input. Maps to 400.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The chirp body exceeds the maximum length.
    #[error("Chirp is too long")]
    TooLong {
        /// Length of the submitted body in characters.
        length: usize,
        /// The configured maximum.
        max: usize,
    },

    /// The request could not be decoded or failed field validation.
    #[error("{0}")]
    Malformed(String),
}

/// Failures reported by the storage collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The requested record does not exist.
    #[error("Record not found")]
    NotFound,

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backend failed or could not be reached.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<tokio_postgres::Error> for StorageError {
    fn from(e: tokio_postgres::Error) -> Self {
        if e.code() == Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION) {
            StorageError::Conflict(e.to_string())
        } else {
            StorageError::Unavailable(e.to_string())
        }
    }
}

impl From<deadpool_postgres::PoolError> for StorageError {
    fn from(e: deadpool_postgres::PoolError) -> Self {
        StorageError::Unavailable(format!("pool: {}", e))
    }
}

impl From<redis::RedisError> for StorageError {
    fn from(e: redis::RedisError) -> Self {
        StorageError::Unavailable(format!("redis: {}", e))
    }
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// An authentication error.
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A storage error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The operation is not allowed on this platform.
    #[error("Forbidden")]
    Forbidden,

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(ValidationError::Malformed(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Auth(ref e) => {
                tracing::warn!("Authentication failed: {}", e);
                (StatusCode::UNAUTHORIZED, e.to_string())
            }

            AppError::Validation(ref e) => {
                tracing::debug!("Validation error: {}", e);
                (StatusCode::BAD_REQUEST, e.to_string())
            }

            AppError::Storage(StorageError::NotFound) => {
                tracing::debug!("Resource not found");
                (StatusCode::NOT_FOUND, "Resource not found".to_string())
            }

            AppError::Storage(StorageError::Conflict(ref msg)) => {
                tracing::debug!("Storage conflict: {}", msg);
                (StatusCode::BAD_REQUEST, "Email already registered".to_string())
            }

            AppError::Storage(StorageError::Unavailable(ref msg)) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }

            AppError::Forbidden => {
                tracing::warn!("Forbidden operation");
                (StatusCode::FORBIDDEN, "Forbidden".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_class() {
        let cases = [
            (AppError::from(AuthError::Missing), StatusCode::UNAUTHORIZED),
            (AppError::from(AuthError::Mismatch), StatusCode::UNAUTHORIZED),
            (
                AppError::from(ValidationError::TooLong { length: 141, max: 140 }),
                StatusCode::BAD_REQUEST,
            ),
            (AppError::from(StorageError::NotFound), StatusCode::NOT_FOUND),
            (
                AppError::from(StorageError::Unavailable("db down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
