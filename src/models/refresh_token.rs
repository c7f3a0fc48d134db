use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Server-side record for an issued refresh token.
///
/// Keyed by the SHA-256 digest of the token, never by the token itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// The user the token was issued to.
    pub user_id: Uuid,
    /// The timestamp when the token was issued.
    pub created_at: DateTime<Utc>,
    /// The timestamp after which the token is no longer accepted.
    pub expires_at: DateTime<Utc>,
    /// Set once the token has been revoked.
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    /// Creates a record for a token issued now that lives `lifetime_days`.
    ///
    /// Returns `None` when the expiry is not representable.
    pub fn issue(user_id: Uuid, lifetime_days: i64) -> Option<Self> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(Duration::try_days(lifetime_days)?)?;
        Some(Self {
            user_id,
            created_at: now,
            expires_at,
            revoked_at: None,
        })
    }

    /// Check if token is revoked
    #[inline]
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Check if token is expired at `now`
    #[inline]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Check if token is valid (not revoked and not expired)
    #[inline]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired_at(now)
    }
}
