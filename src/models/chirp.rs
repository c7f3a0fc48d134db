use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_postgres::Row;
use uuid::Uuid;

/// A stored chirp. Serializes as `{id, created_at, updated_at, body, user_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chirp {
    /// The unique identifier for the chirp.
    pub id: Uuid,
    /// The timestamp when the chirp was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the chirp was last updated.
    pub updated_at: DateTime<Utc>,
    /// The redacted body.
    pub body: String,
    /// The author. A reference, the chirp does not own the user.
    pub user_id: Uuid,
}

impl TryFrom<&Row> for Chirp {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            body: row.try_get("body")?,
            user_id: row.try_get("user_id")?,
        })
    }
}
