use chrono::{DateTime, Utc};
use tokio_postgres::Row;
use uuid::Uuid;

/// Represents a user in the system.
///
/// Not `Serialize`: the password hash must never leave the server.
/// Handlers convert to a response type instead.
#[derive(Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: Uuid,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
    /// The timestamp when the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// The user's email address. Unique.
    pub email: String,
    /// The user's Argon2 password hash in PHC string format.
    pub hashed_password: String,
}

impl TryFrom<&Row> for User {
    type Error = tokio_postgres::Error;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            email: row.try_get("email")?,
            hashed_password: row.try_get("hashed_password")?,
        })
    }
}
