//! The persistence seam. Handlers and services only ever talk to [`Store`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::StorageError,
    models::{chirp::Chirp, refresh_token::RefreshToken, user::User},
};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Storage collaborator used by the request pipeline.
///
/// Every method is a single atomic operation; callers never see partial
/// writes.
#[async_trait]
pub trait Store: Send + Sync {
    /// Creates a user. Fails with `Conflict` when the email is taken.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StorageError>;

    /// Looks a user up by email. Fails with `NotFound`.
    async fn get_user_by_email(&self, email: &str) -> Result<User, StorageError>;

    /// Deletes every user along with their chirps and refresh tokens.
    async fn delete_all_users(&self) -> Result<u64, StorageError>;

    /// Persists a chirp that has already been admitted.
    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, StorageError>;

    /// Lists chirps oldest first, optionally restricted to one author.
    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, StorageError>;

    /// Fetches one chirp. Fails with `NotFound`.
    async fn get_chirp_by_id(&self, id: Uuid) -> Result<Chirp, StorageError>;

    /// Stores a refresh token record under the token's digest.
    async fn save_refresh_token(
        &self,
        token_hash: &str,
        record: &RefreshToken,
    ) -> Result<(), StorageError>;

    /// Returns the owner of a live refresh token. Missing, expired and
    /// revoked tokens all fail with `NotFound`.
    async fn resolve_user_by_refresh_token(&self, token_hash: &str) -> Result<Uuid, StorageError>;

    /// Revokes a refresh token. Fails with `NotFound` when it was never issued.
    async fn revoke_refresh_token(&self, token_hash: &str) -> Result<(), StorageError>;
}
