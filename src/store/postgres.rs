use async_trait::async_trait;
use deadpool_postgres::Pool;
use redis::aio::ConnectionManager;
use uuid::Uuid;

use crate::{
    error::StorageError,
    models::{chirp::Chirp, refresh_token::RefreshToken, user::User},
    repositories::{chirp as chirp_repo, refresh_token as refresh_repo, user as user_repo},
    store::Store,
};

/// Users and chirps in PostgreSQL, refresh tokens in Redis.
#[derive(Clone)]
pub struct PostgresStore {
    db: Pool,
    redis: ConnectionManager,
}

impl PostgresStore {
    /// Creates a new `PostgresStore`.
    pub fn new(db: Pool, redis: ConnectionManager) -> Self {
        Self { db, redis }
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StorageError> {
        user_repo::create_user(&self.db, Uuid::new_v4(), email, hashed_password).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StorageError> {
        user_repo::find_by_email(&self.db, email)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn delete_all_users(&self) -> Result<u64, StorageError> {
        // Tokens first: if Redis fails, no user has been deleted yet.
        refresh_repo::delete_all(&mut self.redis.clone()).await?;
        user_repo::delete_all(&self.db).await
    }

    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, StorageError> {
        chirp_repo::create_chirp(&self.db, Uuid::new_v4(), body, user_id).await
    }

    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, StorageError> {
        chirp_repo::list_chirps(&self.db, author_id).await
    }

    async fn get_chirp_by_id(&self, id: Uuid) -> Result<Chirp, StorageError> {
        chirp_repo::find_by_id(&self.db, id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    async fn save_refresh_token(
        &self,
        token_hash: &str,
        record: &RefreshToken,
    ) -> Result<(), StorageError> {
        refresh_repo::save(&mut self.redis.clone(), token_hash, record).await
    }

    async fn resolve_user_by_refresh_token(&self, token_hash: &str) -> Result<Uuid, StorageError> {
        refresh_repo::resolve_user(&mut self.redis.clone(), token_hash).await
    }

    async fn revoke_refresh_token(&self, token_hash: &str) -> Result<(), StorageError> {
        refresh_repo::revoke(&mut self.redis.clone(), token_hash).await
    }
}
