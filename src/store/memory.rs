use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::StorageError,
    models::{chirp::Chirp, refresh_token::RefreshToken, user::User},
    store::Store,
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    // Insertion order is creation order.
    chirps: Vec<Chirp>,
    refresh_tokens: HashMap<String, RefreshToken>,
}

/// In-process store with the same semantics as [`super::PostgresStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates a new, empty `MemoryStore`.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StorageError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.email == email) {
            return Err(StorageError::Conflict(format!("email {} already exists", email)));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, StorageError> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn delete_all_users(&self) -> Result<u64, StorageError> {
        let mut inner = self.inner.write().await;
        let deleted = inner.users.len() as u64;
        inner.users.clear();
        inner.chirps.clear();
        inner.refresh_tokens.clear();
        Ok(deleted)
    }

    async fn create_chirp(&self, body: &str, user_id: Uuid) -> Result<Chirp, StorageError> {
        let mut inner = self.inner.write().await;
        // Mirrors the foreign key on chirps.user_id.
        if !inner.users.iter().any(|u| u.id == user_id) {
            return Err(StorageError::Unavailable(format!(
                "chirp author {} does not exist",
                user_id
            )));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        inner.chirps.push(chirp.clone());
        Ok(chirp)
    }

    async fn list_chirps(&self, author_id: Option<Uuid>) -> Result<Vec<Chirp>, StorageError> {
        Ok(self
            .inner
            .read()
            .await
            .chirps
            .iter()
            .filter(|c| author_id.is_none_or(|author| c.user_id == author))
            .cloned()
            .collect())
    }

    async fn get_chirp_by_id(&self, id: Uuid) -> Result<Chirp, StorageError> {
        self.inner
            .read()
            .await
            .chirps
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn save_refresh_token(
        &self,
        token_hash: &str,
        record: &RefreshToken,
    ) -> Result<(), StorageError> {
        self.inner
            .write()
            .await
            .refresh_tokens
            .insert(token_hash.to_string(), record.clone());
        Ok(())
    }

    async fn resolve_user_by_refresh_token(&self, token_hash: &str) -> Result<Uuid, StorageError> {
        self.inner
            .read()
            .await
            .refresh_tokens
            .get(token_hash)
            .filter(|record| record.is_valid_at(Utc::now()))
            .map(|record| record.user_id)
            .ok_or(StorageError::NotFound)
    }

    async fn revoke_refresh_token(&self, token_hash: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        let record = inner
            .refresh_tokens
            .get_mut(token_hash)
            .ok_or(StorageError::NotFound)?;
        if record.revoked_at.is_none() {
            record.revoked_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user("a@b.com", "hash").await.unwrap();
        let err = store.create_user("a@b.com", "other").await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict(_)));
    }

    #[tokio::test]
    async fn chirps_list_in_creation_order_and_filter_by_author() {
        let store = MemoryStore::new();
        let alice = store.create_user("alice@example.com", "h").await.unwrap();
        let bob = store.create_user("bob@example.com", "h").await.unwrap();

        let first = store.create_chirp("one", alice.id).await.unwrap();
        let second = store.create_chirp("two", bob.id).await.unwrap();
        let third = store.create_chirp("three", alice.id).await.unwrap();

        let all = store.list_chirps(None).await.unwrap();
        assert_eq!(all, vec![first.clone(), second.clone(), third.clone()]);

        let by_alice = store.list_chirps(Some(alice.id)).await.unwrap();
        assert_eq!(by_alice, vec![first.clone(), third]);

        assert_eq!(store.get_chirp_by_id(second.id).await.unwrap(), second);
        assert_eq!(
            store.get_chirp_by_id(Uuid::new_v4()).await.unwrap_err(),
            StorageError::NotFound
        );
    }

    #[tokio::test]
    async fn chirp_needs_existing_author() {
        let store = MemoryStore::new();
        assert!(store.create_chirp("orphan", Uuid::new_v4()).await.is_err());
        assert!(store.list_chirps(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn refresh_tokens_resolve_until_revoked_or_expired() {
        let store = MemoryStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();

        store
            .save_refresh_token("live", &RefreshToken::issue(user.id, 60).unwrap())
            .await
            .unwrap();
        assert_eq!(store.resolve_user_by_refresh_token("live").await.unwrap(), user.id);

        store.revoke_refresh_token("live").await.unwrap();
        assert_eq!(
            store.resolve_user_by_refresh_token("live").await.unwrap_err(),
            StorageError::NotFound
        );

        let mut stale = RefreshToken::issue(user.id, 1).unwrap();
        stale.expires_at = Utc::now() - Duration::seconds(1);
        store.save_refresh_token("stale", &stale).await.unwrap();
        assert!(store.resolve_user_by_refresh_token("stale").await.is_err());

        assert!(store.resolve_user_by_refresh_token("unknown").await.is_err());
        assert_eq!(
            store.revoke_refresh_token("unknown").await.unwrap_err(),
            StorageError::NotFound
        );
    }

    #[tokio::test]
    async fn delete_all_users_cascades() {
        let store = MemoryStore::new();
        let user = store.create_user("a@b.com", "h").await.unwrap();
        store.create_chirp("hello", user.id).await.unwrap();
        store
            .save_refresh_token("t", &RefreshToken::issue(user.id, 60).unwrap())
            .await
            .unwrap();

        assert_eq!(store.delete_all_users().await.unwrap(), 1);
        assert!(store.list_chirps(None).await.unwrap().is_empty());
        assert!(store.resolve_user_by_refresh_token("t").await.is_err());
        assert!(store.get_user_by_email("a@b.com").await.is_err());
    }
}
