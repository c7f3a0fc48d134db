use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use crate::config::{Config, StoreBackend};
use crate::error::{Result, StorageError};
use crate::store::{MemoryStore, PostgresStore, Store};

/// Counts requests served by the static file server.
#[derive(Clone, Default)]
pub struct HitCounter {
    hits: Arc<AtomicU64>,
}

impl HitCounter {
    /// Creates a new `HitCounter` starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one hit.
    pub fn increment(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of hits recorded so far.
    pub fn get(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Sets the counter back to zero.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The storage collaborator.
    pub store: Arc<dyn Store>,
    /// The application's configuration.
    pub config: Config,
    /// Hits on `/app`.
    pub hits: HitCounter,
}

impl AppState {
    /// Creates a new `AppState`, connecting to the configured backend.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let store: Arc<dyn Store> = match config.store_backend {
            StoreBackend::Postgres => {
                let database_url = config.database_url.as_deref().ok_or_else(|| {
                    StorageError::Unavailable("DATABASE_URL is not configured".to_string())
                })?;
                let db = crate::db::create_pool(database_url)?;
                tracing::info!("✅ PostgreSQL Pool initialized with deadpool-postgres");

                let redis_client = redis::Client::open(config.redis_url.as_str())
                    .map_err(StorageError::from)?;
                let redis = redis::aio::ConnectionManager::new(redis_client)
                    .await
                    .map_err(StorageError::from)?;
                tracing::info!("✅ Redis Connection Manager initialized");

                Arc::new(PostgresStore::new(db, redis))
            }
            StoreBackend::Memory => {
                tracing::warn!("⚠️ Using in-memory store, data will not survive a restart");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::with_store(config.clone(), store))
    }

    /// Creates an `AppState` around an existing store.
    pub fn with_store(config: Config, store: Arc<dyn Store>) -> Self {
        AppState {
            store,
            config,
            hits: HitCounter::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_shared_between_clones() {
        let counter = HitCounter::new();
        let clone = counter.clone();
        counter.increment();
        clone.increment();
        assert_eq!(counter.get(), 2);

        clone.reset();
        assert_eq!(counter.get(), 0);
    }
}
