use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use anyhow::{Context, Result};
use zeroize::{Zeroize, Zeroizing};

/// Longest accepted refresh token lifetime, in days.
pub const MAX_REFRESH_TOKEN_DAYS: i64 = 3650;

/// Which storage backend the server persists to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    /// PostgreSQL for users and chirps, Redis for refresh tokens.
    Postgres,
    /// In-process maps. Nothing survives a restart.
    Memory,
}

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The secret used to sign and verify access tokens.
    pub jwt_secret: Zeroizing<Vec<u8>>,
    /// The deployment platform (`dev`, `production`, ...).
    pub platform: String,
    /// The storage backend.
    pub store_backend: StoreBackend,
    /// The URL of the PostgreSQL database. Only set for the Postgres backend.
    pub database_url: Option<String>,
    /// The URL of the Redis server.
    pub redis_url: String,
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The directory served under `/app`.
    pub fileserver_root: PathBuf,
    /// The lifetime of a refresh token in days.
    pub refresh_token_days: i64,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Creates a new `Config` from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut secret = lookup("JWT_SECRET")
            .context("JWT_SECRET must be set (generate with: openssl rand -base64 64)")?;
        if secret.trim().is_empty() {
            secret.zeroize();
            anyhow::bail!("JWT_SECRET must not be empty");
        }
        let jwt_secret = Zeroizing::new(secret.as_bytes().to_vec());
        secret.zeroize();

        let platform = lookup("PLATFORM").context("PLATFORM must be set")?;

        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => anyhow::bail!("Unknown STORE_BACKEND: {}", other),
        };

        let database_url = match store_backend {
            StoreBackend::Postgres => {
                Some(lookup("DATABASE_URL").context("DATABASE_URL must be set")?)
            }
            StoreBackend::Memory => None,
        };

        let refresh_token_days: i64 = lookup("REFRESH_TOKEN_DAYS")
            .unwrap_or_else(|| "60".to_string())
            .parse()
            .context("Invalid REFRESH_TOKEN_DAYS")?;
        if !(1..=MAX_REFRESH_TOKEN_DAYS).contains(&refresh_token_days) {
            anyhow::bail!(
                "REFRESH_TOKEN_DAYS must be between 1 and {}",
                MAX_REFRESH_TOKEN_DAYS
            );
        }

        Ok(Self {
            jwt_secret,
            platform,
            store_backend,
            database_url,
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://127.0.0.1:6379".to_string()),
            bind_addr: lookup("BIND_ADDR")
                .unwrap_or_else(|| "127.0.0.1:8080".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            fileserver_root: PathBuf::from(
                lookup("FILESERVER_ROOT").unwrap_or_else(|| ".".to_string()),
            ),
            refresh_token_days,
        })
    }

    /// Whether destructive admin operations are allowed.
    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn memory_backend_uses_defaults() {
        let config = Config::from_vars(lookup(&[
            ("JWT_SECRET", "s3cret"),
            ("PLATFORM", "dev"),
            ("STORE_BACKEND", "memory"),
        ]))
        .unwrap();

        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.database_url.is_none());
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.refresh_token_days, 60);
        assert_eq!(config.jwt_secret.as_slice(), b"s3cret");
        assert!(config.is_dev());
    }

    #[test]
    fn missing_secret_is_fatal() {
        let err = Config::from_vars(lookup(&[("PLATFORM", "dev"), ("STORE_BACKEND", "memory")]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn blank_secret_is_fatal() {
        assert!(Config::from_vars(lookup(&[
            ("JWT_SECRET", "   "),
            ("PLATFORM", "dev"),
            ("STORE_BACKEND", "memory"),
        ]))
        .is_err());
    }

    #[test]
    fn missing_platform_is_fatal() {
        assert!(Config::from_vars(lookup(&[("JWT_SECRET", "x"), ("STORE_BACKEND", "memory")])).is_err());
    }

    #[test]
    fn postgres_backend_requires_database_url() {
        assert!(Config::from_vars(lookup(&[("JWT_SECRET", "x"), ("PLATFORM", "production")])).is_err());

        let config = Config::from_vars(lookup(&[
            ("JWT_SECRET", "x"),
            ("PLATFORM", "production"),
            ("DATABASE_URL", "postgres://chirpy@localhost/chirpy"),
        ]))
        .unwrap();
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert!(!config.is_dev());
    }

    #[test]
    fn rejects_refresh_lifetime_above_ceiling() {
        let vars = |days: &'static str| {
            lookup(&[
                ("JWT_SECRET", "x"),
                ("PLATFORM", "dev"),
                ("STORE_BACKEND", "memory"),
                ("REFRESH_TOKEN_DAYS", days),
            ])
        };

        assert!(Config::from_vars(vars("100000000")).is_err());
        assert!(Config::from_vars(vars("3651")).is_err());
        let config = Config::from_vars(vars("3650")).unwrap();
        assert_eq!(config.refresh_token_days, MAX_REFRESH_TOKEN_DAYS);
    }

    #[test]
    fn rejects_non_positive_refresh_lifetime() {
        assert!(Config::from_vars(lookup(&[
            ("JWT_SECRET", "x"),
            ("PLATFORM", "dev"),
            ("STORE_BACKEND", "memory"),
            ("REFRESH_TOKEN_DAYS", "0"),
        ]))
        .is_err());
    }
}
