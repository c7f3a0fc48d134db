use deadpool_postgres::Pool;
use uuid::Uuid;
use crate::{error::StorageError, models::chirp::Chirp};

type Result<T> = std::result::Result<T, StorageError>;

const CHIRP_COLUMNS: &str = "id, created_at, updated_at, body, user_id";

/// Inserts a chirp. A single-row insert, so it either lands whole or not at all.
pub async fn create_chirp(pool: &Pool, id: Uuid, body: &str, user_id: Uuid) -> Result<Chirp> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(&format!(
            r#"
            INSERT INTO chirps (id, body, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING {CHIRP_COLUMNS}
            "#
        ))
        .await?;
    let row = client.query_one(&statement, &[&id, &body, &user_id]).await?;
    Ok(Chirp::try_from(&row)?)
}

/// Lists chirps oldest first, optionally only those by `author_id`.
pub async fn list_chirps(pool: &Pool, author_id: Option<Uuid>) -> Result<Vec<Chirp>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(&format!(
            r#"
            SELECT {CHIRP_COLUMNS}
            FROM chirps
            WHERE $1::uuid IS NULL OR user_id = $1
            ORDER BY created_at ASC, id ASC
            "#
        ))
        .await?;
    let rows = client.query(&statement, &[&author_id]).await?;
    rows.iter()
        .map(|row| Chirp::try_from(row).map_err(StorageError::from))
        .collect()
}

/// Finds a chirp by its ID.
pub async fn find_by_id(pool: &Pool, id: Uuid) -> Result<Option<Chirp>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(&format!(
            r#"
            SELECT {CHIRP_COLUMNS}
            FROM chirps
            WHERE id = $1
            "#
        ))
        .await?;
    let row = client.query_opt(&statement, &[&id]).await?;
    Ok(row.as_ref().map(Chirp::try_from).transpose()?)
}
