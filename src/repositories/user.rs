use deadpool_postgres::Pool;
use uuid::Uuid;
use crate::{error::StorageError, models::user::User};

type Result<T> = std::result::Result<T, StorageError>;

/// Creates a new user in the database.
pub async fn create_user(
    pool: &Pool,
    id: Uuid,
    email: &str,
    hashed_password: &str,
) -> Result<User> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(
            r#"
            INSERT INTO users (id, email, hashed_password, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, created_at, updated_at, email, hashed_password
            "#,
        )
        .await?;
    let row = client
        .query_one(&statement, &[&id, &email, &hashed_password])
        .await?;
    Ok(User::try_from(&row)?)
}

/// Finds a user by their email address.
pub async fn find_by_email(pool: &Pool, email: &str) -> Result<Option<User>> {
    let client = pool.get().await?;
    let statement = client
        .prepare_cached(
            r#"
            SELECT id, created_at, updated_at, email, hashed_password
            FROM users
            WHERE email = $1
            "#,
        )
        .await?;
    let row = client.query_opt(&statement, &[&email]).await?;
    Ok(row.as_ref().map(User::try_from).transpose()?)
}

/// Deletes every user. Chirps go with them through `ON DELETE CASCADE`.
pub async fn delete_all(pool: &Pool) -> Result<u64> {
    let client = pool.get().await?;
    Ok(client.execute("DELETE FROM users", &[]).await?)
}
