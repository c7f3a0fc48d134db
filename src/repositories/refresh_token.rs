use chrono::Utc;
use redis::{aio::ConnectionManager, AsyncCommands};
use uuid::Uuid;
use crate::{error::StorageError, models::refresh_token::RefreshToken};

type Result<T> = std::result::Result<T, StorageError>;

/// Keys requested per SCAN round trip when clearing all tokens.
const SCAN_BATCH: usize = 100;

fn key(token_hash: &str) -> String {
    format!("refresh:{}", token_hash)
}

fn decode(json: &str) -> Result<RefreshToken> {
    sonic_rs::from_str(json)
        .map_err(|e| StorageError::Unavailable(format!("corrupt refresh token record: {}", e)))
}

/// Stores a refresh token record. Redis drops it once it expires.
pub async fn save(
    redis: &mut ConnectionManager,
    token_hash: &str,
    record: &RefreshToken,
) -> Result<()> {
    let json = sonic_rs::to_string(record)
        .map_err(|e| StorageError::Unavailable(format!("refresh token serialization: {}", e)))?;
    let ttl = (record.expires_at - Utc::now()).num_seconds().max(1) as u64;

    let _: () = redis.set_ex(key(token_hash), json, ttl).await?;
    Ok(())
}

/// Returns the owning user when the token exists, has not expired and is not revoked.
pub async fn resolve_user(redis: &mut ConnectionManager, token_hash: &str) -> Result<Uuid> {
    let json: Option<String> = redis.get(key(token_hash)).await?;
    let record = decode(&json.ok_or(StorageError::NotFound)?)?;

    if !record.is_valid_at(Utc::now()) {
        return Err(StorageError::NotFound);
    }
    Ok(record.user_id)
}

/// Marks a refresh token revoked, keeping the record until its TTL runs out.
///
/// A record that expires between the read and the write stays gone.
pub async fn revoke(redis: &mut ConnectionManager, token_hash: &str) -> Result<()> {
    let json: Option<String> = redis.get(key(token_hash)).await?;
    let mut record = decode(&json.ok_or(StorageError::NotFound)?)?;
    if record.revoked_at.is_none() {
        record.revoked_at = Some(Utc::now());
    }

    let json = sonic_rs::to_string(&record)
        .map_err(|e| StorageError::Unavailable(format!("refresh token serialization: {}", e)))?;
    let written: Option<String> = overwrite_existing(token_hash, &json).query_async(redis).await?;
    written.map(|_| ()).ok_or(StorageError::NotFound)
}

/// Drops every refresh token record, one SCAN batch at a time.
pub async fn delete_all(redis: &mut ConnectionManager) -> Result<()> {
    let mut cursor = 0u64;
    loop {
        let (next, keys): (u64, Vec<String>) = scan_batch(cursor).query_async(redis).await?;
        if !keys.is_empty() {
            let _: () = redis.del(keys).await?;
        }
        if next == 0 {
            return Ok(());
        }
        cursor = next;
    }
}

// SET that never creates a key and never touches its expiry.
fn overwrite_existing(token_hash: &str, json: &str) -> redis::Cmd {
    let mut cmd = redis::cmd("SET");
    cmd.arg(key(token_hash)).arg(json).arg("KEEPTTL").arg("XX");
    cmd
}

fn scan_batch(cursor: u64) -> redis::Cmd {
    let mut cmd = redis::cmd("SCAN");
    cmd.arg(cursor)
        .arg("MATCH")
        .arg(key("*"))
        .arg("COUNT")
        .arg(SCAN_BATCH);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(cmd: &redis::Cmd) -> String {
        String::from_utf8(cmd.get_packed_command()).unwrap()
    }

    #[test]
    fn revoke_write_keeps_ttl_and_never_creates() {
        let cmd = packed(&overwrite_existing("abc", "{}"));
        assert!(cmd.contains("$11\r\nrefresh:abc\r\n"));
        assert!(cmd.ends_with("$7\r\nKEEPTTL\r\n$2\r\nXX\r\n"));
    }

    #[test]
    fn reset_scans_instead_of_listing_keys() {
        let cmd = packed(&scan_batch(42));
        assert!(cmd.starts_with("*6\r\n$4\r\nSCAN\r\n$2\r\n42\r\n"));
        assert!(cmd.contains("$5\r\nMATCH\r\n$9\r\nrefresh:*\r\n"));
        assert!(!cmd.contains("KEYS"));
    }
}
