use crate::error::{AppError, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// The size of a refresh token in bytes (256 bits of entropy).
const REFRESH_TOKEN_SIZE: usize = 32;

/// Generates a new random refresh token.
///
/// # Returns
///
/// A lowercase hex string, 64 characters long.
pub fn generate_refresh_token() -> Result<String> {
    let mut token = [0u8; REFRESH_TOKEN_SIZE];
    OsRng
        .try_fill_bytes(&mut token)
        .map_err(|e| AppError::Internal(format!("Failed to generate refresh token: {}", e)))?;

    Ok(hex::encode(token))
}

/// Digest under which a refresh token is stored and looked up.
pub fn hash_refresh_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_hex_and_full_length() {
        let token = generate_refresh_token().unwrap();
        assert_eq!(token.len(), REFRESH_TOKEN_SIZE * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_do_not_repeat() {
        let a = generate_refresh_token().unwrap();
        let b = generate_refresh_token().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn digest_is_stable_and_hides_the_token() {
        let token = generate_refresh_token().unwrap();
        let digest = hash_refresh_token(&token);
        assert_eq!(digest, hash_refresh_token(&token));
        assert_ne!(digest, token);
        assert_eq!(digest.len(), 64);
    }
}
