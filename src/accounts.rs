//! Password hashing and session tokens for user accounts
//!
//! Passwords are stored as `pbkdf2-sha256$<rounds>$<salt>$<hash>`, with the
//! round count kept in the record so it can be raised without breaking
//! existing accounts. Session tokens are random and only their SHA-256 digest
//! is persisted.

use anyhow::{anyhow, Result};
use rand::Rng;
use sha2::{Digest, Sha256};

use crate::auth::constant_time_compare;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_BYTES: usize = 16;
const HASH_BYTES: usize = 32;
const TOKEN_BYTES: usize = 32;

/// Default PBKDF2 iteration count
pub const DEFAULT_PASSWORD_ROUNDS: u32 = 100_000;

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn derive(password: &str, salt: &str, rounds: u32) -> String {
    let mut out = [0u8; HASH_BYTES];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), rounds, &mut out);
    to_hex(&out)
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str, rounds: u32) -> String {
    let salt: [u8; SALT_BYTES] = rand::thread_rng().gen();
    let salt = to_hex(&salt);
    let hash = derive(password, &salt, rounds);
    format!("{SCHEME}${rounds}${salt}${hash}")
}

/// Check a password against a stored hash
///
/// Errors only when the stored value is malformed.
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(rounds), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(anyhow!("malformed password hash"));
    };
    if scheme != SCHEME {
        return Err(anyhow!("unknown password hash scheme: {scheme}"));
    }
    let rounds: u32 = rounds
        .parse()
        .map_err(|_| anyhow!("invalid round count in password hash"))?;
    if rounds == 0 {
        return Err(anyhow!("invalid round count in password hash"));
    }

    Ok(constant_time_compare(&derive(password, salt, rounds), hash))
}

/// New bearer token (64 hex chars)
pub fn new_token() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::thread_rng().gen();
    to_hex(&bytes)
}

/// Storage key for a token; the token itself is never written to disk
pub fn token_digest(token: &str) -> String {
    to_hex(&Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUNDS: u32 = 1_000;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("correct horse", ROUNDS);
        assert!(stored.starts_with("pbkdf2-sha256$1000$"));
        assert!(verify_password("correct horse", &stored).unwrap());
        assert!(!verify_password("correct horse!", &stored).unwrap());
    }

    #[test]
    fn test_salt_differs_per_hash() {
        let a = hash_password("same password", ROUNDS);
        let b = hash_password("same password", ROUNDS);
        assert_ne!(a, b);
        assert!(verify_password("same password", &a).unwrap());
        assert!(verify_password("same password", &b).unwrap());
    }

    #[test]
    fn test_stored_round_count_is_used() {
        let stored = hash_password("pw-12345", 2_000);
        assert!(verify_password("pw-12345", &stored).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("x", "plaintext").is_err());
        assert!(verify_password("x", "bcrypt$10$salt$hash").is_err());
        assert!(verify_password("x", "pbkdf2-sha256$abc$salt$hash").is_err());
        assert!(verify_password("x", "pbkdf2-sha256$0$salt$hash").is_err());
    }

    #[test]
    fn test_tokens_are_random_and_digest_is_stable() {
        let a = new_token();
        let b = new_token();
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_eq!(token_digest(&a), token_digest(&a));
        assert_ne!(token_digest(&a), a);
        assert_eq!(token_digest(&a).len(), 64);
    }
}
