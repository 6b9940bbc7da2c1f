//! Invite secret generation and hashing.
//!
//! The secret is a bearer credential: it is returned to the caller exactly
//! once, and only its SHA-256 hash is stored for lookup.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Generate a random alphanumeric invite secret.
pub fn generate_secret(length: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// SHA-256 hex hash of an invite secret (the stored lookup key).
pub fn hash_secret(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}
