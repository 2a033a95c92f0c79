//! Password hashing.
//!
//! Salted SHA-256 stored as `<salt>$<hex digest>`. Verification is
//! constant-time over the digest.

use constant_time_eq::constant_time_eq;
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;

/// Hash a raw password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SALT_LEN)
        .map(char::from)
        .collect();
    format!("{salt}${}", digest(&salt, password))
}

/// Check a raw password against a stored hash.
pub fn verify_password(stored: &str, password: &str) -> bool {
    let Some((salt, mac)) = stored.split_once('$') else {
        return false;
    };
    constant_time_eq(mac.as_bytes(), digest(salt, password).as_bytes())
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
