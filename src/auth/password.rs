//! Password hashing. Argon2id with a per-password random salt, stored as a
//! PHC string (`$argon2id$...`).

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

pub fn hash(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow!("failed to hash password: {e}"))
}

/// Returns `true` when `password` matches `stored_hash`. A corrupt stored
/// hash counts as a mismatch rather than an error — login just fails.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let h = hash("buyer123").unwrap();
        assert!(h.starts_with("$argon2id$"));
        assert!(verify("buyer123", &h));
        assert!(!verify("buyer124", &h));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash("same-password").unwrap();
        let b = hash("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn corrupt_hash_is_a_mismatch() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}
