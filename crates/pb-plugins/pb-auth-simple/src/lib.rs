//! # pb-auth-simple
//!
//! Argon2-based implementation of `AuthProvider`.
//! Hashes are Argon2id with a random per-record salt, stored in PHC format
//! so the parameters and salt travel with the hash.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use pb_core::error::{AppError, Result};
use pb_core::traits::AuthProvider;

#[derive(Default)]
pub struct SimpleAuthProvider {
    argon2: Argon2<'static>,
}

impl SimpleAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthProvider for SimpleAuthProvider {
    fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))
    }

    /// Verifies if a provided password matches a stored Argon2 hash.
    fn verify_password(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("stored password hash is not a valid PHC string: {e}");
                return false;
            }
        };
        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let auth = SimpleAuthProvider::new();
        let hash = auth.hash_password("pw1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert_ne!(hash, "pw1");
        assert!(auth.verify_password("pw1", &hash));
        assert!(!auth.verify_password("pw2", &hash));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let auth = SimpleAuthProvider::new();
        let a = auth.hash_password("same").unwrap();
        let b = auth.hash_password("same").unwrap();
        assert_ne!(a, b);
        assert!(auth.verify_password("same", &a));
        assert!(auth.verify_password("same", &b));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let auth = SimpleAuthProvider::new();
        assert!(!auth.verify_password("pw1", "plaintext-pw1"));
        assert!(!auth.verify_password("", ""));
    }
}
