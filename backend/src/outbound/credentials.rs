//! Argon2-backed `PasswordHasher` implementation.
//!
//! Hashes are stored as PHC strings, which carry the algorithm, parameters
//! and per-hash salt alongside the digest.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash as PhcString, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use tracing::warn;

use crate::domain::PasswordHash;
use crate::domain::ports::{CredentialError, PasswordHasher};

/// Argon2id password hasher with the crate's default parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Create a hasher using Argon2id defaults.
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| PasswordHash::new(hash.to_string()))
            .map_err(|error| CredentialError::hashing(error.to_string()))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        let parsed = match PhcString::new(hash.as_str()) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, "stored password hash is unreadable");
                return false;
            }
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
