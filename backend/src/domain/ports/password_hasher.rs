//! Credential store port: one-way password hashing and verification.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing a password.
    pub enum CredentialError {
        /// The hashing primitive rejected its input or parameters.
        Hashing { message: String } => "password hashing failed: {message}" => internal,
    }
}

/// Hashes passwords for storage and checks candidates against stored hashes.
///
/// ## Contract
/// - `hash` never returns the raw password and salts every call, so hashing
///   the same password twice yields different encodings.
/// - `verify` compares in constant time and treats an unparseable stored hash
///   as a mismatch.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` for storage.
    fn hash(&self, password: &str) -> Result<PasswordHash, CredentialError>;

    /// Whether `password` matches `hash`.
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}
