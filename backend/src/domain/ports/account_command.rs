//! Driving port for account use-cases: registration and login.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User};

/// A signed-in account together with the token that proves it.
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// The authenticated account.
    pub user: User,
    /// Signed identity token for the credential carrier.
    pub token: String,
}

/// Domain use-case port for creating accounts and signing in.
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Create an account and sign it in.
    ///
    /// Fails with `invalid_request` when the username or email is taken.
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error>;

    /// Check credentials and sign the account in.
    ///
    /// Unknown emails and wrong passwords fail identically.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error>;
}
