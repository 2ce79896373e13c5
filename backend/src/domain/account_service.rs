//! Account use-cases: registration and login.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{AccountCommand, AuthSession, PasswordHasher, UserRepository};
use crate::domain::{
    EmailAddress, Error, LoginCredentials, Registration, TokenError, TokenService, User, UserId,
};

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    tokens: Arc<TokenService>,
    clock: Arc<dyn Clock>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service over the given store, hasher and token service.
    pub fn new(
        users: Arc<U>,
        hasher: Arc<H>,
        tokens: Arc<TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }
}

impl<U, H> AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    fn sign_in(&self, user: User) -> Result<AuthSession, Error> {
        let token = self.tokens.issue(user.id()).map_err(map_token_error)?;
        Ok(AuthSession { user, token })
    }
}

fn map_token_error(error: TokenError) -> Error {
    Error::internal(format!("failed to issue token: {error}"))
}

#[async_trait]
impl<U, H> AccountCommand for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<AuthSession, Error> {
        let password_hash = self.hasher.hash(registration.password())?;
        let user = User::builder(
            UserId::random(),
            registration.username().clone(),
            registration.email().clone(),
            password_hash,
            self.clock.utc(),
        )
        .build();

        self.users.insert(&user).await?;
        info!(user_id = %user.id(), username = %user.username(), "registered account");
        self.sign_in(user)
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthSession, Error> {
        // Anything that does not parse as an address cannot belong to an account.
        let Ok(email) = EmailAddress::new(credentials.email()) else {
            warn!("login rejected: malformed email");
            return Err(Error::invalid_credentials());
        };
        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!("login rejected: unknown email");
            return Err(Error::invalid_credentials());
        };
        if !self
            .hasher
            .verify(credentials.password(), user.password_hash())
        {
            warn!(user_id = %user.id(), "login rejected: wrong password");
            return Err(Error::invalid_credentials());
        }

        info!(user_id = %user.id(), "signed in");
        self.sign_in(user)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
