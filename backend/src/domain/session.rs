//! Session resolution: from a raw credential to an explicit [`Identity`].
//!
//! Identity is a value handed to every core operation rather than ambient
//! request state. A credential that fails verification, or names a user that
//! no longer exists, resolves to [`Identity::Anonymous`] and flags the
//! credential for clearing. Only store failures are reported as errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ports::{SessionResolver, UserRepository};
use super::{Error, TokenService, User, UserId};

/// Who is making a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Identity {
    /// No valid credential was presented.
    #[default]
    Anonymous,
    /// A verified, existing user.
    Authenticated(User),
}

impl Identity {
    /// The authenticated user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// The authenticated user's id, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user().map(User::id)
    }
}

/// Outcome of resolving a request credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionResolution {
    /// Resolved identity.
    pub identity: Identity,
    /// Whether the adapter should clear the presented credential.
    pub clear_credential: bool,
}

impl SessionResolution {
    /// No credential presented.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A credential was presented but is no longer usable.
    pub fn stale() -> Self {
        Self {
            identity: Identity::Anonymous,
            clear_credential: true,
        }
    }

    /// A credential resolved to `user`.
    pub fn authenticated(user: User) -> Self {
        Self {
            identity: Identity::Authenticated(user),
            clear_credential: false,
        }
    }
}

/// Session resolver backed by the token service and user store.
#[derive(Clone)]
pub struct SessionService<U> {
    users: Arc<U>,
    tokens: Arc<TokenService>,
}

impl<U> SessionService<U> {
    /// Create a resolver over the given store and token service.
    pub fn new(users: Arc<U>, tokens: Arc<TokenService>) -> Self {
        Self { users, tokens }
    }
}

#[async_trait]
impl<U> SessionResolver for SessionService<U>
where
    U: UserRepository,
{
    async fn resolve(&self, credential: Option<&str>) -> Result<SessionResolution, Error> {
        let Some(token) = credential.filter(|token| !token.is_empty()) else {
            return Ok(SessionResolution::anonymous());
        };

        let user_id = match self.tokens.verify(token) {
            Ok(user_id) => user_id,
            Err(error) => {
                debug!(%error, "rejected session credential");
                return Ok(SessionResolution::stale());
            }
        };

        match self.users.find_by_id(&user_id).await? {
            Some(user) => Ok(SessionResolution::authenticated(user)),
            None => {
                warn!(user_id = %user_id, "session credential names an unknown user");
                Ok(SessionResolution::stale())
            }
        }
    }
}
