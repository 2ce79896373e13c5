//! In-memory `UserRepository` implementation.
//!
//! Accounts live in a single table guarded by a tokio `RwLock`. The uniqueness
//! checks on username and email run under the same write lock as the insert,
//! so two concurrent registrations cannot both claim a handle.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId, UserProfile};

/// Process-local implementation of the `UserRepository` port.
///
/// Cloning shares the underlying table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        if let Some(taken) = users.values().find_map(|existing| {
            if existing.username() == user.username() {
                Some("username")
            } else if existing.email() == user.email() {
                Some("email")
            } else {
                None
            }
        }) {
            debug!(field = taken, "rejected duplicate account");
            return Err(UserPersistenceError::duplicate(taken));
        }
        if users.contains_key(user.id()) {
            return Err(UserPersistenceError::duplicate("id"));
        }
        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_profiles(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserProfile>, UserPersistenceError> {
        let users = self.users.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id))
            .map(User::profile)
            .collect())
    }
}
