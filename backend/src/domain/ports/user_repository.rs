//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String }
            => "user repository connection failed: {message}" => service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}" => internal,
        /// Username or email already belongs to another account.
        Duplicate { message: String } => "Username or email already exists" => invalid_request,
    }
}

/// Driven port over the stored accounts.
///
/// ## Contract
/// - `insert` rejects a user whose username or email is already taken with
///   [`UserPersistenceError::Duplicate`], checking both atomically.
/// - Email lookups use the normalised [`EmailAddress`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by login email.
    async fn find_by_email(&self, email: &EmailAddress)
    -> Result<Option<User>, UserPersistenceError>;

    /// Public profiles for the given ids. Unknown ids are omitted.
    async fn find_profiles(
        &self,
        ids: &[UserId],
    ) -> Result<Vec<UserProfile>, UserPersistenceError>;
}
