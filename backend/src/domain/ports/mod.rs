//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`AccountCommand`, `SessionResolver`, `PostsCommand`,
//! `PostsQuery`) are what inbound adapters call. Driven ports
//! (`UserRepository`, `PostRepository`, `PasswordHasher`) are what the domain
//! services call out to; they are automocked for service tests.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod password_hasher;
mod post_repository;
mod posts_command;
mod posts_query;
mod session_resolver;
mod user_repository;

pub use account_command::{AccountCommand, AuthSession};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{CredentialError, PasswordHasher};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostPersistenceError, PostRepository};
pub use posts_command::PostsCommand;
pub use posts_query::{DASHBOARD_OWN_LEN, DASHBOARD_RECENT_LEN, HOME_FEED_LEN, PostsQuery};
pub use session_resolver::SessionResolver;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
