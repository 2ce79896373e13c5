//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing concrete
//! implementations of the driven port traits:
//!
//! - **persistence**: account and post stores
//! - **credentials**: Argon2 password hashing
//!
//! Adapters are thin translators between domain types and their storage or
//! hashing representations. They contain no business logic.

pub mod credentials;
pub mod persistence;
