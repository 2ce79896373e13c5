//! Persistence adapters for accounts and posts.
//!
//! The adapters keep each aggregate as one record: users keyed by id with
//! uniqueness over username and email, posts keyed by id with their likes and
//! comments embedded.
//!
//! # Architecture
//!
//! - **Thin adapters**: repository implementations only store and slice
//!   domain records. Visibility and capability rules stay in the services.
//! - **Atomic primitives**: every single-post mutation applies to the record
//!   as stored at write time, under one lock.
//!
//! # Example
//!
//! ```
//! use quill::outbound::persistence::{InMemoryPostRepository, InMemoryUserRepository};
//!
//! let users = InMemoryUserRepository::new();
//! let posts = InMemoryPostRepository::new();
//! # let _ = (users, posts);
//! ```

mod memory_post_repository;
mod memory_user_repository;

pub use memory_post_repository::InMemoryPostRepository;
pub use memory_user_repository::InMemoryUserRepository;
