//! Port abstraction for post persistence adapters and their errors.
//!
//! Single-post mutations are expressed as primitives that the adapter applies
//! to the record as stored at write time, so two concurrent likes or comments
//! never overwrite each other. A `None` result means the post no longer
//! exists (or, for [`PostRepository::record_view`], is not published).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};

use crate::domain::{Comment, LikeToggle, Post, PostEdit, PostFilter, PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String }
            => "post repository connection failed: {message}" => service_unavailable,
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}" => internal,
    }
}

/// Driven port over the stored posts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Store a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError>;

    /// Fetch a post by identifier, whatever its status.
    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Posts matching `filter`, newest first, sliced to `page`.
    async fn list(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Page<Post>, PostPersistenceError>;

    /// Increment the view counter of a published post and return it.
    async fn record_view(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError>;

    /// Replace the editable fields and refresh `updated_at`.
    async fn update_editable(
        &self,
        id: &PostId,
        edit: PostEdit,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, PostPersistenceError>;

    /// Remove a post permanently. Returns whether a record was removed.
    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError>;

    /// Append a comment to the end of the thread.
    async fn append_comment(
        &self,
        id: &PostId,
        comment: Comment,
    ) -> Result<Option<Post>, PostPersistenceError>;

    /// Add `user` to the likes if absent, otherwise remove them.
    async fn toggle_like(
        &self,
        id: &PostId,
        user: &UserId,
    ) -> Result<Option<LikeToggle>, PostPersistenceError>;
}
