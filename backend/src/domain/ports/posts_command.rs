//! Driving port for post mutations.

use async_trait::async_trait;

use crate::domain::{Error, Identity, LikeToggle, NewPost, Post, PostEditRequest, PostId};

/// Domain use-case port for authoring and engaging with posts.
///
/// Drafts behave as missing (`not_found`) for everyone but their author.
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Create a post owned by the caller.
    async fn create(&self, identity: &Identity, new_post: NewPost) -> Result<Post, Error>;

    /// Replace the editable fields of a post the caller owns.
    ///
    /// Existence and ownership are checked before the fields are validated.
    async fn edit(
        &self,
        id: &PostId,
        identity: &Identity,
        request: PostEditRequest,
    ) -> Result<Post, Error>;

    /// Permanently delete a post the caller owns.
    async fn delete(&self, id: &PostId, identity: &Identity) -> Result<(), Error>;

    /// Append a comment. Blank text leaves the post unchanged.
    async fn add_comment(&self, id: &PostId, identity: &Identity, text: &str)
    -> Result<Post, Error>;

    /// Like the post, or unlike it if the caller already does.
    async fn toggle_like(&self, id: &PostId, identity: &Identity) -> Result<LikeToggle, Error>;
}
