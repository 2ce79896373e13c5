//! Read models for posts with authors resolved to public profiles.
//!
//! Counts are derived here, at read time, from the embedded likes and
//! comments.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{CommentId, Post, PostId, PostStatus, UserId, UserProfile};

/// Author profiles keyed by user id.
pub type ProfileDirectory = HashMap<UserId, UserProfile>;

fn profile_for(directory: &ProfileDirectory, id: &UserId) -> UserProfile {
    directory
        .get(id)
        .cloned()
        .unwrap_or_else(|| UserProfile::unknown(*id))
}

/// Which posts a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Published posts by anyone.
    Published,
    /// Every post by one author, whatever its status.
    ByAuthor(UserId),
}

impl PostFilter {
    /// Whether `post` belongs in the listing.
    pub fn matches(&self, post: &Post) -> bool {
        match self {
            Self::Published => post.is_published(),
            Self::ByAuthor(author) => post.is_owned_by(author),
        }
    }
}

/// Comment with its author resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    /// Comment identifier.
    #[schema(value_type = String)]
    pub id: CommentId,
    /// Commenting user.
    pub author: UserProfile,
    /// Trimmed text.
    pub text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Full post as shown on its own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    /// Identifier.
    #[schema(value_type = String)]
    pub id: PostId,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Teaser.
    pub excerpt: String,
    /// Tags in order.
    pub tags: Vec<String>,
    /// Image reference.
    pub featured_image: String,
    /// Publication state.
    pub status: PostStatus,
    /// Public read count.
    pub views: u64,
    /// Owning user.
    pub author: UserProfile,
    /// Comments in creation order.
    pub comments: Vec<CommentView>,
    /// Derived like count.
    pub like_count: usize,
    /// Derived comment count.
    pub comment_count: usize,
    /// Whether the viewing user likes the post.
    pub liked_by_viewer: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    /// Resolve `post` against `directory` for `viewer`.
    pub fn resolve(post: &Post, directory: &ProfileDirectory, viewer: Option<&UserId>) -> Self {
        Self {
            id: *post.id(),
            title: post.title().as_ref().to_owned(),
            content: post.content().as_ref().to_owned(),
            excerpt: post.excerpt().as_ref().to_owned(),
            tags: post.tags().as_slice().to_vec(),
            featured_image: post.featured_image().to_owned(),
            status: post.status(),
            views: post.views(),
            author: profile_for(directory, post.author()),
            comments: post
                .comments()
                .iter()
                .map(|comment| CommentView {
                    id: comment.id,
                    author: profile_for(directory, &comment.author),
                    text: comment.text.clone(),
                    created_at: comment.created_at,
                })
                .collect(),
            like_count: post.like_count(),
            comment_count: post.comment_count(),
            liked_by_viewer: viewer.is_some_and(|user| post.is_liked_by(user)),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
        }
    }
}

/// Listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// Identifier.
    #[schema(value_type = String)]
    pub id: PostId,
    /// Title.
    pub title: String,
    /// Teaser.
    pub excerpt: String,
    /// Tags in order.
    pub tags: Vec<String>,
    /// Image reference.
    pub featured_image: String,
    /// Publication state.
    pub status: PostStatus,
    /// Public read count.
    pub views: u64,
    /// Owning user.
    pub author: UserProfile,
    /// Derived like count.
    pub like_count: usize,
    /// Derived comment count.
    pub comment_count: usize,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl PostSummary {
    /// Summarise `post`, resolving its author against `directory`.
    pub fn resolve(post: &Post, directory: &ProfileDirectory) -> Self {
        Self {
            id: *post.id(),
            title: post.title().as_ref().to_owned(),
            excerpt: post.excerpt().as_ref().to_owned(),
            tags: post.tags().as_slice().to_vec(),
            featured_image: post.featured_image().to_owned(),
            status: post.status(),
            views: post.views(),
            author: profile_for(directory, post.author()),
            like_count: post.like_count(),
            comment_count: post.comment_count(),
            created_at: post.created_at(),
        }
    }
}

/// Personal landing page for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// The caller's newest posts, any status.
    pub user_posts: Vec<PostSummary>,
    /// The newest published posts overall.
    pub recent_posts: Vec<PostSummary>,
}
