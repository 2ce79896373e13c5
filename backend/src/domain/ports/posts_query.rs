//! Driving port for post reads and feeds.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Dashboard, Error, Identity, PostId, PostSummary, PostView};

/// Number of posts on the home feed.
pub const HOME_FEED_LEN: usize = 10;
/// Number of the caller's own posts on the dashboard.
pub const DASHBOARD_OWN_LEN: usize = 5;
/// Number of recent published posts on the dashboard.
pub const DASHBOARD_RECENT_LEN: usize = 3;

/// Domain use-case port for reading posts.
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Published posts, newest first.
    async fn list_published(&self, page: PageRequest) -> Result<Page<PostSummary>, Error>;

    /// The caller's posts in any status, newest first.
    async fn list_by_author(
        &self,
        identity: &Identity,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, Error>;

    /// A published post, counting one view.
    async fn read(&self, id: &PostId, identity: &Identity) -> Result<PostView, Error>;

    /// A post in any status, for its owner to edit. Does not count a view.
    async fn fetch_for_edit(&self, id: &PostId, identity: &Identity) -> Result<PostView, Error>;

    /// The newest published posts.
    async fn home_feed(&self) -> Result<Vec<PostSummary>, Error>;

    /// The caller's newest posts alongside the newest published posts.
    async fn dashboard(&self, identity: &Identity) -> Result<Dashboard, Error>;
}
