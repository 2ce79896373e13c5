//! Content lifecycle: authoring, reading and engaging with posts.
//!
//! Every path applies the same visibility rule before any capability check
//! that could leak existence: a draft is reported as missing to everyone but
//! its author. Counters and engagement lists are mutated through repository
//! primitives so concurrent requests compose instead of overwriting.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::{debug, info};

use super::ports::{
    DASHBOARD_OWN_LEN, DASHBOARD_RECENT_LEN, HOME_FEED_LEN, PostRepository, PostsCommand,
    PostsQuery, UserRepository,
};
use super::{
    Capability, Comment, CommentText, Dashboard, Error, Identity, LikeToggle, NewPost, Post,
    PostEdit, PostEditRequest, PostFilter, PostId, PostSummary, PostView, ProfileDirectory, User,
    UserId, authorize,
};

const POST_NOT_FOUND: &str = "Post not found";

fn post_not_found() -> Error {
    Error::not_found(POST_NOT_FOUND)
}

/// Post service implementing [`PostsCommand`] and [`PostsQuery`].
#[derive(Clone)]
pub struct PostService<P, U> {
    posts: Arc<P>,
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<P, U> PostService<P, U> {
    /// Create a new service over the given stores.
    pub fn new(posts: Arc<P>, users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            posts,
            users,
            clock,
        }
    }
}

impl<P, U> PostService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    /// Fetch a post the caller is allowed to know about.
    async fn find_visible(&self, id: &PostId, viewer: Option<&UserId>) -> Result<Post, Error> {
        match self.posts.find_by_id(id).await? {
            Some(post) if post.is_visible_to(viewer) => Ok(post),
            _ => Err(post_not_found()),
        }
    }

    /// Fetch a visible post and require the caller to own it.
    async fn find_owned<'i>(
        &self,
        id: &PostId,
        identity: &'i Identity,
    ) -> Result<(Post, &'i User), Error> {
        let caller = authorize(Capability::Authenticated, identity)?;
        let post = self.find_visible(id, Some(caller.id())).await?;
        authorize(Capability::Owner(post.author()), identity)?;
        Ok((post, caller))
    }

    /// Public profiles for every author and commenter referenced by `posts`.
    async fn directory_for<'a>(
        &self,
        posts: impl IntoIterator<Item = &'a Post>,
    ) -> Result<ProfileDirectory, Error> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for post in posts {
            let referenced = std::iter::once(post.author())
                .chain(post.comments().iter().map(|comment| &comment.author));
            for id in referenced {
                if seen.insert(*id) {
                    ids.push(*id);
                }
            }
        }
        if ids.is_empty() {
            return Ok(ProfileDirectory::new());
        }
        let profiles = self.users.find_profiles(&ids).await?;
        Ok(profiles
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect())
    }

    async fn view_of(&self, post: &Post, viewer: Option<&UserId>) -> Result<PostView, Error> {
        let directory = self.directory_for([post]).await?;
        Ok(PostView::resolve(post, &directory, viewer))
    }

    async fn summaries(&self, page: Page<Post>) -> Result<Page<PostSummary>, Error> {
        let directory = self.directory_for(page.items.iter()).await?;
        Ok(page.map(|post| PostSummary::resolve(&post, &directory)))
    }

    async fn list(&self, filter: PostFilter, page: PageRequest) -> Result<Page<PostSummary>, Error> {
        let posts = self.posts.list(filter, page).await?;
        self.summaries(posts).await
    }
}

#[async_trait]
impl<P, U> PostsCommand for PostService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    async fn create(&self, identity: &Identity, new_post: NewPost) -> Result<Post, Error> {
        let author = authorize(Capability::Authenticated, identity)?;
        let post = Post::create(PostId::random(), *author.id(), new_post, self.clock.utc());
        self.posts.insert(&post).await?;
        info!(post_id = %post.id(), author = %author.id(), status = %post.status(), "created post");
        Ok(post)
    }

    async fn edit(
        &self,
        id: &PostId,
        identity: &Identity,
        request: PostEditRequest,
    ) -> Result<Post, Error> {
        let (_, caller) = self.find_owned(id, identity).await?;
        let edit = PostEdit::try_from(request)?;
        let post = self
            .posts
            .update_editable(id, edit, self.clock.utc())
            .await?
            .ok_or_else(post_not_found)?;
        info!(post_id = %id, author = %caller.id(), "edited post");
        Ok(post)
    }

    async fn delete(&self, id: &PostId, identity: &Identity) -> Result<(), Error> {
        let (_, caller) = self.find_owned(id, identity).await?;
        if !self.posts.delete(id).await? {
            return Err(post_not_found());
        }
        info!(post_id = %id, author = %caller.id(), "deleted post");
        Ok(())
    }

    async fn add_comment(
        &self,
        id: &PostId,
        identity: &Identity,
        text: &str,
    ) -> Result<Post, Error> {
        let caller = authorize(Capability::Authenticated, identity)?;
        let post = self.find_visible(id, Some(caller.id())).await?;
        let Some(text) = CommentText::parse(text)? else {
            debug!(post_id = %id, "ignored blank comment");
            return Ok(post);
        };
        let comment = Comment::new(*caller.id(), text, self.clock.utc());
        let updated = self
            .posts
            .append_comment(id, comment)
            .await?
            .ok_or_else(post_not_found)?;
        info!(post_id = %id, author = %caller.id(), "added comment");
        Ok(updated)
    }

    async fn toggle_like(&self, id: &PostId, identity: &Identity) -> Result<LikeToggle, Error> {
        let caller = authorize(Capability::Authenticated, identity)?;
        self.find_visible(id, Some(caller.id())).await?;
        let outcome = self
            .posts
            .toggle_like(id, caller.id())
            .await?
            .ok_or_else(post_not_found)?;
        debug!(post_id = %id, user_id = %caller.id(), liked = outcome.liked, "toggled like");
        Ok(outcome)
    }
}

#[async_trait]
impl<P, U> PostsQuery for PostService<P, U>
where
    P: PostRepository,
    U: UserRepository,
{
    async fn list_published(&self, page: PageRequest) -> Result<Page<PostSummary>, Error> {
        self.list(PostFilter::Published, page).await
    }

    async fn list_by_author(
        &self,
        identity: &Identity,
        page: PageRequest,
    ) -> Result<Page<PostSummary>, Error> {
        let caller = authorize(Capability::Authenticated, identity)?;
        self.list(PostFilter::ByAuthor(*caller.id()), page).await
    }

    async fn read(&self, id: &PostId, identity: &Identity) -> Result<PostView, Error> {
        // Drafts never come back from the public read, not even to their author.
        let post = self
            .posts
            .record_view(id)
            .await?
            .ok_or_else(post_not_found)?;
        self.view_of(&post, identity.user_id()).await
    }

    async fn fetch_for_edit(&self, id: &PostId, identity: &Identity) -> Result<PostView, Error> {
        let (post, caller) = self.find_owned(id, identity).await?;
        self.view_of(&post, Some(caller.id())).await
    }

    async fn home_feed(&self) -> Result<Vec<PostSummary>, Error> {
        let page = self
            .list(PostFilter::Published, PageRequest::first(HOME_FEED_LEN))
            .await?;
        Ok(page.items)
    }

    async fn dashboard(&self, identity: &Identity) -> Result<Dashboard, Error> {
        let caller = authorize(Capability::Authenticated, identity)?;
        let own = self
            .posts
            .list(
                PostFilter::ByAuthor(*caller.id()),
                PageRequest::first(DASHBOARD_OWN_LEN),
            )
            .await?;
        let recent = self
            .posts
            .list(
                PostFilter::Published,
                PageRequest::first(DASHBOARD_RECENT_LEN),
            )
            .await?;
        let directory = self
            .directory_for(own.items.iter().chain(recent.items.iter()))
            .await?;
        let summarise = |posts: Vec<Post>| -> Vec<PostSummary> {
            posts
                .iter()
                .map(|post| PostSummary::resolve(post, &directory))
                .collect()
        };
        Ok(Dashboard {
            user_posts: summarise(own.items),
            recent_posts: summarise(recent.items),
        })
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
