//! In-memory `PostRepository` implementation.
//!
//! Each single-post mutation runs against the stored record under one write
//! lock, so concurrent likes or comments on the same post are all applied.
//! Listings order by insertion sequence, newest first.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::{Page, PageRequest};
use tokio::sync::RwLock;

use crate::domain::ports::{PostPersistenceError, PostRepository};
use crate::domain::{Comment, LikeToggle, Post, PostEdit, PostFilter, PostId, UserId};

#[derive(Debug)]
struct StoredPost {
    sequence: u64,
    post: Post,
}

#[derive(Debug, Default)]
struct PostTable {
    next_sequence: u64,
    rows: HashMap<PostId, StoredPost>,
}

impl PostTable {
    fn post_mut(&mut self, id: &PostId) -> Option<&mut Post> {
        self.rows.get_mut(id).map(|row| &mut row.post)
    }
}

/// Process-local implementation of the `PostRepository` port.
///
/// Cloning shares the underlying table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPostRepository {
    table: Arc<RwLock<PostTable>>,
}

impl InMemoryPostRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), PostPersistenceError> {
        let mut table = self.table.write().await;
        if table.rows.contains_key(post.id()) {
            return Err(PostPersistenceError::query(format!(
                "post {} already exists",
                post.id()
            )));
        }
        let sequence = table.next_sequence;
        table.next_sequence += 1;
        table.rows.insert(
            *post.id(),
            StoredPost {
                sequence,
                post: post.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .get(id)
            .map(|row| row.post.clone()))
    }

    async fn list(
        &self,
        filter: PostFilter,
        page: PageRequest,
    ) -> Result<Page<Post>, PostPersistenceError> {
        let table = self.table.read().await;
        let mut matching: Vec<&StoredPost> = table
            .rows
            .values()
            .filter(|row| filter.matches(&row.post))
            .collect();
        matching.sort_unstable_by(|a, b| b.sequence.cmp(&a.sequence));
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .map(|row| row.post.clone())
            .collect();
        Ok(Page::new(items, page, total))
    }

    async fn record_view(&self, id: &PostId) -> Result<Option<Post>, PostPersistenceError> {
        let mut table = self.table.write().await;
        Ok(table
            .post_mut(id)
            .filter(|post| post.is_published())
            .map(|post| {
                post.record_view();
                post.clone()
            }))
    }

    async fn update_editable(
        &self,
        id: &PostId,
        edit: PostEdit,
        now: DateTime<Utc>,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut table = self.table.write().await;
        Ok(table.post_mut(id).map(|post| {
            post.apply_edit(edit, now);
            post.clone()
        }))
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostPersistenceError> {
        Ok(self.table.write().await.rows.remove(id).is_some())
    }

    async fn append_comment(
        &self,
        id: &PostId,
        comment: Comment,
    ) -> Result<Option<Post>, PostPersistenceError> {
        let mut table = self.table.write().await;
        Ok(table.post_mut(id).map(|post| {
            post.push_comment(comment);
            post.clone()
        }))
    }

    async fn toggle_like(
        &self,
        id: &PostId,
        user: &UserId,
    ) -> Result<Option<LikeToggle>, PostPersistenceError> {
        let mut table = self.table.write().await;
        Ok(table.post_mut(id).map(|post| post.toggle_like(*user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CommentText, Content, NewPost, PostStatus, Tags, Title};
    use rstest::{fixture, rstest};

    fn post(author: UserId, status: PostStatus, title: &str) -> Post {
        Post::create(
            PostId::random(),
            author,
            NewPost {
                title: Title::new(title).expect("title"),
                content: Content::new("A body long enough to keep.").expect("content"),
                tags: Tags::default(),
                status,
                excerpt: None,
                featured_image: None,
            },
            Utc::now(),
        )
    }

    #[fixture]
    fn repo() -> InMemoryPostRepository {
        InMemoryPostRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn listings_are_newest_first_and_filtered(repo: InMemoryPostRepository) {
        let author = UserId::random();
        let other = UserId::random();
        for (owner, status, title) in [
            (author, PostStatus::Published, "first"),
            (author, PostStatus::Draft, "second"),
            (other, PostStatus::Published, "third"),
        ] {
            repo.insert(&post(owner, status, title)).await.expect("insert");
        }

        let published = repo
            .list(PostFilter::Published, PageRequest::default())
            .await
            .expect("list");
        let titles: Vec<_> = published
            .items
            .iter()
            .map(|post| post.title().as_ref().to_owned())
            .collect();
        assert_eq!(titles, ["third", "first"]);

        let mine = repo
            .list(PostFilter::ByAuthor(author), PageRequest::default())
            .await
            .expect("list");
        assert_eq!(mine.page_info.total_items, 2);
        assert_eq!(mine.items[0].title().as_ref(), "second");
    }

    #[rstest]
    #[tokio::test]
    async fn pages_slice_after_ordering(repo: InMemoryPostRepository) {
        let author = UserId::random();
        for index in 0..13 {
            repo.insert(&post(author, PostStatus::Published, &format!("post {index}")))
                .await
                .expect("insert");
        }

        let page = repo
            .list(
                PostFilter::Published,
                PageRequest::with_default_size(3),
            )
            .await
            .expect("list");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].title().as_ref(), "post 0");
        assert_eq!(page.page_info.total_pages, 3);
        assert!(!page.page_info.has_next_page);
    }

    #[rstest]
    #[tokio::test]
    async fn views_only_count_on_published_posts(repo: InMemoryPostRepository) {
        let published = post(UserId::random(), PostStatus::Published, "open");
        let draft = post(UserId::random(), PostStatus::Draft, "closed");
        repo.insert(&published).await.expect("insert");
        repo.insert(&draft).await.expect("insert");

        repo.record_view(published.id()).await.expect("view");
        let after = repo.record_view(published.id()).await.expect("view");

        assert_eq!(after.map(|post| post.views()), Some(2));
        assert_eq!(repo.record_view(draft.id()).await.expect("view"), None);
        let stored = repo.find_by_id(draft.id()).await.expect("find");
        assert_eq!(stored.map(|post| post.views()), Some(0));
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_likes_and_comments_all_land(repo: InMemoryPostRepository) {
        let target = post(UserId::random(), PostStatus::Published, "popular");
        repo.insert(&target).await.expect("insert");

        let likers: Vec<UserId> = (0..8).map(|_| UserId::random()).collect();
        let tasks = likers.iter().map(|user| {
            let repo = repo.clone();
            let id = *target.id();
            let user = *user;
            async move {
                repo.toggle_like(&id, &user).await.expect("like");
                let text = CommentText::parse("nice").expect("valid").expect("non-blank");
                repo.append_comment(&id, Comment::new(user, text, Utc::now()))
                    .await
                    .expect("comment");
            }
        });
        futures::future::join_all(tasks).await;

        let stored = repo
            .find_by_id(target.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.like_count(), likers.len());
        assert_eq!(stored.comment_count(), likers.len());
    }

    #[rstest]
    #[tokio::test]
    async fn deletes_are_permanent(repo: InMemoryPostRepository) {
        let target = post(UserId::random(), PostStatus::Published, "gone");
        repo.insert(&target).await.expect("insert");

        assert!(repo.delete(target.id()).await.expect("delete"));
        assert!(!repo.delete(target.id()).await.expect("delete"));
        assert_eq!(repo.find_by_id(target.id()).await.expect("find"), None);
        assert_eq!(
            repo.toggle_like(target.id(), &UserId::random())
                .await
                .expect("toggle"),
            None
        );
    }
}
