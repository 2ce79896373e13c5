//! Tests for the post service.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockPostRepository, MockUserRepository, PostPersistenceError};
use crate::domain::{
    Content, EmailAddress, ErrorCode, PasswordHash, PostStatus, Tags, Title, Username,
};
use chrono::Utc;
use mockable::DefaultClock;
use rstest::rstest;

fn member(name: &str) -> User {
    User::builder(
        UserId::random(),
        Username::new(name).expect("username"),
        EmailAddress::new(format!("{name}@example.com")).expect("email"),
        PasswordHash::new("hash"),
        Utc::now(),
    )
    .build()
}

fn signed_in(user: &User) -> Identity {
    Identity::Authenticated(user.clone())
}

fn new_post(status: PostStatus) -> NewPost {
    NewPost {
        title: Title::new("Rust ownership").expect("title"),
        content: Content::new("Borrowing without tears, mostly.").expect("content"),
        tags: Tags::from_csv("rust, ownership"),
        status,
        excerpt: None,
        featured_image: None,
    }
}

fn post_by(author: &User, status: PostStatus) -> Post {
    Post::create(PostId::random(), *author.id(), new_post(status), Utc::now())
}

fn edit() -> PostEditRequest {
    PostEditRequest {
        title: "Rust ownership, revised".to_owned(),
        content: "Borrowing with a few tears.".to_owned(),
        tags: Tags::from_csv("rust"),
        status: Some("published".to_owned()),
    }
}

fn invalid_edit() -> PostEditRequest {
    PostEditRequest {
        title: String::new(),
        content: "x".to_owned(),
        ..PostEditRequest::default()
    }
}

fn profiles_for(users: Vec<User>) -> MockUserRepository {
    let mut repo = MockUserRepository::new();
    repo.expect_find_profiles().returning(move |ids| {
        Ok(users
            .iter()
            .filter(|user| ids.contains(user.id()))
            .map(User::profile)
            .collect())
    });
    repo
}

fn make_service(
    posts: MockPostRepository,
    users: MockUserRepository,
) -> PostService<MockPostRepository, MockUserRepository> {
    PostService::new(Arc::new(posts), Arc::new(users), Arc::new(DefaultClock))
}

fn stored(mut posts: MockPostRepository, post: &Post) -> MockPostRepository {
    let post = post.clone();
    posts
        .expect_find_by_id()
        .returning(move |_| Ok(Some(post.clone())));
    posts
}

#[tokio::test]
async fn create_assigns_caller_as_author() {
    let author = member("author");
    let mut posts = MockPostRepository::new();
    let author_id = *author.id();
    posts
        .expect_insert()
        .withf(move |post| post.author() == &author_id)
        .times(1)
        .return_once(|_| Ok(()));

    let post = make_service(posts, MockUserRepository::new())
        .create(&signed_in(&author), new_post(PostStatus::Published))
        .await
        .expect("create succeeds");

    assert_eq!(post.author(), author.id());
    assert_eq!(post.views(), 0);
    assert_eq!(post.excerpt().as_ref(), "Borrowing without tears, mostly.");
}

#[tokio::test]
async fn anonymous_callers_cannot_create() {
    let mut posts = MockPostRepository::new();
    posts.expect_insert().times(0);
    let error = make_service(posts, MockUserRepository::new())
        .create(&Identity::Anonymous, new_post(PostStatus::Published))
        .await
        .expect_err("anonymous rejected");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn read_counts_a_view_and_resolves_authors() {
    let author = member("author");
    let mut post = post_by(&author, PostStatus::Published);
    post.record_view();
    let mut posts = MockPostRepository::new();
    let returned = post.clone();
    posts
        .expect_record_view()
        .times(1)
        .return_once(move |_| Ok(Some(returned)));
    posts.expect_find_by_id().times(0);

    let view = make_service(posts, profiles_for(vec![author.clone()]))
        .read(post.id(), &Identity::Anonymous)
        .await
        .expect("read succeeds");

    assert_eq!(view.views, 1);
    assert_eq!(view.author.username, "author");
    assert!(!view.liked_by_viewer);
}

#[rstest]
#[case::anonymous(None)]
#[case::stranger(Some("stranger"))]
#[tokio::test]
async fn drafts_read_as_missing_to_non_owners(#[case] viewer: Option<&str>) {
    let author = member("author");
    let draft = post_by(&author, PostStatus::Draft);
    let mut posts = stored(MockPostRepository::new(), &draft);
    posts.expect_record_view().return_once(|_| Ok(None));
    let identity = viewer.map_or(Identity::Anonymous, |name| signed_in(&member(name)));

    let error = make_service(posts, MockUserRepository::new())
        .read(draft.id(), &identity)
        .await
        .expect_err("draft hidden");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn public_read_hides_drafts_from_their_author() {
    let author = member("author");
    let draft = post_by(&author, PostStatus::Draft);
    let mut posts = MockPostRepository::new();
    posts.expect_record_view().times(1).return_once(|_| Ok(None));
    posts.expect_find_by_id().times(0);

    let error = make_service(posts, MockUserRepository::new())
        .read(draft.id(), &signed_in(&author))
        .await
        .expect_err("draft hidden from public read");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn edit_by_non_owner_is_forbidden() {
    let author = member("author");
    let post = post_by(&author, PostStatus::Published);
    let mut posts = stored(MockPostRepository::new(), &post);
    posts.expect_update_editable().times(0);

    let error = make_service(posts, MockUserRepository::new())
        .edit(post.id(), &signed_in(&member("intruder")), edit())
        .await
        .expect_err("non-owner rejected");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn edit_of_a_foreign_draft_is_not_found() {
    let author = member("author");
    let draft = post_by(&author, PostStatus::Draft);
    let posts = stored(MockPostRepository::new(), &draft);

    let error = make_service(posts, MockUserRepository::new())
        .edit(draft.id(), &signed_in(&member("intruder")), edit())
        .await
        .expect_err("draft hidden");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn anonymous_edit_requires_login_before_lookup() {
    let mut posts = MockPostRepository::new();
    posts.expect_find_by_id().times(0);

    let error = make_service(posts, MockUserRepository::new())
        .edit(&PostId::random(), &Identity::Anonymous, edit())
        .await
        .expect_err("anonymous rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn non_owner_is_forbidden_before_fields_are_validated() {
    let author = member("author");
    let post = post_by(&author, PostStatus::Published);
    let mut posts = stored(MockPostRepository::new(), &post);
    posts.expect_update_editable().times(0);

    let error = make_service(posts, MockUserRepository::new())
        .edit(post.id(), &signed_in(&member("intruder")), invalid_edit())
        .await
        .expect_err("non-owner rejected");

    assert_eq!(error.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn missing_post_is_reported_before_fields_are_validated() {
    let mut posts = MockPostRepository::new();
    posts.expect_find_by_id().return_once(|_| Ok(None));
    posts.expect_update_editable().times(0);

    let error = make_service(posts, MockUserRepository::new())
        .edit(&PostId::random(), &signed_in(&member("author")), invalid_edit())
        .await
        .expect_err("missing post");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn owner_edit_with_invalid_fields_is_rejected() {
    let author = member("author");
    let post = post_by(&author, PostStatus::Published);
    let mut posts = stored(MockPostRepository::new(), &post);
    posts.expect_update_editable().times(0);

    let error = make_service(posts, MockUserRepository::new())
        .edit(post.id(), &signed_in(&author), invalid_edit())
        .await
        .expect_err("invalid edit");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(
        error.details().and_then(|details| details.get("field")),
        Some(&serde_json::json!("title"))
    );
}

#[tokio::test]
async fn owner_edit_replaces_editable_fields() {
    let author = member("author");
    let post = post_by(&author, PostStatus::Draft);
    let mut posts = stored(MockPostRepository::new(), &post);
    let mut updated = post.clone();
    updated.apply_edit(PostEdit::try_from(edit()).expect("valid edit"), Utc::now());
    posts
        .expect_update_editable()
        .withf(|_, edit, _| edit.status == PostStatus::Published)
        .times(1)
        .return_once(move |_, _, _| Ok(Some(updated)));

    let result = make_service(posts, MockUserRepository::new())
        .edit(post.id(), &signed_in(&author), edit())
        .await
        .expect("edit succeeds");

    assert_eq!(result.title().as_ref(), "Rust ownership, revised");
    assert_eq!(result.author(), author.id());
    assert_eq!(result.excerpt(), post.excerpt());
}

#[tokio::test]
async fn delete_reports_missing_posts() {
    let author = member("author");
    let mut posts = MockPostRepository::new();
    posts.expect_find_by_id().return_once(|_| Ok(None));
    posts.expect_delete().times(0);

    let error = make_service(posts, MockUserRepository::new())
        .delete(&PostId::random(), &signed_in(&author))
        .await
        .expect_err("missing post");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn delete_lost_race_reports_missing() {
    let author = member("author");
    let post = post_by(&author, PostStatus::Published);
    let mut posts = stored(MockPostRepository::new(), &post);
    posts.expect_delete().times(1).return_once(|_| Ok(false));

    let error = make_service(posts, MockUserRepository::new())
        .delete(post.id(), &signed_in(&author))
        .await
        .expect_err("already gone");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case("")]
#[case("   \n\t")]
#[tokio::test]
async fn blank_comments_leave_the_post_unchanged(#[case] text: &str) {
    let author = member("author");
    let post = post_by(&author, PostStatus::Published);
    let mut posts = stored(MockPostRepository::new(), &post);
    posts.expect_append_comment().times(0);

    let result = make_service(posts, MockUserRepository::new())
        .add_comment(post.id(), &signed_in(&member("reader")), text)
        .await
        .expect("no-op succeeds");

    assert_eq!(result, post);
}

#[tokio::test]
async fn comments_are_trimmed_and_attributed() {
    let author = member("author");
    let reader = member("reader");
    let post = post_by(&author, PostStatus::Published);
    let mut posts = stored(MockPostRepository::new(), &post);
    let reader_id = *reader.id();
    let base = post.clone();
    posts
        .expect_append_comment()
        .withf(move |_, comment| comment.text == "hi" && comment.author == reader_id)
        .times(1)
        .return_once(move |_, comment| {
            let mut updated = base;
            updated.push_comment(comment);
            Ok(Some(updated))
        });

    let result = make_service(posts, MockUserRepository::new())
        .add_comment(post.id(), &signed_in(&reader), "  hi  ")
        .await
        .expect("comment succeeds");

    assert_eq!(result.comment_count(), 1);
}

#[tokio::test]
async fn overlong_comments_are_rejected() {
    let author = member("author");
    let post = post_by(&author, PostStatus::Published);
    let mut posts = stored(MockPostRepository::new(), &post);
    posts.expect_append_comment().times(0);

    let error = make_service(posts, MockUserRepository::new())
        .add_comment(post.id(), &signed_in(&author), &"x".repeat(1001))
        .await
        .expect_err("too long");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn toggle_like_passes_through_the_store_outcome() {
    let author = member("author");
    let reader = member("reader");
    let post = post_by(&author, PostStatus::Published);
    let mut posts = stored(MockPostRepository::new(), &post);
    let reader_id = *reader.id();
    posts
        .expect_toggle_like()
        .withf(move |_, user| *user == reader_id)
        .times(1)
        .return_once(|_, _| {
            Ok(Some(LikeToggle {
                liked: true,
                like_count: 1,
            }))
        });

    let outcome = make_service(posts, MockUserRepository::new())
        .toggle_like(post.id(), &signed_in(&reader))
        .await
        .expect("toggle succeeds");

    assert_eq!(
        outcome,
        LikeToggle {
            liked: true,
            like_count: 1
        }
    );
}

#[tokio::test]
async fn liking_a_foreign_draft_is_not_found() {
    let author = member("author");
    let draft = post_by(&author, PostStatus::Draft);
    let mut posts = stored(MockPostRepository::new(), &draft);
    posts.expect_toggle_like().times(0);

    let error = make_service(posts, MockUserRepository::new())
        .toggle_like(draft.id(), &signed_in(&member("reader")))
        .await
        .expect_err("draft hidden");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn listing_by_author_requires_login_and_filters_by_caller() {
    let author = member("author");
    let author_id = *author.id();
    let mut posts = MockPostRepository::new();
    let draft = post_by(&author, PostStatus::Draft);
    posts
        .expect_list()
        .withf(move |filter, page| {
            *filter == PostFilter::ByAuthor(author_id) && page.page() == 2
        })
        .times(1)
        .return_once(move |_, page| Ok(Page::new(vec![draft], page, 7)));
    let service = make_service(posts, profiles_for(vec![author.clone()]));

    let page = service
        .list_by_author(&signed_in(&author), PageRequest::with_default_size(2))
        .await
        .expect("listing succeeds");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.page_info.total_pages, 2);
    assert!(page.page_info.has_prev_page);

    let error = service
        .list_by_author(&Identity::Anonymous, PageRequest::default())
        .await
        .expect_err("anonymous rejected");
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[tokio::test]
async fn dashboard_combines_own_and_recent_posts() {
    let author = member("author");
    let other = member("other");
    let mine = post_by(&author, PostStatus::Draft);
    let theirs = post_by(&other, PostStatus::Published);
    let mut posts = MockPostRepository::new();
    posts
        .expect_list()
        .withf(|filter, page| matches!(filter, PostFilter::ByAuthor(_)) && page.limit() == 5)
        .times(1)
        .return_once(move |_, page| Ok(Page::new(vec![mine], page, 1)));
    posts
        .expect_list()
        .withf(|filter, page| *filter == PostFilter::Published && page.limit() == 3)
        .times(1)
        .return_once(move |_, page| Ok(Page::new(vec![theirs], page, 1)));

    let dashboard = make_service(posts, profiles_for(vec![author.clone(), other.clone()]))
        .dashboard(&signed_in(&author))
        .await
        .expect("dashboard");

    assert_eq!(dashboard.user_posts.len(), 1);
    assert_eq!(dashboard.user_posts[0].status, PostStatus::Draft);
    assert_eq!(dashboard.recent_posts[0].author.username, "other");
}

#[tokio::test]
async fn home_feed_requests_the_newest_ten() {
    let mut posts = MockPostRepository::new();
    posts
        .expect_list()
        .withf(|filter, page| *filter == PostFilter::Published && page.limit() == 10)
        .times(1)
        .return_once(|_, page| Ok(Page::new(Vec::new(), page, 0)));

    let feed = make_service(posts, MockUserRepository::new())
        .home_feed()
        .await
        .expect("feed");
    assert!(feed.is_empty());
}

#[tokio::test]
async fn store_outages_surface_as_unavailable() {
    let mut posts = MockPostRepository::new();
    posts
        .expect_list()
        .return_once(|_, _| Err(PostPersistenceError::connection("down")));

    let error = make_service(posts, MockUserRepository::new())
        .list_published(PageRequest::default())
        .await
        .expect_err("outage");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn missing_profiles_fall_back_to_placeholders() {
    let author = member("author");
    let post = post_by(&author, PostStatus::Published);
    let mut posts = MockPostRepository::new();
    let returned = post.clone();
    posts
        .expect_record_view()
        .return_once(move |_| Ok(Some(returned)));

    let view = make_service(posts, profiles_for(Vec::new()))
        .read(post.id(), &Identity::Anonymous)
        .await
        .expect("read succeeds");

    assert_eq!(view.author, crate::domain::UserProfile::unknown(*author.id()));
}
