//! Post API handlers.
//!
//! ```text
//! GET    /api/v1/posts?page=2
//! GET    /api/v1/me/posts?page=1
//! POST   /api/v1/posts {"title":"Hello","content":"A first post body","tags":"rust, web"}
//! GET    /api/v1/posts/{id}
//! GET    /api/v1/posts/{id}/edit
//! PUT    /api/v1/posts/{id} {"title":"Hello again","content":"An edited body","status":"draft"}
//! DELETE /api/v1/posts/{id}
//! POST   /api/v1/posts/{id}/comments {"text":"Nice one"}
//! POST   /api/v1/posts/{id}/like
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{Page, PageInfo, PageRequest};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Comment, Content, Error, Excerpt, LikeToggle, NewPost, Post, PostEditRequest, PostId,
    PostStatus, PostSummary, PostValidationError, PostView, Tags, Title, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{RequireUser, SessionContext};
use crate::inbound::http::state::HttpState;

/// Optional `?page=` query. Anything that is not a positive integer means
/// the first page.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// One-based page number.
    #[param(value_type = Option<u32>)]
    pub page: Option<String>,
}

impl PageQuery {
    fn to_request(&self) -> PageRequest {
        let page = self
            .page
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(1);
        PageRequest::with_default_size(page)
    }
}

/// Tags as either a comma-separated string or a list.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum TagsInput {
    Csv(String),
    List(Vec<String>),
}

impl From<TagsInput> for Tags {
    fn from(value: TagsInput) -> Self {
        match value {
            TagsInput::Csv(raw) => Tags::from_csv(&raw),
            TagsInput::List(items) => Tags::new(items),
        }
    }
}

fn tags_from(input: Option<TagsInput>) -> Tags {
    input.map(Tags::from).unwrap_or_default()
}

/// Request body for `POST /api/v1/posts`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub tags: Option<TagsInput>,
    /// `draft` or `published`; defaults to `published`.
    pub status: Option<String>,
    /// Teaser of at most 300 characters; derived from the body when absent.
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
}

impl TryFrom<CreatePostRequest> for NewPost {
    type Error = PostValidationError;

    fn try_from(value: CreatePostRequest) -> Result<Self, Self::Error> {
        let title = Title::new(&value.title)?;
        let content = Content::new(value.content)?;
        let excerpt = match value.excerpt.as_deref() {
            Some(raw) => Excerpt::new(raw)?,
            None => None,
        };
        Ok(Self {
            title,
            content,
            tags: tags_from(value.tags),
            status: PostStatus::parse(value.status.as_deref())?,
            excerpt,
            featured_image: value.featured_image,
        })
    }
}

/// Request body for `PUT /api/v1/posts/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    pub tags: Option<TagsInput>,
    /// `draft` or `published`; defaults to `published`.
    pub status: Option<String>,
}

impl From<UpdatePostRequest> for PostEditRequest {
    fn from(value: UpdatePostRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            tags: tags_from(value.tags),
            status: value.status,
        }
    }
}

/// Request body for `POST /api/v1/posts/{id}/comments`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CommentRequest {
    pub text: String,
}

/// Stored post as returned by mutations.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    #[schema(value_type = String)]
    pub id: PostId,
    #[schema(value_type = String)]
    pub author: UserId,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub featured_image: String,
    pub status: PostStatus,
    pub views: u64,
    pub like_count: usize,
    pub comment_count: usize,
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: *post.id(),
            author: *post.author(),
            title: post.title().as_ref().to_owned(),
            content: post.content().as_ref().to_owned(),
            excerpt: post.excerpt().as_ref().to_owned(),
            tags: post.tags().as_slice().to_vec(),
            featured_image: post.featured_image().to_owned(),
            status: post.status(),
            views: post.views(),
            like_count: post.like_count(),
            comment_count: post.comment_count(),
            comments: post.comments().to_vec(),
            created_at: post.created_at(),
            updated_at: post.updated_at(),
        }
    }
}

/// A page of post summaries.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<PostSummary>,
    #[schema(value_type = Object)]
    pub page_info: PageInfo,
}

impl From<Page<PostSummary>> for PostPage {
    fn from(page: Page<PostSummary>) -> Self {
        Self {
            posts: page.items,
            page_info: page.page_info,
        }
    }
}

/// Acknowledgement of a deletion.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Parse a path id. Malformed ids are indistinguishable from missing posts.
fn parse_post_id(raw: &str) -> Result<PostId, Error> {
    PostId::new(raw).map_err(|_| Error::not_found("Post not found"))
}

/// Published posts, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/posts",
    params(PageQuery),
    responses(
        (status = 200, description = "Published posts", body = PostPage),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listPosts",
    security((), ("token" = []))
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    _session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<PostPage>> {
    let page = state.posts_query.list_published(query.to_request()).await?;
    Ok(web::Json(page.into()))
}

/// The caller's posts in any status, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/me/posts",
    params(PageQuery),
    responses(
        (status = 200, description = "Own posts", body = PostPage),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["posts"],
    operation_id = "listMyPosts",
    security(("token" = []))
)]
#[get("/me/posts")]
pub async fn list_my_posts(
    state: web::Data<HttpState>,
    caller: RequireUser,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<PostPage>> {
    let page = state
        .posts_query
        .list_by_author(caller.identity(), query.to_request())
        .await?;
    Ok(web::Json(page.into()))
}

/// Create a post owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Post created", body = PostResponse),
        (status = 400, description = "Invalid post", body = Error),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["posts"],
    operation_id = "createPost",
    security(("token" = []))
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    caller: RequireUser,
    payload: web::Json<CreatePostRequest>,
) -> ApiResult<HttpResponse> {
    let new_post = NewPost::try_from(payload.into_inner())?;
    let post = state.posts.create(caller.identity(), new_post).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(&post)))
}

/// A single post. Published posts count one view per read.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostView),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "readPost",
    security((), ("token" = []))
)]
#[get("/posts/{id}")]
pub async fn read_post(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    let id = parse_post_id(&path)?;
    let view = state.posts_query.read(&id, session.identity()).await?;
    Ok(web::Json(view))
}

/// A post in any status, for its owner to edit.
#[utoipa::path(
    get,
    path = "/api/v1/posts/{id}/edit",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post", body = PostView),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "fetchPostForEdit",
    security(("token" = []))
)]
#[get("/posts/{id}/edit")]
pub async fn edit_post_form(
    state: web::Data<HttpState>,
    caller: RequireUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostView>> {
    let id = parse_post_id(&path)?;
    let view = state
        .posts_query
        .fetch_for_edit(&id, caller.identity())
        .await?;
    Ok(web::Json(view))
}

/// Replace the editable fields of an owned post.
#[utoipa::path(
    put,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Post updated", body = PostResponse),
        (status = 400, description = "Invalid post", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "updatePost",
    security(("token" = []))
)]
#[put("/posts/{id}")]
pub async fn update_post(
    state: web::Data<HttpState>,
    caller: RequireUser,
    path: web::Path<String>,
    payload: web::Json<UpdatePostRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(&path)?;
    let request = PostEditRequest::from(payload.into_inner());
    let post = state.posts.edit(&id, caller.identity(), request).await?;
    Ok(web::Json(PostResponse::from(&post)))
}

/// Permanently delete an owned post.
#[utoipa::path(
    delete,
    path = "/api/v1/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Post deleted", body = DeleteResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not the owner", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "deletePost",
    security(("token" = []))
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    caller: RequireUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteResponse>> {
    let id = parse_post_id(&path)?;
    state.posts.delete(&id, caller.identity()).await?;
    Ok(web::Json(DeleteResponse { success: true }))
}

/// Append a comment. Blank text leaves the post unchanged.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/comments",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Post with comments", body = PostResponse),
        (status = 400, description = "Comment too long", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "addComment",
    security(("token" = []))
)]
#[post("/posts/{id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    caller: RequireUser,
    path: web::Path<String>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(&path)?;
    let post = state
        .posts
        .add_comment(&id, caller.identity(), &payload.text)
        .await?;
    Ok(web::Json(PostResponse::from(&post)))
}

/// Like the post, or unlike it when the caller already does.
#[utoipa::path(
    post,
    path = "/api/v1/posts/{id}/like",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "Like state after the toggle", body = LikeToggle),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "Post not found", body = Error)
    ),
    tags = ["posts"],
    operation_id = "toggleLike",
    security(("token" = []))
)]
#[post("/posts/{id}/like")]
pub async fn toggle_like(
    state: web::Data<HttpState>,
    caller: RequireUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<LikeToggle>> {
    let id = parse_post_id(&path)?;
    let outcome = state.posts.toggle_like(&id, caller.identity()).await?;
    Ok(web::Json(outcome))
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
