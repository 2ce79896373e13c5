//! Post aggregate: content, engagement and lifecycle state.
//!
//! Field types validate on construction so a [`Post`] can only hold values
//! within bounds. Mutations are expressed as methods that repository adapters
//! apply to the current stored record, keeping each change atomic at the
//! store.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;
use super::identifier::uuid_identifier;

/// Longest accepted title, in characters, after trimming.
pub const TITLE_MAX: usize = 200;
/// Shortest accepted body, in characters.
pub const CONTENT_MIN: usize = 10;
/// Longest accepted excerpt, in characters.
pub const EXCERPT_MAX: usize = 300;
/// Number of body characters copied into a derived excerpt.
pub const EXCERPT_PREVIEW_LEN: usize = 150;
/// Longest accepted comment, in characters, after trimming.
pub const COMMENT_MAX: usize = 1000;
/// Image reference used when a post is created without one.
pub const DEFAULT_FEATURED_IMAGE: &str = "default-post.jpg";

/// Validation errors raised by post value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// The identifier is not a UUID.
    #[error("post id must be a valid UUID")]
    InvalidId,
    /// Title was missing or blank once trimmed.
    #[error("Title and content are required")]
    EmptyTitle,
    /// Title exceeds [`TITLE_MAX`].
    #[error("Title must be at most {max} characters")]
    TitleTooLong {
        /// Upper bound.
        max: usize,
    },
    /// Content was missing or blank.
    #[error("Title and content are required")]
    EmptyContent,
    /// Content is shorter than [`CONTENT_MIN`].
    #[error("Content must be at least {min} characters")]
    ContentTooShort {
        /// Lower bound.
        min: usize,
    },
    /// Excerpt exceeds [`EXCERPT_MAX`].
    #[error("Excerpt must be at most {max} characters")]
    ExcerptTooLong {
        /// Upper bound.
        max: usize,
    },
    /// Status is neither `draft` nor `published`.
    #[error("Status must be draft or published")]
    InvalidStatus,
    /// Comment exceeds [`COMMENT_MAX`].
    #[error("Comment must be at most {max} characters")]
    CommentTooLong {
        /// Upper bound.
        max: usize,
    },
}

impl PostValidationError {
    /// Field name and stable reason code reported to clients.
    pub fn field_and_code(&self) -> (&'static str, &'static str) {
        match self {
            Self::InvalidId => ("id", "invalid_id"),
            Self::EmptyTitle => ("title", "empty_title"),
            Self::TitleTooLong { .. } => ("title", "title_too_long"),
            Self::EmptyContent => ("content", "empty_content"),
            Self::ContentTooShort { .. } => ("content", "content_too_short"),
            Self::ExcerptTooLong { .. } => ("excerpt", "excerpt_too_long"),
            Self::InvalidStatus => ("status", "invalid_status"),
            Self::CommentTooLong { .. } => ("text", "comment_too_long"),
        }
    }
}

impl From<PostValidationError> for super::Error {
    fn from(value: PostValidationError) -> Self {
        let (field, code) = value.field_and_code();
        super::Error::validation(field, code, value.to_string())
    }
}

uuid_identifier! {
    /// Stable post identifier stored as a UUID.
    pub struct PostId;
    invalid => PostValidationError = PostValidationError::InvalidId;
}

uuid_identifier! {
    /// Identifier of a single comment within a post.
    pub struct CommentId;
    invalid => PostValidationError = PostValidationError::InvalidId;
}

/// Publication state.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Visible to the author only.
    Draft,
    /// Visible to everyone.
    #[default]
    Published,
}

impl PostStatus {
    /// Parse an optional status, defaulting to [`PostStatus::Published`].
    ///
    /// # Examples
    /// ```
    /// use quill::domain::PostStatus;
    ///
    /// assert_eq!(PostStatus::parse(None), Ok(PostStatus::Published));
    /// assert_eq!(PostStatus::parse(Some("draft")), Ok(PostStatus::Draft));
    /// assert!(PostStatus::parse(Some("archived")).is_err());
    /// ```
    pub fn parse(raw: Option<&str>) -> Result<Self, PostValidationError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(Self::default()),
            Some(value) if value.eq_ignore_ascii_case("draft") => Ok(Self::Draft),
            Some(value) if value.eq_ignore_ascii_case("published") => Ok(Self::Published),
            Some(_) => Err(PostValidationError::InvalidStatus),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Published => f.write_str("published"),
        }
    }
}

/// Trimmed, non-empty post title of at most [`TITLE_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PostValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PostValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(PostValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

/// Post body of at least [`CONTENT_MIN`] characters, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Content(String);

impl Content {
    /// Validate and construct a [`Content`].
    pub fn new(raw: impl Into<String>) -> Result<Self, PostValidationError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(PostValidationError::EmptyContent);
        }
        if raw.chars().count() < CONTENT_MIN {
            return Err(PostValidationError::ContentTooShort { min: CONTENT_MIN });
        }
        Ok(Self(raw))
    }
}

/// Short teaser of at most [`EXCERPT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct Excerpt(String);

impl Excerpt {
    /// Validate an author-supplied excerpt. Blank input yields `None`.
    pub fn new(raw: impl AsRef<str>) -> Result<Option<Self>, PostValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > EXCERPT_MAX {
            return Err(PostValidationError::ExcerptTooLong { max: EXCERPT_MAX });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// Derive an excerpt from the first [`EXCERPT_PREVIEW_LEN`] characters
    /// of `content`, followed by an ellipsis.
    ///
    /// # Examples
    /// ```
    /// use quill::domain::{Content, Excerpt};
    ///
    /// let content = Content::new("A short body.").unwrap();
    /// assert_eq!(Excerpt::derive_from(&content).as_ref(), "A short body....");
    /// ```
    pub fn derive_from(content: &Content) -> Self {
        let mut preview: String = content.0.chars().take(EXCERPT_PREVIEW_LEN).collect();
        preview.push_str("...");
        Self(preview)
    }
}

/// Ordered list of trimmed, non-empty tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    /// Normalise a list of tags, dropping blanks.
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            tags.into_iter()
                .map(|tag| tag.as_ref().trim().to_owned())
                .filter(|tag| !tag.is_empty())
                .collect(),
        )
    }

    /// Split a comma-separated tag string.
    ///
    /// # Examples
    /// ```
    /// use quill::domain::Tags;
    ///
    /// let tags = Tags::from_csv(" rust, web ,, async");
    /// assert_eq!(tags.as_slice(), ["rust", "web", "async"]);
    /// ```
    pub fn from_csv(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// Tags in order.
    pub fn as_slice(&self) -> &[String] {
        self.0.as_slice()
    }
}

macro_rules! string_newtype_conversions {
    ($($name:ident),* $(,)?) => {
        $(
            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.0.as_str()
                }
            }

            impl From<$name> for String {
                fn from(value: $name) -> Self {
                    value.0
                }
            }
        )*
    };
}

string_newtype_conversions!(Title, Content, Excerpt);

/// Trimmed comment text of 1..=[`COMMENT_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentText(String);

impl CommentText {
    /// Validate comment input. Blank input yields `None`, which callers treat
    /// as a no-op rather than an error.
    pub fn parse(raw: &str) -> Result<Option<Self>, PostValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if trimmed.chars().count() > COMMENT_MAX {
            return Err(PostValidationError::CommentTooLong { max: COMMENT_MAX });
        }
        Ok(Some(Self(trimmed.to_owned())))
    }

    /// The trimmed text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A single comment, embedded in its post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment identifier.
    #[schema(value_type = String)]
    pub id: CommentId,
    /// Commenting user.
    #[schema(value_type = String)]
    pub author: UserId,
    /// Trimmed text.
    pub text: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Build a new comment authored now.
    pub fn new(author: UserId, text: CommentText, created_at: DateTime<Utc>) -> Self {
        Self {
            id: CommentId::random(),
            author,
            text: text.0,
            created_at,
        }
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Title.
    pub title: Title,
    /// Body.
    pub content: Content,
    /// Tags.
    pub tags: Tags,
    /// Initial status.
    pub status: PostStatus,
    /// Author-supplied excerpt; derived from the body when absent.
    pub excerpt: Option<Excerpt>,
    /// Image reference; defaults to [`DEFAULT_FEATURED_IMAGE`].
    pub featured_image: Option<String>,
}

/// Replacement values for the editable fields of a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostEdit {
    /// New title.
    pub title: Title,
    /// New body.
    pub content: Content,
    /// New tags.
    pub tags: Tags,
    /// New status.
    pub status: PostStatus,
}

/// Editable fields as submitted, before validation.
///
/// Validation runs only after the caller's ownership of the post is settled,
/// so a non-owner learns nothing from the shape of their input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostEditRequest {
    /// Raw title.
    pub title: String,
    /// Raw body.
    pub content: String,
    /// Tags.
    pub tags: Tags,
    /// `draft` or `published`; `published` when absent.
    pub status: Option<String>,
}

impl TryFrom<PostEditRequest> for PostEdit {
    type Error = PostValidationError;

    fn try_from(value: PostEditRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: Title::new(&value.title)?,
            content: Content::new(value.content)?,
            tags: value.tags,
            status: PostStatus::parse(value.status.as_deref())?,
        })
    }
}

/// Outcome of a like toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggle {
    /// Whether the caller likes the post after the toggle.
    pub liked: bool,
    /// Like count after the toggle.
    pub like_count: usize,
}

/// Stored post record.
///
/// ## Invariants
/// - `author` never changes after creation.
/// - `likes` holds each user at most once, in the order they liked.
/// - `comments` only grow and keep creation order.
/// - `views` never decreases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    author: UserId,
    title: Title,
    content: Content,
    excerpt: Excerpt,
    tags: Tags,
    featured_image: String,
    status: PostStatus,
    views: u64,
    likes: Vec<UserId>,
    comments: Vec<Comment>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a post owned by `author`, deriving the excerpt when none was
    /// supplied.
    pub fn create(id: PostId, author: UserId, new_post: NewPost, now: DateTime<Utc>) -> Self {
        let NewPost {
            title,
            content,
            tags,
            status,
            excerpt,
            featured_image,
        } = new_post;
        let excerpt = excerpt.unwrap_or_else(|| Excerpt::derive_from(&content));
        let featured_image = featured_image
            .map(|image| image.trim().to_owned())
            .filter(|image| !image.is_empty())
            .unwrap_or_else(|| DEFAULT_FEATURED_IMAGE.to_owned());
        Self {
            id,
            author,
            title,
            content,
            excerpt,
            tags,
            featured_image,
            status,
            views: 0,
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Identifier.
    pub fn id(&self) -> &PostId {
        &self.id
    }

    /// Owning user.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Title.
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// Body.
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Excerpt, fixed at creation.
    pub fn excerpt(&self) -> &Excerpt {
        &self.excerpt
    }

    /// Tags.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Image reference.
    pub fn featured_image(&self) -> &str {
        self.featured_image.as_str()
    }

    /// Publication state.
    pub fn status(&self) -> PostStatus {
        self.status
    }

    /// Whether the post is publicly visible.
    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Public read count.
    pub fn views(&self) -> u64 {
        self.views
    }

    /// Users who like the post, in the order they liked it.
    pub fn likes(&self) -> &[UserId] {
        self.likes.as_slice()
    }

    /// Comments in creation order.
    pub fn comments(&self) -> &[Comment] {
        self.comments.as_slice()
    }

    /// Derived like count.
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    /// Derived comment count.
    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last edit timestamp.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether `user` owns the post.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.author == *user
    }

    /// Whether `user` currently likes the post.
    pub fn is_liked_by(&self, user: &UserId) -> bool {
        self.likes.contains(user)
    }

    /// Drafts are visible to their author only; published posts to everyone.
    pub fn is_visible_to(&self, viewer: Option<&UserId>) -> bool {
        self.is_published() || viewer.is_some_and(|user| self.is_owned_by(user))
    }

    /// Replace the editable fields. Author, engagement and excerpt are kept.
    pub fn apply_edit(&mut self, edit: PostEdit, now: DateTime<Utc>) {
        let PostEdit {
            title,
            content,
            tags,
            status,
        } = edit;
        self.title = title;
        self.content = content;
        self.tags = tags;
        self.status = status;
        self.updated_at = now;
    }

    /// Count one public read.
    pub fn record_view(&mut self) {
        self.views = self.views.saturating_add(1);
    }

    /// Append a comment at the end of the thread.
    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.push(comment);
    }

    /// Add `user` to the likes if absent, otherwise remove them.
    pub fn toggle_like(&mut self, user: UserId) -> LikeToggle {
        let liked = match self.likes.iter().position(|existing| *existing == user) {
            Some(index) => {
                self.likes.remove(index);
                false
            }
            None => {
                self.likes.push(user);
                true
            }
        };
        LikeToggle {
            liked,
            like_count: self.likes.len(),
        }
    }
}
