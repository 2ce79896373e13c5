//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities and the use-case services
//! that operate on them. Adapters talk to the domain only through the ports
//! in [`ports`]; nothing here knows about HTTP, cookies or storage engines.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Post and their validated field types.
//! - Identity and SessionResolution: who is calling, as an explicit value.
//! - TokenService: signed identity tokens.
//! - AccountService, SessionService, PostService: port implementations.

pub mod account_service;
pub mod auth;
pub mod authorization;
pub mod error;
mod identifier;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod post_view;
pub mod session;
pub mod token;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration,
    RegistrationValidationError,
};
pub use self::authorization::{Capability, Denial, authorize};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::post::{
    COMMENT_MAX, CONTENT_MIN, Comment, CommentId, CommentText, Content, DEFAULT_FEATURED_IMAGE,
    EXCERPT_MAX, EXCERPT_PREVIEW_LEN, Excerpt, LikeToggle, NewPost, Post, PostEdit, PostEditRequest, PostId,
    PostStatus, PostValidationError, TITLE_MAX, Tags, Title,
};
pub use self::post_service::PostService;
pub use self::post_view::{
    CommentView, Dashboard, PostFilter, PostSummary, PostView, ProfileDirectory,
};
pub use self::session::{Identity, SessionResolution, SessionService};
pub use self::token::{
    TOKEN_SECRET_MIN_LEN, TOKEN_TTL_DAYS, TokenError, TokenSecret, TokenService,
};
pub use self::trace_id::TraceId;
pub use self::user::{
    DEFAULT_AVATAR, EmailAddress, PasswordHash, USERNAME_MAX, USERNAME_MIN, User, UserAccount,
    UserBuilder, UserId, UserProfile, UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use quill::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
