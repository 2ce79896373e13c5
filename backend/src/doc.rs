//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint under `/api/v1` together with the
//! health probes, the request and response schemas, and the `token` cookie
//! security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Comment, CommentView, Dashboard, Error, ErrorCode, LikeToggle, PostStatus, PostSummary,
    PostView, UserAccount, UserProfile,
};
use crate::inbound::http::accounts::{AccountResponse, LoginRequest, RegisterRequest};
use crate::inbound::http::feeds::HomeFeed;
use crate::inbound::http::posts::{
    CommentRequest, CreatePostRequest, DeleteResponse, PostPage, PostResponse, TagsInput,
    UpdatePostRequest,
};
use crate::inbound::http::session::CREDENTIAL_COOKIE;

/// Enrich the generated document with the credential cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            CREDENTIAL_COOKIE,
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                CREDENTIAL_COOKIE,
                "Signed identity token issued by register and login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Quill publishing API",
        description = "Accounts, signed cookie sessions, and ownership-scoped posts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::feeds::home,
        crate::inbound::http::feeds::dashboard,
        crate::inbound::http::posts::list_posts,
        crate::inbound::http::posts::list_my_posts,
        crate::inbound::http::posts::create_post,
        crate::inbound::http::posts::read_post,
        crate::inbound::http::posts::edit_post_form,
        crate::inbound::http::posts::update_post,
        crate::inbound::http::posts::delete_post,
        crate::inbound::http::posts::add_comment,
        crate::inbound::http::posts::toggle_like,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        UserProfile,
        UserAccount,
        RegisterRequest,
        LoginRequest,
        AccountResponse,
        PostStatus,
        Comment,
        CommentView,
        PostView,
        PostSummary,
        PostPage,
        PostResponse,
        CreatePostRequest,
        UpdatePostRequest,
        TagsInput,
        CommentRequest,
        DeleteResponse,
        LikeToggle,
        HomeFeed,
        Dashboard,
    )),
    tags(
        (name = "accounts", description = "Registration, login and logout"),
        (name = "posts", description = "Authoring, reading and engaging with posts"),
        (name = "feeds", description = "Home feed and dashboard"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
