//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::cookie::Cookie;
use chrono::Utc;
use mockable::DefaultClock;

use crate::domain::ports::{PostRepository, UserRepository};
use crate::domain::{
    AccountService, Content, EmailAddress, NewPost, PasswordHash, Post, PostId, PostService,
    PostStatus, SessionService, Tags, Title, TokenSecret, TokenService, User, UserId, Username,
};
use crate::inbound::http::session::{CREDENTIAL_COOKIE, CredentialCookies};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::credentials::Argon2PasswordHasher;
use crate::outbound::persistence::{InMemoryPostRepository, InMemoryUserRepository};

/// Build the API under `/api/v1` around `$state`, with stale credential
/// clearing in place. Evaluates to the `init_service` future.
macro_rules! init_api {
    ($state:expr) => {{
        let state: $crate::inbound::http::state::HttpState = $state;
        let cookies = state.cookies;
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap($crate::middleware::ClearStaleCredential::new(cookies))
                .app_data(actix_web::web::Data::new(state))
                .configure($crate::inbound::http::configure),
        )
    }};
}
pub(crate) use init_api;

/// In-memory wiring of every HTTP port with handles for seeding.
pub struct TestHarness {
    pub state: HttpState,
    pub users: Arc<InMemoryUserRepository>,
    pub posts: Arc<InMemoryPostRepository>,
    pub tokens: Arc<TokenService>,
}

impl TestHarness {
    pub fn new() -> Self {
        let clock = Arc::new(DefaultClock);
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let tokens = Arc::new(TokenService::new(
            TokenSecret::new(b"an-http-test-secret-of-32-bytes!".to_vec()),
            clock.clone(),
        ));
        let post_service = Arc::new(PostService::new(posts.clone(), users.clone(), clock.clone()));
        let ports = HttpStatePorts {
            accounts: Arc::new(AccountService::new(
                users.clone(),
                Arc::new(Argon2PasswordHasher::new()),
                tokens.clone(),
                clock,
            )),
            sessions: Arc::new(SessionService::new(users.clone(), tokens.clone())),
            posts: post_service.clone(),
            posts_query: post_service,
        };
        let cookies = CredentialCookies::new(false).with_lifetime(tokens.ttl());
        Self {
            state: HttpState::new(ports, cookies),
            users,
            posts,
            tokens,
        }
    }

    /// Store a user directly, bypassing password hashing.
    pub async fn seed_user(&self, name: &str) -> User {
        let user = User::builder(
            UserId::random(),
            Username::new(name).expect("username"),
            EmailAddress::new(format!("{name}@example.com")).expect("email"),
            PasswordHash::new("not-a-real-hash"),
            Utc::now(),
        )
        .build();
        self.users.insert(&user).await.expect("insert user");
        user
    }

    /// Store a post directly.
    pub async fn seed_post(&self, author: &User, title: &str, status: PostStatus) -> Post {
        let post = Post::create(
            PostId::random(),
            *author.id(),
            NewPost {
                title: Title::new(title).expect("title"),
                content: Content::new("A body that is long enough").expect("content"),
                tags: Tags::from_csv("rust, web"),
                status,
                excerpt: None,
                featured_image: None,
            },
            Utc::now(),
        );
        self.posts.insert(&post).await.expect("insert post");
        post
    }

    /// Credential cookie for `user`.
    pub fn cookie_for(&self, user: &User) -> Cookie<'static> {
        let token = self.tokens.issue(user.id()).expect("issue token");
        Cookie::new(CREDENTIAL_COOKIE, token)
    }
}

/// The `token` cookie set on a response, if any.
pub fn credential_cookie<B>(res: &actix_web::dev::ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == CREDENTIAL_COOKIE)
        .map(Cookie::into_owned)
}
