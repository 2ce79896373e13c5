//! Builders wiring domain services onto their storage adapters.

use std::sync::Arc;

use mockable::DefaultClock;
use quill::domain::{AccountService, PostService, SessionService, TokenSecret, TokenService};
use quill::inbound::http::session::CredentialCookies;
use quill::inbound::http::state::{HttpState, HttpStatePorts};
use quill::outbound::credentials::Argon2PasswordHasher;
use quill::outbound::persistence::{InMemoryPostRepository, InMemoryUserRepository};

/// Build the HTTP state over process-local stores.
///
/// All workers share the returned state, so every request sees the same
/// users and posts.
pub(crate) fn build_http_state(secret: TokenSecret, cookies: CredentialCookies) -> HttpState {
    let clock = Arc::new(DefaultClock);
    let users = Arc::new(InMemoryUserRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    let tokens = Arc::new(TokenService::new(secret, clock.clone()));
    let cookies = cookies.with_lifetime(tokens.ttl());

    let post_service = Arc::new(PostService::new(posts, users.clone(), clock.clone()));
    let ports = HttpStatePorts {
        accounts: Arc::new(AccountService::new(
            users.clone(),
            Arc::new(Argon2PasswordHasher::new()),
            tokens.clone(),
            clock,
        )),
        sessions: Arc::new(SessionService::new(users, tokens)),
        posts: post_service.clone(),
        posts_query: post_service,
    };
    HttpState::new(ports, cookies)
}
