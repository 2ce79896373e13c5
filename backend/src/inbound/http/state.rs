//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccountCommand, PostsCommand, PostsQuery, SessionResolver};
use crate::inbound::http::session::CredentialCookies;

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn AccountCommand>,
    pub sessions: Arc<dyn SessionResolver>,
    pub posts: Arc<dyn PostsCommand>,
    pub posts_query: Arc<dyn PostsQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub sessions: Arc<dyn SessionResolver>,
    pub posts: Arc<dyn PostsCommand>,
    pub posts_query: Arc<dyn PostsQuery>,
    pub cookies: CredentialCookies,
}

impl HttpState {
    /// Construct state from a ports bundle and cookie settings.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use quill::domain::{
    ///     AccountService, PostService, SessionService, TokenSecret, TokenService,
    /// };
    /// use quill::inbound::http::session::CredentialCookies;
    /// use quill::inbound::http::state::{HttpState, HttpStatePorts};
    /// use quill::outbound::credentials::Argon2PasswordHasher;
    /// use quill::outbound::persistence::{InMemoryPostRepository, InMemoryUserRepository};
    ///
    /// let clock = Arc::new(DefaultClock);
    /// let users = Arc::new(InMemoryUserRepository::new());
    /// let posts = Arc::new(InMemoryPostRepository::new());
    /// let tokens = Arc::new(TokenService::new(TokenSecret::generate(), clock.clone()));
    /// let post_service = Arc::new(PostService::new(posts, users.clone(), clock.clone()));
    /// let ports = HttpStatePorts {
    ///     accounts: Arc::new(AccountService::new(
    ///         users.clone(),
    ///         Arc::new(Argon2PasswordHasher::new()),
    ///         tokens.clone(),
    ///         clock,
    ///     )),
    ///     sessions: Arc::new(SessionService::new(users, tokens)),
    ///     posts: post_service.clone(),
    ///     posts_query: post_service,
    /// };
    /// let state = HttpState::new(ports, CredentialCookies::new(false));
    /// assert!(!state.cookies.is_secure());
    /// ```
    pub fn new(ports: HttpStatePorts, cookies: CredentialCookies) -> Self {
        let HttpStatePorts {
            accounts,
            sessions,
            posts,
            posts_query,
        } = ports;
        Self {
            accounts,
            sessions,
            posts,
            posts_query,
            cookies,
        }
    }
}
