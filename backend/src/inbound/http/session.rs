//! Session helpers to keep HTTP handlers free of credential plumbing.
//!
//! The credential carrier is a `token` cookie holding a signed identity
//! token. [`SessionContext`] resolves it into an [`Identity`] for handlers
//! where signing in is optional; [`RequireUser`] does the same but rejects
//! anonymous callers with `401`. When the presented token no longer resolves,
//! the request is marked with [`StaleCredential`] so the
//! [`ClearStaleCredential`](crate::middleware::ClearStaleCredential)
//! middleware can expire the cookie on the way out.

use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Identity, TOKEN_TTL_DAYS, User};
use crate::inbound::http::state::HttpState;

/// Name of the cookie carrying the identity token.
pub const CREDENTIAL_COOKIE: &str = "token";

/// Builds the credential cookie with the configured attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CredentialCookies {
    secure: bool,
    lifetime: Duration,
}

impl CredentialCookies {
    /// Cookie settings; `secure` sets the `Secure` attribute.
    ///
    /// Cookies live for [`TOKEN_TTL_DAYS`] until [`Self::with_lifetime`]
    /// matches them to a token service.
    #[must_use]
    pub const fn new(secure: bool) -> Self {
        Self {
            secure,
            lifetime: Duration::days(TOKEN_TTL_DAYS),
        }
    }

    /// Match `Max-Age` to the lifetime of the tokens the cookie carries.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use quill::domain::{TokenSecret, TokenService};
    /// use quill::inbound::http::session::CredentialCookies;
    ///
    /// let tokens = TokenService::new(TokenSecret::generate(), Arc::new(DefaultClock));
    /// let cookies = CredentialCookies::new(false).with_lifetime(tokens.ttl());
    /// let max_age = cookies.issue("abc.def").max_age().map(|age| age.whole_seconds());
    /// assert_eq!(max_age, Some(tokens.ttl().num_seconds()));
    /// ```
    #[must_use]
    pub fn with_lifetime(self, ttl: chrono::Duration) -> Self {
        Self {
            secure: self.secure,
            lifetime: Duration::seconds(ttl.num_seconds()),
        }
    }

    /// Whether cookies are marked `Secure`.
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        self.secure
    }

    /// Cookie carrying `token` for the token lifetime.
    ///
    /// # Examples
    /// ```
    /// use actix_web::cookie::SameSite;
    /// use quill::inbound::http::session::CredentialCookies;
    ///
    /// let cookie = CredentialCookies::new(true).issue("abc.def");
    /// assert_eq!(cookie.name(), "token");
    /// assert_eq!(cookie.http_only(), Some(true));
    /// assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    /// assert_eq!(cookie.secure(), Some(true));
    /// ```
    #[must_use]
    pub fn issue(&self, token: impl Into<String>) -> Cookie<'static> {
        Cookie::build(CREDENTIAL_COOKIE, token.into())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(self.lifetime)
            .finish()
    }

    /// Cookie that expires the credential in the browser.
    #[must_use]
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = self.issue("");
        cookie.make_removal();
        cookie
    }
}

/// Request marker set when the presented credential must be cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaleCredential;

/// Identity of the caller for endpoints where signing in is optional.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    identity: Identity,
}

impl SessionContext {
    /// Wrap a resolved identity.
    pub fn new(identity: Identity) -> Self {
        Self { identity }
    }

    /// The resolved identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Require an authenticated user or return `401 Unauthorized`.
    pub fn require_user(&self) -> Result<&User, Error> {
        self.identity.user().ok_or_else(Error::login_required)
    }
}

async fn resolve_session(req: &HttpRequest) -> Result<SessionContext, Error> {
    if let Some(resolved) = req.extensions().get::<SessionContext>() {
        return Ok(resolved.clone());
    }
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let credential = req
        .cookie(CREDENTIAL_COOKIE)
        .map(|cookie| cookie.value().to_owned());

    let resolution = state.sessions.resolve(credential.as_deref()).await?;
    let context = SessionContext::new(resolution.identity);
    let mut extensions = req.extensions_mut();
    if resolution.clear_credential {
        extensions.insert(StaleCredential);
    }
    extensions.insert(context.clone());
    Ok(context)
}

impl FromRequest for SessionContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move { resolve_session(&req).await })
    }
}

/// Identity of the caller for endpoints that require signing in.
///
/// Extraction fails with `401` and `details.code = "login_required"` when
/// the caller is anonymous.
#[derive(Debug, Clone)]
pub struct RequireUser {
    identity: Identity,
}

impl RequireUser {
    /// The authenticated identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl FromRequest for RequireUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let context = resolve_session(&req).await?;
            context.require_user()?;
            Ok(Self {
                identity: context.identity,
            })
        })
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
