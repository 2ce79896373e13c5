//! Middleware expiring credential cookies that no longer resolve.
//!
//! Session extraction marks the request with [`StaleCredential`] when the
//! presented token is invalid or names a missing user. This middleware turns
//! that marker into a removal cookie on the response, unless the handler has
//! already set a fresh credential (for example after logging in).

use std::task::{Context, Poll};

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error};

use crate::inbound::http::session::{CREDENTIAL_COOKIE, CredentialCookies, StaleCredential};

/// Clears stale credential cookies on the way out.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use quill::inbound::http::session::CredentialCookies;
/// use quill::middleware::ClearStaleCredential;
///
/// let app = App::new().wrap(ClearStaleCredential::new(CredentialCookies::new(true)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ClearStaleCredential {
    cookies: CredentialCookies,
}

impl ClearStaleCredential {
    /// Expire stale credentials using the given cookie attributes.
    pub const fn new(cookies: CredentialCookies) -> Self {
        Self { cookies }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ClearStaleCredential
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ClearStaleCredentialMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ClearStaleCredentialMiddleware {
            service,
            cookies: self.cookies,
        }))
    }
}

/// Service wrapper produced by [`ClearStaleCredential`].
pub struct ClearStaleCredentialMiddleware<S> {
    service: S,
    cookies: CredentialCookies,
}

fn sets_credential<B>(res: &ServiceResponse<B>) -> bool {
    res.response()
        .cookies()
        .any(|cookie| cookie.name() == CREDENTIAL_COOKIE)
}

impl<S, B> Service<ServiceRequest> for ClearStaleCredentialMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let cookies = self.cookies;
        let fut = self.service.call(req);
        Box::pin(async move {
            let mut res = fut.await?;
            let stale = res.request().extensions().contains::<StaleCredential>();
            if stale && !sets_credential(&res) {
                debug!("expiring stale credential cookie");
                if let Err(err) = res.response_mut().add_cookie(&cookies.removal()) {
                    error!(error = %err, "failed to expire stale credential cookie");
                }
            }
            Ok(res)
        })
    }
}
