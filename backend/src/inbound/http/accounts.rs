//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"ada_l","email":"ada@example.com","password":"secret1","confirmPassword":"secret1"}
//! POST /api/v1/auth/login {"email":"ada@example.com","password":"secret1"}
//! POST /api/v1/auth/logout
//! ```

use actix_web::{HttpResponse, HttpResponseBuilder, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AuthSession;
use crate::domain::{Error, LoginCredentials, LoginValidationError, Registration, UserAccount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/auth/register`.
///
/// Missing fields deserialise as empty strings so they surface as a
/// validation error rather than a parse failure.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Signed-in account returned by register and login.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub user: UserAccount,
}

fn signed_in(
    mut response: HttpResponseBuilder,
    state: &HttpState,
    session: AuthSession,
) -> HttpResponse {
    response
        .cookie(state.cookies.issue(session.token))
        .json(AccountResponse {
            user: session.user.account(),
        })
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse,
            headers(("Set-Cookie" = String, description = "Credential cookie"))),
        (status = 400, description = "Invalid or duplicate registration", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
        confirm_password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(&username, &email, &password, &confirm_password)?;
    let session = state.accounts.register(registration).await?;
    Ok(signed_in(HttpResponse::Created(), &state, session))
}

/// Check credentials and sign the account in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = AccountResponse,
            headers(("Set-Cookie" = String, description = "Credential cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let session = state.accounts.login(&credentials).await?;
    Ok(signed_in(HttpResponse::Ok(), &state, session))
}

/// Clear the credential cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Signed out",
            headers(("Set-Cookie" = String, description = "Expired credential cookie")))
    ),
    tags = ["accounts"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::NoContent()
        .cookie(state.cookies.removal())
        .finish()
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
