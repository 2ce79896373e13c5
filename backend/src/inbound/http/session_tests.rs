//! Tests for session extraction and credential cookies.

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, HttpMessage, HttpRequest, HttpResponse, test as actix_test, web};
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::UserId;
use crate::inbound::http::test_utils::{TestHarness, credential_cookie};
use crate::middleware::ClearStaleCredential;

async fn whoami(session: SessionContext, req: HttpRequest) -> HttpResponse {
    let stale = req.extensions().contains::<StaleCredential>();
    let name = session
        .identity()
        .user()
        .map_or_else(|| "anonymous".to_owned(), |user| user.username().to_string());
    HttpResponse::Ok().json(serde_json::json!({ "user": name, "stale": stale }))
}

async fn private(caller: RequireUser) -> HttpResponse {
    let name = caller
        .identity()
        .user()
        .map(|user| user.username().to_string())
        .unwrap_or_default();
    HttpResponse::Ok().body(name)
}

macro_rules! session_app {
    ($harness:expr) => {
        actix_test::init_service(
            App::new()
                .wrap(ClearStaleCredential::new($harness.state.cookies))
                .app_data(web::Data::new($harness.state.clone()))
                .route("/whoami", web::get().to(whoami))
                .route("/private", web::get().to(private)),
        )
    };
}

#[rstest]
#[case(false)]
#[case(true)]
fn issued_cookie_carries_attributes(#[case] secure: bool) {
    let cookie = CredentialCookies::new(secure).issue("abc.def");
    assert_eq!(cookie.name(), CREDENTIAL_COOKIE);
    assert_eq!(cookie.value(), "abc.def");
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(secure));
    assert_eq!(cookie.max_age(), Some(Duration::days(TOKEN_TTL_DAYS)));
}

#[test]
fn cookie_lifetime_follows_the_token_service() {
    let harness = TestHarness::new();
    let cookie = harness.state.cookies.issue("abc.def");
    assert_eq!(
        cookie.max_age(),
        Some(Duration::seconds(harness.tokens.ttl().num_seconds()))
    );

    let short = CredentialCookies::new(false).with_lifetime(chrono::Duration::hours(1));
    assert_eq!(short.issue("abc.def").max_age(), Some(Duration::hours(1)));
    assert_eq!(short.removal().max_age(), Some(Duration::ZERO));
}

#[test]
fn removal_cookie_expires_immediately() {
    let cookie = CredentialCookies::new(false).removal();
    assert_eq!(cookie.name(), CREDENTIAL_COOKIE);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

#[actix_web::test]
async fn no_cookie_resolves_anonymous() {
    let harness = TestHarness::new();
    let app = session_app!(harness).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/whoami").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(credential_cookie(&res).is_none());
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["user"], "anonymous");
    assert_eq!(body["stale"], false);
}

#[actix_web::test]
async fn valid_cookie_resolves_the_user() {
    let harness = TestHarness::new();
    let user = harness.seed_user("ada_l").await;
    let app = session_app!(harness).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/whoami")
            .cookie(harness.cookie_for(&user))
            .to_request(),
    )
    .await;

    assert!(credential_cookie(&res).is_none());
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["user"], "ada_l");
    assert_eq!(body["stale"], false);
}

#[actix_web::test]
async fn tampered_cookie_is_anonymous_and_cleared() {
    let harness = TestHarness::new();
    let app = session_app!(harness).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/whoami")
            .cookie(Cookie::new(CREDENTIAL_COOKIE, "garbage.token"))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let cleared = credential_cookie(&res).expect("removal cookie");
    assert_eq!(cleared.value(), "");
    assert_eq!(cleared.max_age(), Some(Duration::ZERO));
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["user"], "anonymous");
    assert_eq!(body["stale"], true);
}

#[actix_web::test]
async fn cookie_for_deleted_user_is_cleared() {
    let harness = TestHarness::new();
    let token = harness.tokens.issue(&UserId::random()).expect("token");
    let app = session_app!(harness).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/whoami")
            .cookie(Cookie::new(CREDENTIAL_COOKIE, token))
            .to_request(),
    )
    .await;

    assert!(credential_cookie(&res).is_some());
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["user"], "anonymous");
}

#[actix_web::test]
async fn require_user_rejects_anonymous_callers() {
    let harness = TestHarness::new();
    let app = session_app!(harness).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/private").to_request()).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body["message"], "Please login to continue");
    assert_eq!(body["details"]["code"], "login_required");
}

#[actix_web::test]
async fn require_user_accepts_signed_in_callers() {
    let harness = TestHarness::new();
    let user = harness.seed_user("grace").await;
    let app = session_app!(harness).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/private")
            .cookie(harness.cookie_for(&user))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = actix_test::read_body(res).await;
    assert_eq!(body.as_ref(), b"grace");
}

#[actix_web::test]
async fn missing_state_is_an_internal_error() {
    let app = actix_test::init_service(App::new().route("/whoami", web::get().to(whoami))).await;

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/whoami").to_request()).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
